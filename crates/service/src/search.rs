//! Token-based name matching and ranking.
//!
//! The only contract is "best matches first, capped at a limit"; the exact
//! relevance order beyond that is an implementation choice. Matching is
//! case-insensitive: a query token scores against each name token as an
//! exact match, a prefix match, or a substring match, in that order of
//! strength. Ties are broken by recency.

use models::item::Model as Item;

const EXACT_WEIGHT: u32 = 3;
const PREFIX_WEIGHT: u32 = 2;
const SUBSTRING_WEIGHT: u32 = 1;

/// Split text into lowercase alphanumeric runs. Punctuation separates
/// tokens and never appears in them.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Relevance of `name` for the given query tokens, or `None` when no
/// query token matches any name token.
pub fn score_name(query_tokens: &[String], name: &str) -> Option<u32> {
    let name_tokens = tokenize(name);
    let mut total = 0u32;
    for qt in query_tokens {
        let best = name_tokens
            .iter()
            .map(|nt| {
                if nt == qt {
                    EXACT_WEIGHT
                } else if nt.starts_with(qt.as_str()) {
                    PREFIX_WEIGHT
                } else if nt.contains(qt.as_str()) {
                    SUBSTRING_WEIGHT
                } else {
                    0
                }
            })
            .max()
            .unwrap_or(0);
        total += best;
    }
    if total == 0 {
        None
    } else {
        Some(total)
    }
}

/// Rank matching items best-first and truncate to `limit`.
pub fn rank(items: Vec<Item>, query_tokens: &[String], limit: usize) -> Vec<Item> {
    let mut scored: Vec<(u32, Item)> = items
        .into_iter()
        .filter_map(|it| score_name(query_tokens, &it.name).map(|s| (s, it)))
        .collect();
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0).then_with(|| b.1.last_modified.cmp(&a.1.last_modified))
    });
    scored.into_iter().take(limit).map(|(_, it)| it).collect()
}

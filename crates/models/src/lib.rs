//! Entity definitions and data-access helpers for the inventory store.

pub mod db;
pub mod errors;
pub mod item;

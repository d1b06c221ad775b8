use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};
use service::item::{ItemFileStore, ItemService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;

struct TestApp {
    base_url: String,
}

/// Spin up the real router on an ephemeral port, backed by an isolated
/// JSON-file store per test run. No database required.
async fn start_server() -> anyhow::Result<TestApp> {
    let temp_id = Uuid::new_v4();
    let items_path = format!("target/test-data/{}/items.json", temp_id);
    let store = ItemFileStore::new(&items_path).await?;

    let state = ServerState { items: Arc::new(ItemService::new(store)) };
    let app: Router = routes::build_router(CorsLayer::very_permissive(), state);

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_item(app: &TestApp, body: Value) -> anyhow::Result<reqwest::Response> {
    Ok(client().post(format!("{}/api/items", app.base_url)).json(&body).send().await?)
}

#[tokio::test]
async fn e2e_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_then_get_roundtrip() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = create_item(
        &app,
        json!({
            "name": "Drill",
            "description": "Cordless",
            "quantity": 2,
            "category": "Tools",
            "notes": "top shelf",
            "isFragile": true
        }),
    )
    .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let id = res.json::<Value>().await?["id"].as_str().unwrap().to_string();

    let res = client().get(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let item = res.json::<Value>().await?;
    assert_eq!(item["id"], id.as_str());
    assert_eq!(item["name"], "Drill");
    assert_eq!(item["description"], "Cordless");
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["category"], "Tools");
    assert_eq!(item["notes"], "top shelf");
    assert_eq!(item["isFragile"], true);
    assert!(item["lastModified"].as_i64().unwrap() > 0);
    Ok(())
}

#[tokio::test]
async fn e2e_create_rejects_blank_name() -> anyhow::Result<()> {
    let app = start_server().await?;

    for name in ["", "   "] {
        let res = create_item(&app, json!({ "name": name })).await?;
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        let body = res.json::<Value>().await?;
        assert_eq!(body["error"]["title"], "Validation Error");
    }

    // No partial write happened.
    let res = client().get(format!("{}/api/items", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?.as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn e2e_patch_preserves_zero_and_missing_id_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = create_item(&app, json!({ "name": "Drill" })).await?;
    let id = res.json::<Value>().await?["id"].as_str().unwrap().to_string();

    // Explicit zero survives the sparse-patch filtering.
    let res = client()
        .patch(format!("{}/api/items/{}", app.base_url, id))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let item =
        client().get(format!("{}/api/items/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(item["quantity"], 0);
    assert_eq!(item["name"], "Drill");

    // Unknown id is an observable failure, not a silent no-op.
    let res = client()
        .patch(format!("{}/api/items/{}", app.base_url, Uuid::new_v4()))
        .json(&json!({ "quantity": 1 }))
        .send()
        .await?;
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_delete_is_idempotent() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = create_item(&app, json!({ "name": "Drill" })).await?;
    let id = res.json::<Value>().await?["id"].as_str().unwrap().to_string();

    let res = client().delete(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    // Second delete of the same id still succeeds.
    let res = client().delete(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);

    let res = client().get(format!("{}/api/items/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_search_matches_name_tokens() -> anyhow::Result<()> {
    let app = start_server().await?;

    for name in ["Drill", "Drill Bits Set", "Hammer"] {
        create_item(&app, json!({ "name": name })).await?;
    }

    let res = client().get(format!("{}/api/items/search?q=drill", app.base_url)).send().await?;
    let hits = res.json::<Value>().await?;
    let names: Vec<&str> =
        hits.as_array().unwrap().iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Drill"));
    assert!(names.contains(&"Drill Bits Set"));

    // Blank queries return nothing.
    for q in ["", "%20%20"] {
        let res =
            client().get(format!("{}/api/items/search?q={}", app.base_url, q)).send().await?;
        assert_eq!(res.json::<Value>().await?.as_array().unwrap().len(), 0);
    }
    Ok(())
}

#[tokio::test]
async fn e2e_list_filters_by_category_newest_first() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = create_item(&app, json!({ "name": "A", "quantity": 1, "category": "Books" })).await?;
    let a = res.json::<Value>().await?["id"].as_str().unwrap().to_string();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let res = create_item(&app, json!({ "name": "B", "quantity": 3, "category": "Tools" })).await?;
    let b = res.json::<Value>().await?["id"].as_str().unwrap().to_string();

    let res =
        client().get(format!("{}/api/items?category=Books", app.base_url)).send().await?;
    let books = res.json::<Value>().await?;
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["id"], a.as_str());

    let res = client().get(format!("{}/api/items", app.base_url)).send().await?;
    let all = res.json::<Value>().await?;
    let ids: Vec<&str> = all.as_array().unwrap().iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![b.as_str(), a.as_str()]);
    Ok(())
}

#[tokio::test]
async fn e2e_categories_sorted_exact_dedup() -> anyhow::Result<()> {
    let app = start_server().await?;

    create_item(&app, json!({ "name": "A", "category": "Tools" })).await?;
    create_item(&app, json!({ "name": "B", "category": "tools" })).await?;
    create_item(&app, json!({ "name": "C" })).await?;
    create_item(&app, json!({ "name": "D", "category": "Books" })).await?;

    let res = client().get(format!("{}/api/items/categories", app.base_url)).send().await?;
    let cats = res.json::<Value>().await?;
    assert_eq!(cats, json!(["Books", "Tools", "tools"]));
    Ok(())
}

#[tokio::test]
async fn e2e_recent_respects_limit() -> anyhow::Result<()> {
    let app = start_server().await?;

    for i in 0..12 {
        create_item(&app, json!({ "name": format!("Item {i}") })).await?;
    }

    let res = client().get(format!("{}/api/items/recent", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?.as_array().unwrap().len(), 10);

    let res = client().get(format!("{}/api/items/recent?limit=3", app.base_url)).send().await?;
    assert_eq!(res.json::<Value>().await?.as_array().unwrap().len(), 3);
    Ok(())
}

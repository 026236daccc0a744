//! HTTP tests for the /resolve-image endpoint
//!
//! Drives the router with `oneshot` over an in-memory store and a stub
//! fetcher, so nothing touches the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use og_image_resolver::{
    create_app, AppState, ImageResolver, ItemStore, MemoryStore, NewItem, PageFetcher,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

#[derive(Default)]
struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned()
    }
}

struct TestApp {
    app: Router,
    store: Arc<MemoryStore>,
    fetcher: Arc<StubFetcher>,
}

async fn setup(pages: &[(&str, &str)]) -> TestApp {
    let fetcher = Arc::new(StubFetcher {
        pages: pages
            .iter()
            .map(|(url, html)| (url.to_string(), html.to_string()))
            .collect(),
        calls: AtomicUsize::new(0),
    });
    let store = Arc::new(MemoryStore::new());
    let resolver = ImageResolver::new(fetcher.clone(), store.clone());

    TestApp {
        app: create_app(AppState::new(resolver)),
        store,
        fetcher,
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, body)
}

const KETTLE_URL: &str = "https://shop.example/kettle";
const KETTLE_PAGE: &str = r#"
<html>
<head>
    <meta name="twitter:image" content="https://cdn.example/kettle-twitter.jpg">
    <meta content="//cdn.example/kettle.jpg" property="og:image">
</head>
<body></body>
</html>
"#;

#[tokio::test]
async fn test_resolves_image() {
    let t = setup(&[(KETTLE_URL, KETTLE_PAGE)]).await;
    let item = t
        .store
        .insert_item(NewItem::new(1, "Kettle", KETTLE_URL))
        .await
        .unwrap();

    let (status, body) = get(&t.app, &format!("/resolve-image?itemId={}", item.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ogImage": "https://cdn.example/kettle.jpg" }));

    let stored = t.store.get_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.og_image.as_deref(), Some("https://cdn.example/kettle.jpg"));
}

#[tokio::test]
async fn test_second_call_uses_cache() {
    let t = setup(&[(KETTLE_URL, KETTLE_PAGE)]).await;
    let item = t
        .store
        .insert_item(NewItem::new(1, "Kettle", KETTLE_URL))
        .await
        .unwrap();
    let uri = format!("/resolve-image?itemId={}", item.id);

    let (_, first) = get(&t.app, &uri).await;
    let (status, second) = get(&t.app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(t.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_image_is_null() {
    let t = setup(&[(KETTLE_URL, "<html><body>out of stock</body></html>")]).await;
    let item = t
        .store
        .insert_item(NewItem::new(1, "Kettle", KETTLE_URL))
        .await
        .unwrap();

    let (status, body) = get(&t.app, &format!("/resolve-image?itemId={}", item.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ogImage": null }));
}

#[tokio::test]
async fn test_unreachable_page_is_null() {
    let t = setup(&[]).await;
    let item = t
        .store
        .insert_item(NewItem::new(1, "Kettle", "https://gone.example/p/1"))
        .await
        .unwrap();

    let (status, body) = get(&t.app, &format!("/resolve-image?itemId={}", item.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ogImage"], Value::Null);
    assert_eq!(t.store.get_item(item.id).await.unwrap().unwrap().og_image, None);
}

#[tokio::test]
async fn test_missing_item_id() {
    let t = setup(&[]).await;

    let (status, body) = get(&t.app, "/resolve-image").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "itemId is required");
}

#[tokio::test]
async fn test_non_numeric_item_id() {
    let t = setup(&[]).await;

    let (status, body) = get(&t.app, "/resolve-image?itemId=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid itemId");
}

#[tokio::test]
async fn test_unknown_item() {
    let t = setup(&[]).await;

    let (status, body) = get(&t.app, "/resolve-image?itemId=404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
    assert_eq!(t.fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_health() {
    let t = setup(&[]).await;

    let (status, body) = get(&t.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

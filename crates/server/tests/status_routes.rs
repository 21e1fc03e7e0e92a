use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use service::errors::StoreError;
use service::status::StatusService;
use service::store::{MemoryStatusStore, StatusStore};
use tower::Service;

use server::routes::{build_router, AppState};

fn build_app(store: Arc<dyn StatusStore>, prefix: Option<&str>) -> Router {
    build_router(AppState::new(StatusService::new(store)), prefix)
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, String)> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

fn post_json(uri: &str, body: serde_json::Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?)
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method("GET").uri(uri).body(Body::empty())?)
}

struct RejectingStore;

#[async_trait]
impl StatusStore for RejectingStore {
    async fn set_status(&self, _key: &str, _value: &str) -> Result<bool, StoreError> { Ok(false) }
    async fn get_status(&self, _key: &str) -> Result<Option<String>, StoreError> { Ok(None) }
    fn backend(&self) -> &'static str { "rejecting" }
}

struct DownStore;

#[async_trait]
impl StatusStore for DownStore {
    async fn set_status(&self, _key: &str, _value: &str) -> Result<bool, StoreError> {
        Err(StoreError::Transport("Connection refused (os error 111)".into()))
    }
    async fn get_status(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Transport("Connection refused (os error 111)".into()))
    }
    fn backend(&self) -> &'static str { "down" }
}

#[tokio::test]
async fn import_status_round_trip() -> anyhow::Result<()> {
    let store = MemoryStatusStore::new();
    let app = build_app(store.clone(), None);

    let (status, body) = send(
        &app,
        post_json("/req1", json!({"service": "Import", "type": "Scalar", "requestId": "req1"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
    assert_eq!(store.get_status("req1:si:tsc").await?.as_deref(), Some("req1"));

    let (status, body) = send(&app, get("/import/Scalar/req1")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "req1");

    let (status, body) = send(&app, get("/import/scalar/req1")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "req1");

    let (status, body) = send(&app, get("/import/Scalar/unknown")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Status not found requestId:unknown");
    Ok(())
}

#[tokio::test]
async fn export_is_separate_from_import() -> anyhow::Result<()> {
    let app = build_app(MemoryStatusStore::new(), None);

    let (status, _) = send(
        &app,
        post_json("/ts-export", json!({"service": "Export", "type": "Vector", "requestId": "r2"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/export/Vector/r2")?).await?;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ts-export"));

    let (status, _) = send(&app, get("/import/Vector/r2")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn extension_status_round_trip() -> anyhow::Result<()> {
    let store = MemoryStatusStore::new();
    let app = build_app(store.clone(), None);

    let (status, _) = send(
        &app,
        post_json(
            "/ts-ext-9",
            json!({"service": "Extension", "extensionFunction": "Smooth", "type": "Grid", "requestId": "req9"}),
        )?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.get_status("req9:sx:tgr:esmooth").await?.as_deref(), Some("ts-ext-9"));

    let (status, body) = send(&app, get("/extension/Grid/Smooth/req9")?).await?;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ts-ext-9"));

    let (status, _) = send(&app, get("/extension/Grid/Sharpen/req9")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn later_post_overwrites() -> anyhow::Result<()> {
    let app = build_app(MemoryStatusStore::new(), None);
    let body = json!({"service": "Import", "type": "Grid", "requestId": "r"});

    send(&app, post_json("/a", body.clone())?).await?;
    send(&app, post_json("/b", body)?).await?;

    let (status, value) = send(&app, get("/import/Grid/r")?).await?;
    assert_eq!((status, value.as_str()), (StatusCode::OK, "b"));
    Ok(())
}

#[tokio::test]
async fn undecodable_body_is_500() -> anyhow::Result<()> {
    let store = MemoryStatusStore::new();
    let app = build_app(store.clone(), None);

    let req = Request::builder()
        .method("POST")
        .uri("/ts")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.is_empty());

    let (status, _) = send(&app, post_json("/ts", json!({"service": "Copy", "type": "Grid", "requestId": "r"}))?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(&app, post_json("/ts", json!({"service": "Extension", "type": "Grid", "requestId": "r"}))?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("extensionFunction"));

    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn rejected_write_is_400() -> anyhow::Result<()> {
    let app = build_app(Arc::new(RejectingStore), None);
    let (status, body) = send(
        &app,
        post_json("/ts", json!({"service": "Import", "type": "Scalar", "requestId": "req1"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Unable to set requestId:req1");
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_500() -> anyhow::Result<()> {
    let app = build_app(Arc::new(DownStore), None);

    let (status, body) = send(
        &app,
        post_json("/ts", json!({"service": "Import", "type": "Scalar", "requestId": "req1"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Connection refused"));

    let (status, _) = send(&app, get("/export/Scalar/req1")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // health does not depend on the store
    let (status, body) = send(&app, get("/public/hc")?).await?;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "OK"));
    Ok(())
}

#[tokio::test]
async fn health_routes() -> anyhow::Result<()> {
    let app = build_app(MemoryStatusStore::new(), None);
    for uri in ["/public/hc", "/hc"] {
        let (status, body) = send(&app, get(uri)?).await?;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, "OK");
    }
    Ok(())
}

#[tokio::test]
async fn routes_nest_under_prefix() -> anyhow::Result<()> {
    let app = build_app(MemoryStatusStore::new(), Some("/status"));

    let (status, _) = send(
        &app,
        post_json("/status/ts-1", json!({"service": "Import", "type": "Scalar", "requestId": "p1"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/status/import/Scalar/p1")?).await?;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ts-1"));

    let (status, _) = send(&app, get("/status/hc")?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get("/import/Scalar/p1")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn metrics_are_exposed() -> anyhow::Result<()> {
    server::observability::init_metrics();
    let app = build_app(MemoryStatusStore::new(), Some("/status"));
    send(&app, get("/status/import/Scalar/nothing")?).await?;

    let (status, body) = send(&app, get("/metrics")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("adapter_status_get_total"));
    assert!(body.contains("adapter_status_get_miss_total"));
    Ok(())
}

#[tokio::test]
async fn empty_stored_value_is_not_found() -> anyhow::Result<()> {
    let store = MemoryStatusStore::new();
    store.set_status("req1:si:tsc", "").await?;
    let app = build_app(store, None);

    let (status, body) = send(&app, get("/import/Scalar/req1")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Status not found requestId:req1");
    Ok(())
}

#[tokio::test]
async fn unreachable_redis_does_not_stop_startup() -> anyhow::Result<()> {
    let mut cfg = configs::AppConfig::default();
    cfg.store.redis.host = "127.0.0.1".into();
    cfg.store.redis.port = 1;
    let app = server::startup::build_app(&cfg).await?;

    let (status, body) = send(&app, get("/public/hc")?).await?;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "OK"));

    let (status, _) = send(&app, get("/import/Scalar/req1")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(
        &app,
        post_json("/ts", json!({"service": "Import", "type": "Scalar", "requestId": "req1"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

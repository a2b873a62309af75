use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::tempdir;
use termlink_core::persist::{save_meta, save_tables, MetaFile, TablePaths};
use termlink_core::{index_corpus, BackendParams};
use tower::ServiceExt;

fn build_tiny_tables(dir: &std::path::Path) {
    let lines = [
        "1~~{title::Gaussian distribution||category::Probability||description::central moments of a Gaussian}",
        "2~~{title::Naming policy||category::Governance||description::naming policy rules}",
    ];
    let tables = index_corpus(
        lines,
        BackendParams {
            max_multitoken: 2,
            ..BackendParams::default()
        },
    );
    let paths = TablePaths::new(dir);
    save_tables(&paths, &tables).unwrap();
    let meta = MetaFile {
        entity_count: 2,
        created_at: "2024-01-01T00:00:00Z".into(),
        version: 1,
    };
    save_meta(&paths, &meta).unwrap();
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn query_returns_result_text() {
    let dir = tempdir().unwrap();
    build_tiny_tables(dir.path());
    let app = termlink_server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (status, json) = get_json(app.clone(), "/query?q=gaussian%20distribution").await;
    assert_eq!(status, StatusCode::OK);
    let result = json["result"].as_str().unwrap();
    assert!(result.contains("gaussian~distribution"), "{result}");

    let (status, json) = get_json(app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["entity_count"].as_u64().unwrap(), 2);
    assert!(json["dictionary_size"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn command_queries_persist_across_requests() {
    let dir = tempdir().unwrap();
    build_tiny_tables(dir.path());
    let app = termlink_server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (status, json) = get_json(app.clone(), "/query?q=/show%20dict").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"].as_str().unwrap(), "Showing dictionary entries");

    let (_, json) = get_json(app, "/query?q=gaussian%20distribution").await;
    let result = json["result"].as_str().unwrap();
    assert!(result.contains(">>> RESULTS - SECTION: dict"), "{result}");
    assert!(!result.contains(">>> RESULTS - SECTION: titles"), "{result}");
}

#[tokio::test]
async fn entity_lookup_returns_content_and_agents() {
    let dir = tempdir().unwrap();
    build_tiny_tables(dir.path());
    let app = termlink_server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (status, json) = get_json(app.clone(), "/entity/2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["content"].as_str().unwrap().contains("Naming policy"));
    let agents: Vec<&str> = json["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(agents.contains(&"Policy"));

    let (_, json) = get_json(app, "/entity/99").await;
    assert_eq!(json["error"].as_str().unwrap(), "not found");
}

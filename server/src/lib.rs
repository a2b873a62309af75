use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use termlink_core::persist::{load_meta, load_tables, TablePaths};
use termlink_core::{process, BackendTables, EntityId, FrontendParams};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub took_s: f64,
    pub result: String,
}

#[derive(Clone)]
pub struct AppState {
    pub tables: Arc<BackendTables>,
    /// Frontend parameters survive across requests so command queries
    /// (`/show`, `/tune`, ...) configure subsequent searches.
    pub frontend: Arc<RwLock<FrontendParams>>,
    pub entity_count: u32,
}

pub fn build_app(table_dir: String) -> Result<Router> {
    // Load the full table set at startup; queries never touch disk.
    let paths = TablePaths::new(&table_dir);
    let tables = load_tables(&paths)?;
    let meta = load_meta(&paths)?;
    let state = AppState {
        tables: Arc::new(tables),
        frontend: Arc::new(RwLock::new(FrontendParams::default())),
        entity_count: meta.entity_count,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/query", get(query_handler))
        .route("/entity/:entity_id", get(entity_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "entity_count": state.entity_count,
        "dictionary_size": state.tables.dictionary.len(),
        "pair_count": state.tables.hash_pairs.len(),
    }))
}

pub async fn query_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<QueryResponse> {
    let start = std::time::Instant::now();
    let current = state.frontend.read().clone();
    let (result, updated) = process(&params.q, &state.tables, current);
    *state.frontend.write() = updated;
    let elapsed = start.elapsed();
    Json(QueryResponse {
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        result,
    })
}

pub async fn entity_handler(
    State(state): State<AppState>,
    Path(entity_id): Path<EntityId>,
) -> Json<serde_json::Value> {
    if let Some(content) = state.tables.id_to_content.get(&entity_id) {
        let mut agents: Vec<&String> = state
            .tables
            .id_to_agents
            .get(&entity_id)
            .map(|m| m.keys().collect())
            .unwrap_or_default();
        agents.sort();
        let size = state.tables.id_size.get(&entity_id).copied().unwrap_or(0);
        return Json(serde_json::json!({
            "entity_id": entity_id,
            "content": content,
            "size": size,
            "agents": agents,
        }));
    }
    Json(serde_json::json!({ "error": "not found" }))
}

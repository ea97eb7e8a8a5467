// src/api.rs
//! HTTP surface over one `PairEngine`.
//!
//! - `GET  /health`            → engine status
//! - `GET  /api/pairs?limit=N` → cached pairs (runs once when the cache is empty)
//! - `POST /api/pairs/refresh` → one run, result echoed back

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::engine::{EngineStatus, LoadOutcome, PairEngine};
use crate::pairing::Pair;

/// Hard upper bound for `?limit=`.
pub const MAX_LIMIT: usize = 500;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PairEngine>,
}

impl AppState {
    pub fn new(engine: Arc<PairEngine>) -> Self {
        Self { engine }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/pairs", get(list_pairs))
        .route("/api/pairs/refresh", post(refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthOut {
    ok: bool,
    #[serde(flatten)]
    status: EngineStatus,
}

async fn health(State(state): State<AppState>) -> Json<HealthOut> {
    Json(HealthOut {
        ok: true,
        status: state.engine.status(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct PairsQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct PairsOut {
    groups: Vec<Pair>,
}

async fn list_pairs(
    State(state): State<AppState>,
    Query(q): Query<PairsQuery>,
) -> Json<PairsOut> {
    let limit = q
        .limit
        .unwrap_or_else(|| state.engine.default_limit())
        .min(MAX_LIMIT);
    let groups = state.engine.get_or_load(limit).await;
    Json(PairsOut { groups })
}

#[derive(Serialize)]
struct RefreshOut {
    groups: Vec<Pair>,
    skipped: bool,
    error: Option<String>,
}

async fn refresh(State(state): State<AppState>) -> Json<RefreshOut> {
    let out = match state.engine.load().await {
        LoadOutcome::Completed { groups, .. } => RefreshOut {
            groups,
            skipped: false,
            error: None,
        },
        LoadOutcome::Recovered { error, groups } => RefreshOut {
            groups,
            skipped: false,
            error: Some(error),
        },
        LoadOutcome::Skipped => RefreshOut {
            groups: state.engine.read_default(),
            skipped: true,
            error: None,
        },
    };
    Json(out)
}

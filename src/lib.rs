// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod engine;
pub mod feed;
pub mod keywords;
pub mod metrics;
pub mod pairing;
pub mod sources;
pub mod timestamp;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::AppConfig;
pub use crate::engine::{DataReady, EngineConfig, LoadOutcome, PairEngine};
pub use crate::pairing::Pair;

use std::sync::Arc;

/// Build config, engine and router the way the binary does (without metrics).
///
/// ```ignore
/// let (engine, app) = headline_pairs::app()?;
/// engine.request_run();
/// ```
pub fn app() -> anyhow::Result<(Arc<PairEngine>, axum::Router)> {
    let cfg = AppConfig::load_default()?;
    let engine = Arc::new(PairEngine::from_config(&cfg)?);
    let router = api::router(api::AppState::new(Arc::clone(&engine)));
    Ok((engine, router))
}

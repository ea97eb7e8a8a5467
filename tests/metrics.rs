// tests/metrics.rs
// Installs the global Prometheus recorder, so it runs only with `--features strict-metrics`.
#![cfg(feature = "strict-metrics")]

use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use headline_pairs::config::AppConfig;
use headline_pairs::engine::{EngineConfig, PairEngine};
use headline_pairs::feed::types::{FeedProvider, FeedRequest, FeedResponse};
use headline_pairs::metrics::Metrics;

struct Down;

#[async_trait]
impl FeedProvider for Down {
    async fn fetch_groups(&self, _req: &FeedRequest) -> Result<FeedResponse> {
        bail!("down")
    }
    fn name(&self) -> &'static str {
        "down"
    }
}

#[tokio::test]
async fn metrics_endpoint_contains_expected_series() {
    let mut cfg = AppConfig::default();
    cfg.cache.max_size = 50;
    let metrics = Metrics::install(&cfg).expect("install recorder");
    let engine = PairEngine::new(Arc::new(Down), EngineConfig::default());
    engine.load().await;

    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    for series in [
        "pairs_runs_total",
        "pairs_run_failures_total",
        "pairs_run_ms",
        "pairs_cache_max_size",
        "pairs_default_limit",
    ] {
        assert!(text.contains(series), "missing {series} in:\n{text}");
    }
    assert!(metrics.render().contains("pairs_cache_max_size 50"));

    // second install in the same process is refused
    assert!(Metrics::install(&cfg).is_err());
}

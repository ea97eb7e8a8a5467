// src/metrics.rs
//! Prometheus exposition for the pair engine.
//!
//! The engine records through the `metrics` facade; this module only installs the
//! process-wide recorder (binary and the `strict-metrics` test) and serves it.

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::config::AppConfig;

pub const METRICS_PATH: &str = "/metrics";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the recorder and publish the static config gauges.
    /// A second install in the same process is an error.
    pub fn install(cfg: &AppConfig) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        gauge!("pairs_cache_max_size").set(cfg.cache.max_size as f64);
        gauge!("pairs_default_limit").set(cfg.params.limit as f64);

        Ok(Self { handle })
    }

    /// Current exposition text.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            METRICS_PATH,
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

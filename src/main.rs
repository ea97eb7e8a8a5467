//! Headline Pairs service: binary entrypoint.
//! Boots the Axum HTTP server around one `PairEngine` and kicks off the first run.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use headline_pairs::api::{self, AppState};
use headline_pairs::metrics::Metrics;
use headline_pairs::{AppConfig, PairEngine};

/// Install the tracing subscriber.
/// `RUST_LOG` overrides the default filter; `PAIRS_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("headline_pairs=info,warn"));

    let json = std::env::var("PAIRS_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    // The runtime may already have installed a subscriber; keep it in that case.
    let _ = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load_default()?;
    tracing::info!(
        side_a = %cfg.params.side_a_id,
        side_b = %cfg.params.side_b_id,
        feed = ?cfg.feed.kind,
        max_size = cfg.cache.max_size,
        "config loaded"
    );

    let metrics = Metrics::install(&cfg)?;
    let engine = Arc::new(PairEngine::from_config(&cfg)?);

    // Warm the cache in the background; requests arriving earlier wait for it.
    engine.request_run();

    let router = api::router(AppState::new(engine)).merge(metrics.router());
    Ok(router.into())
}

//! One-shot run: load config, fetch once, print the published pairs as JSON.

use headline_pairs::{AppConfig, LoadOutcome, PairEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = AppConfig::load_default()?;
    let engine = PairEngine::from_config(&cfg)?;

    let groups = match engine.load().await {
        LoadOutcome::Completed { fresh, groups } => {
            tracing::info!(fresh, "run completed");
            groups
        }
        LoadOutcome::Recovered { error, groups } => {
            tracing::warn!(%error, "run failed");
            groups
        }
        LoadOutcome::Skipped => Vec::new(),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "groups": groups }))?
    );
    Ok(())
}

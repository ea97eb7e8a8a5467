//! # Pair Engine
//! Run coordinator around the pairing pipeline:
//! fetch → classify by source → freshness indexes → pairs → merge cache → publish.
//!
//! One engine owns one merge cache and one in-flight flag. At most one `load()` body
//! runs at a time; overlapping calls return `LoadOutcome::Skipped` immediately.
//! Fetch failures never escape: they are logged and the last-known-good cache is
//! published instead.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;
use tokio::sync::watch;

use crate::config::{AppConfig, RunParams};
use crate::feed::types::FeedProvider;
use crate::keywords::parse_forced_keywords;
use crate::pairing::{build_indexes, build_pairs, MergeCache, Pair};
use crate::sources::SourceClassifier;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pairs_runs_total", "Pipeline runs started.");
        describe_counter!(
            "pairs_runs_skipped_total",
            "Load requests dropped because a run was in flight."
        );
        describe_counter!(
            "pairs_run_failures_total",
            "Runs that fell back to the cached pairs."
        );
        describe_gauge!("pairs_cache_size", "Pairs held by the merge cache.");
        describe_gauge!("pairs_shared_keywords", "Shared keywords in the last run.");
        describe_histogram!("pairs_run_ms", "Run duration in milliseconds.");
    });
}

/// Engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub params: RunParams,
    pub max_size: usize,
    pub classifier: SourceClassifier,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let params = RunParams::default();
        let classifier = SourceClassifier::for_ids(&params.side_a_id, &params.side_b_id);
        Self {
            params,
            max_size: crate::pairing::cache::DEFAULT_MAX_SIZE,
            classifier,
        }
    }
}

impl EngineConfig {
    pub fn from_app(cfg: &AppConfig) -> Self {
        let classifier = SourceClassifier::from_cfg(
            cfg.sources.clone(),
            &cfg.params.side_a_id,
            &cfg.params.side_b_id,
        );
        Self {
            params: cfg.params.clone(),
            max_size: cfg.cache.max_size,
            classifier,
        }
    }
}

/// Payload of the data-ready notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataReady {
    pub groups: Vec<Pair>,
}

/// Why a run could not produce fresh pairs.
#[derive(Debug)]
pub enum RunFailure {
    /// Transport or HTTP status failure.
    Transport(anyhow::Error),
    /// The provider answered without a success flag.
    Payload(String),
}

impl RunFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            RunFailure::Transport(_) => "transport",
            RunFailure::Payload(_) => "payload",
        }
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunFailure::Transport(e) => write!(f, "feed transport failed: {e:#}"),
            RunFailure::Payload(msg) => write!(f, "feed payload unsuccessful: {msg}"),
        }
    }
}

/// Result of a `load()` call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Run finished; `fresh` pairs came from this run, `groups` is what was published.
    Completed { fresh: usize, groups: Vec<Pair> },
    /// Fetch failed; the cached pairs were republished.
    Recovered { error: String, groups: Vec<Pair> },
    /// Another run was in flight; nothing happened.
    Skipped,
}

impl LoadOutcome {
    pub fn groups(&self) -> Option<&[Pair]> {
        match self {
            LoadOutcome::Completed { groups, .. } | LoadOutcome::Recovered { groups, .. } => {
                Some(groups)
            }
            LoadOutcome::Skipped => None,
        }
    }
}

/// Summary of the last finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatus {
    pub finished_at: DateTime<Utc>,
    pub ok: bool,
    pub fresh: usize,
    pub published: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub in_flight: bool,
    pub cache_size: usize,
    pub last_run: Option<RunStatus>,
}

/// Clears the in-flight flag when the run ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PairEngine {
    provider: Arc<dyn FeedProvider>,
    cfg: EngineConfig,
    forced: BTreeSet<String>,
    cache: RwLock<MergeCache>,
    status: RwLock<Option<RunStatus>>,
    in_flight: AtomicBool,
    ready: watch::Sender<DataReady>,
}

impl PairEngine {
    pub fn new(provider: Arc<dyn FeedProvider>, cfg: EngineConfig) -> Self {
        ensure_metrics_described();
        let forced = parse_forced_keywords(&cfg.params.keywords);
        let (ready, _) = watch::channel(DataReady::default());
        Self {
            provider,
            forced,
            cache: RwLock::new(MergeCache::with_capacity(cfg.max_size)),
            status: RwLock::new(None),
            in_flight: AtomicBool::new(false),
            ready,
            cfg,
        }
    }

    /// Build provider and engine from application config.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let provider = cfg.feed.build_provider()?;
        Ok(Self::new(provider, EngineConfig::from_app(cfg)))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Default number of pairs handed out by `read_default` / `get_or_load`.
    pub fn default_limit(&self) -> usize {
        self.cfg.params.limit
    }

    fn cache_read(&self) -> RwLockReadGuard<'_, MergeCache> {
        self.cache.read().unwrap_or_else(|p| p.into_inner())
    }

    fn cache_write(&self) -> RwLockWriteGuard<'_, MergeCache> {
        self.cache.write().unwrap_or_else(|p| p.into_inner())
    }

    /// Top `limit` cached pairs, freshest first. Never mutates.
    pub fn read(&self, limit: usize) -> Vec<Pair> {
        self.cache_read().read(limit)
    }

    pub fn read_default(&self) -> Vec<Pair> {
        self.read(self.default_limit())
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            in_flight: self.is_in_flight(),
            cache_size: self.cache_read().len(),
            last_run: self.status.read().unwrap_or_else(|p| p.into_inner()).clone(),
        }
    }

    /// Receiver for data-ready notifications (latest value only).
    pub fn subscribe(&self) -> watch::Receiver<DataReady> {
        self.ready.subscribe()
    }

    /// Drop all cached pairs and the run history.
    pub fn reset(&self) {
        self.cache_write().clear();
        *self.status.write().unwrap_or_else(|p| p.into_inner()) = None;
        self.ready.send_replace(DataReady::default());
        gauge!("pairs_cache_size").set(0.0);
    }

    /// One full run. Returns `Skipped` if another run is active.
    pub async fn load(&self) -> LoadOutcome {
        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            counter!("pairs_runs_skipped_total").increment(1);
            tracing::debug!(target: "engine", "run already in flight; skipped");
            return LoadOutcome::Skipped;
        };

        counter!("pairs_runs_total").increment(1);
        let t0 = Instant::now();
        tracing::debug!(target: "engine", provider = self.provider.name(), "run started");

        let outcome = match self.run_pipeline().await {
            Ok(pairs) => {
                let fresh = pairs.len();
                let (stats, groups, cache_size) = {
                    let mut cache = self.cache_write();
                    let stats = cache.upsert(pairs);
                    (stats, cache.read(self.default_limit()), cache.len())
                };
                gauge!("pairs_cache_size").set(cache_size as f64);
                tracing::info!(
                    target: "engine",
                    fresh,
                    inserted = stats.inserted,
                    replaced = stats.replaced,
                    evicted = stats.evicted,
                    cache = cache_size,
                    "run finished"
                );
                self.record_status(true, fresh, groups.len(), None);
                LoadOutcome::Completed { fresh, groups }
            }
            Err(failure) => {
                counter!("pairs_run_failures_total").increment(1);
                tracing::warn!(
                    target: "engine",
                    kind = failure.kind(),
                    provider = self.provider.name(),
                    error = %failure,
                    "run failed; republishing cached pairs"
                );
                let groups = self.read_default();
                let error = failure.to_string();
                self.record_status(false, 0, groups.len(), Some(error.clone()));
                LoadOutcome::Recovered { error, groups }
            }
        };

        histogram!("pairs_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        // flag is clear before any waiter observes the publication
        drop(guard);
        if let Some(groups) = outcome.groups() {
            self.ready.send_replace(DataReady {
                groups: groups.to_vec(),
            });
        }
        outcome
    }

    async fn run_pipeline(&self) -> Result<Vec<Pair>, RunFailure> {
        let req = self.cfg.params.feed_request();
        let resp = self
            .provider
            .fetch_groups(&req)
            .await
            .map_err(RunFailure::Transport)?;
        if !resp.ok {
            let msg = resp
                .error
                .clone()
                .unwrap_or_else(|| "response without success flag".to_string());
            return Err(RunFailure::Payload(msg));
        }

        let articles = resp.into_articles();
        let (side_a, side_b) = build_indexes(&articles, &self.cfg.classifier, &self.forced);
        let pairs = build_pairs(&side_a, &side_b);
        gauge!("pairs_shared_keywords").set(pairs.len() as f64);
        tracing::debug!(
            target: "engine",
            articles = articles.len(),
            side_a = side_a.len(),
            side_b = side_b.len(),
            shared = pairs.len(),
            "pairs built"
        );
        Ok(pairs)
    }

    fn record_status(&self, ok: bool, fresh: usize, published: usize, error: Option<String>) {
        let st = RunStatus {
            finished_at: Utc::now(),
            ok,
            fresh,
            published,
            error,
        };
        *self.status.write().unwrap_or_else(|p| p.into_inner()) = Some(st);
    }

    /// Start a background run unless one is active. Returns whether a run was spawned.
    pub fn request_run(self: &Arc<Self>) -> bool {
        if self.is_in_flight() {
            counter!("pairs_runs_skipped_total").increment(1);
            return false;
        }
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.load().await;
        });
        true
    }

    /// Cached pairs if any, otherwise run once (or wait for the active run) and read.
    pub async fn get_or_load(&self, limit: usize) -> Vec<Pair> {
        if !self.cache_read().is_empty() {
            return self.read(limit);
        }
        let mut rx = self.subscribe();
        if let LoadOutcome::Skipped = self.load().await {
            // the active run publishes after releasing the flag
            let _ = rx.changed().await;
        }
        self.read(limit)
    }
}

// src/config.rs
//! Application config: run parameters, cache bounds, source rules, feed provider.
//!
//! Lookup order:
//! 1) $PAIRS_CONFIG_PATH (must exist)
//! 2) config/pairs.toml
//! 3) config/pairs.json
//! 4) built-in defaults
//!
//! Env overrides applied afterwards: `PAIRS_FEED_URL`, `PAIRS_KEYWORDS`.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::feed::http::HttpFeedProvider;
use crate::feed::rss::{RssFeedProvider, RssSide};
use crate::feed::types::{FeedProvider, FeedRequest};
use crate::pairing::cache::DEFAULT_MAX_SIZE;
use crate::sources::SourcesCfg;

pub const ENV_CONFIG_PATH: &str = "PAIRS_CONFIG_PATH";
pub const ENV_FEED_URL: &str = "PAIRS_FEED_URL";
pub const ENV_KEYWORDS: &str = "PAIRS_KEYWORDS";

pub const DEFAULT_SIDE_A_ID: &str = "srf";
pub const DEFAULT_SIDE_B_ID: &str = "tagesschau";
pub const DEFAULT_LIMIT: usize = 20;

/// Parameters of a run, forwarded to the feed provider (except `keywords`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunParams {
    pub side_a_id: String,
    pub side_b_id: String,
    /// Feed item limit and default number of published pairs.
    pub limit: usize,
    pub query: String,
    pub threshold: String,
    /// Comma-separated forced keywords; empty means no restriction.
    pub keywords: String,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            side_a_id: DEFAULT_SIDE_A_ID.to_string(),
            side_b_id: DEFAULT_SIDE_B_ID.to_string(),
            limit: DEFAULT_LIMIT,
            query: String::new(),
            threshold: String::new(),
            keywords: String::new(),
        }
    }
}

impl RunParams {
    pub fn feed_request(&self) -> FeedRequest {
        FeedRequest {
            side_a_id: self.side_a_id.clone(),
            side_b_id: self.side_b_id.clone(),
            limit: self.limit,
            query: self.query.clone(),
            threshold: self.threshold.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheCfg {
    pub max_size: usize,
}

impl Default for CacheCfg {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Http,
    Rss,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedCfg {
    pub kind: FeedKind,
    pub base_url: String,
    pub timeout_secs: u64,
    pub side_a_label: String,
    pub side_a_url: String,
    pub side_b_label: String,
    pub side_b_url: String,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            kind: FeedKind::Http,
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 12,
            side_a_label: "SRF".to_string(),
            side_a_url: "https://www.srf.ch/news/bnf/rss/1646".to_string(),
            side_b_label: "tagesschau".to_string(),
            side_b_url: "https://www.tagesschau.de/index~rss2.xml".to_string(),
        }
    }
}

impl FeedCfg {
    /// Build the configured provider.
    pub fn build_provider(&self) -> Result<Arc<dyn FeedProvider>> {
        let timeout = Duration::from_secs(self.timeout_secs.max(1));
        let provider: Arc<dyn FeedProvider> = match self.kind {
            FeedKind::Http => Arc::new(HttpFeedProvider::new(&self.base_url, timeout)?),
            FeedKind::Rss => Arc::new(RssFeedProvider::new(
                RssSide::from_url(&self.side_a_label, &self.side_a_url),
                RssSide::from_url(&self.side_b_label, &self.side_b_url),
                timeout,
            )?),
        };
        Ok(provider)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub params: RunParams,
    pub cache: CacheCfg,
    pub sources: SourcesCfg,
    pub feed: FeedCfg,
}

impl AppConfig {
    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pairs config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing pairs config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let toml_p = PathBuf::from("config/pairs.toml");
            let json_p = PathBuf::from("config/pairs.json");
            if toml_p.exists() {
                Self::load_from(&toml_p)?
            } else if json_p.exists() {
                Self::load_from(&json_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_FEED_URL) {
            if !url.trim().is_empty() {
                self.feed.kind = FeedKind::Http;
                self.feed.base_url = url.trim().to_string();
            }
        }
        if let Ok(kw) = std::env::var(ENV_KEYWORDS) {
            self.params.keywords = kw;
        }
    }

    fn sanitized(mut self) -> Self {
        self.params.limit = self.params.limit.max(1);
        self.cache.max_size = self.cache.max_size.max(1);
        if self.params.side_a_id.trim().is_empty() {
            self.params.side_a_id = DEFAULT_SIDE_A_ID.to_string();
        }
        if self.params.side_b_id.trim().is_empty() {
            self.params.side_b_id = DEFAULT_SIDE_B_ID.to_string();
        }
        self
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid json");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!(toml_err))
            .context("invalid toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = parse_config(
            r#"
[params]
limit = 0
keywords = "gaza, rentner"

[sources.a]
contains = ["srf"]
"#,
            "toml",
        )
        .unwrap()
        .sanitized();
        assert_eq!(cfg.params.limit, 1);
        assert_eq!(cfg.params.side_a_id, "srf");
        assert_eq!(cfg.params.keywords, "gaza, rentner");
        assert_eq!(cfg.sources.a.contains, vec!["srf".to_string()]);
        assert!(cfg.sources.b.is_empty());
        assert_eq!(cfg.cache.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(cfg.feed.kind, FeedKind::Http);
    }

    #[test]
    fn json_config_and_feed_kind() {
        let cfg = parse_config(
            r#"{"feed": {"kind": "rss", "side_a_label": "NZZ"}, "cache": {"max_size": 5}}"#,
            "json",
        )
        .unwrap();
        assert_eq!(cfg.feed.kind, FeedKind::Rss);
        assert_eq!(cfg.feed.side_a_label, "NZZ");
        assert_eq!(cfg.cache.max_size, 5);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_config("[params\nlimit = ", "toml").is_err());
    }

    #[test]
    fn feed_request_forwards_params() {
        let p = RunParams {
            query: "gaza".into(),
            threshold: "0.2".into(),
            ..Default::default()
        };
        let r = p.feed_request();
        assert_eq!(r.side_a_id, "srf");
        assert_eq!(r.limit, 20);
        assert_eq!(r.query, "gaza");
        assert_eq!(r.threshold, "0.2");
    }
}

//! # Source Classifier
//!
//! Assigns each article to side A, side B, or neither, based on its free-text
//! `source` / publisher field.
//!
//! - Each side is a list of rules: exact match, prefix, substring, or an injected predicate.
//! - Comparison is case-insensitive with whitespace collapsed.
//! - Side A is tested first, so an article matching both sides belongs to A.
//! - Articles matching neither side are ignored for pairing.

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Which of the two compared streams an article belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

/// A single matching rule. Patterns are stored normalized.
#[derive(Clone)]
pub enum SourceRule {
    Exact(String),
    Prefix(String),
    Contains(String),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl fmt::Debug for SourceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRule::Exact(s) => write!(f, "Exact({s:?})"),
            SourceRule::Prefix(s) => write!(f, "Prefix({s:?})"),
            SourceRule::Contains(s) => write!(f, "Contains({s:?})"),
            SourceRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl SourceRule {
    pub fn exact(s: &str) -> Self {
        SourceRule::Exact(normalize(s))
    }

    pub fn prefix(s: &str) -> Self {
        SourceRule::Prefix(normalize(s))
    }

    pub fn contains(s: &str) -> Self {
        SourceRule::Contains(normalize(s))
    }

    /// Custom predicate; receives the normalized source string.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        SourceRule::Predicate(Arc::new(f))
    }

    fn matches(&self, source: &str) -> bool {
        match self {
            SourceRule::Exact(p) => !p.is_empty() && source == p,
            SourceRule::Prefix(p) => !p.is_empty() && source.starts_with(p.as_str()),
            SourceRule::Contains(p) => !p.is_empty() && source.contains(p.as_str()),
            SourceRule::Predicate(f) => f(source),
        }
    }
}

/// Rule lists as they appear in config (`[sources.a]`, `[sources.b]`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SideRulesCfg {
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub prefix: Vec<String>,
    #[serde(default)]
    pub contains: Vec<String>,
}

impl SideRulesCfg {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefix.is_empty() && self.contains.is_empty()
    }

    fn into_rules(self) -> Vec<SourceRule> {
        let mut rules = Vec::new();
        rules.extend(self.exact.iter().map(|s| SourceRule::exact(s)));
        rules.extend(self.prefix.iter().map(|s| SourceRule::prefix(s)));
        rules.extend(self.contains.iter().map(|s| SourceRule::contains(s)));
        rules
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesCfg {
    #[serde(default)]
    pub a: SideRulesCfg,
    #[serde(default)]
    pub b: SideRulesCfg,
}

/// Assigns articles to sides.
#[derive(Debug, Clone)]
pub struct SourceClassifier {
    side_a: Vec<SourceRule>,
    side_b: Vec<SourceRule>,
}

impl SourceClassifier {
    pub fn new(side_a: Vec<SourceRule>, side_b: Vec<SourceRule>) -> Self {
        Self { side_a, side_b }
    }

    /// Default matching for two source ids: side A by exact id, side B by substring.
    /// Feeds label the first stream tersely ("SRF") but the second descriptively
    /// ("tagesschau.de", "ARD-Tagesschau").
    pub fn for_ids(side_a_id: &str, side_b_id: &str) -> Self {
        Self::new(
            vec![SourceRule::exact(side_a_id)],
            vec![SourceRule::contains(side_b_id)],
        )
    }

    /// Build from config; an empty side falls back to the `for_ids` default for that side.
    pub fn from_cfg(cfg: SourcesCfg, side_a_id: &str, side_b_id: &str) -> Self {
        let fallback = Self::for_ids(side_a_id, side_b_id);
        let side_a = if cfg.a.is_empty() {
            fallback.side_a
        } else {
            cfg.a.into_rules()
        };
        let side_b = if cfg.b.is_empty() {
            fallback.side_b
        } else {
            cfg.b.into_rules()
        };
        Self::new(side_a, side_b)
    }

    pub fn classify(&self, source: &str) -> Option<Side> {
        let s = normalize(source);
        if s.is_empty() {
            return None;
        }
        if self.side_a.iter().any(|r| r.matches(&s)) {
            return Some(Side::A);
        }
        if self.side_b.iter().any(|r| r.matches(&s)) {
            return Some(Side::B);
        }
        None
    }
}

/// Lowercase and collapse whitespace.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

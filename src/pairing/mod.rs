// src/pairing/mod.rs
//! Freshness indexes, pair building and the cumulative merge cache.

pub mod builder;
pub mod cache;
pub mod freshness;

pub use builder::{build_pairs, display_keyword, MappedArticle, Pair, PairKey};
pub use cache::{MergeCache, UpsertStats};
pub use freshness::{build_indexes, FreshnessIndex};

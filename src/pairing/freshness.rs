// src/pairing/freshness.rs
//! Per-side index: keyword → the most recent article mentioning it.

use std::collections::{BTreeMap, BTreeSet};

use crate::feed::types::RawArticle;
use crate::keywords::title_keywords;
use crate::sources::{Side, SourceClassifier};

#[derive(Debug, Clone)]
struct Holder {
    ts: i64,
    article: RawArticle,
}

#[derive(Debug, Clone, Default)]
pub struct FreshnessIndex {
    by_keyword: BTreeMap<String, Holder>,
}

impl FreshnessIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `article` for each of its keywords. The holder is replaced only when the
    /// article is strictly newer; ties keep the incumbent.
    pub fn consider(&mut self, article: &RawArticle, keywords: &BTreeSet<String>) {
        let ts = article.resolved_ts();
        for kw in keywords {
            match self.by_keyword.get_mut(kw) {
                Some(h) if h.ts >= ts => {}
                Some(h) => {
                    h.ts = ts;
                    h.article = article.clone();
                }
                None => {
                    self.by_keyword.insert(
                        kw.clone(),
                        Holder {
                            ts,
                            article: article.clone(),
                        },
                    );
                }
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&RawArticle> {
        self.by_keyword.get(keyword).map(|h| &h.article)
    }

    /// Keywords in lexical order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.by_keyword.keys().map(String::as_str)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.by_keyword.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.by_keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_keyword.is_empty()
    }
}

/// Build both sides' indexes from a flat article pool.
/// Articles whose source matches neither side are skipped.
pub fn build_indexes(
    articles: &[RawArticle],
    classifier: &SourceClassifier,
    forced: &BTreeSet<String>,
) -> (FreshnessIndex, FreshnessIndex) {
    let mut side_a = FreshnessIndex::new();
    let mut side_b = FreshnessIndex::new();

    for art in articles {
        let Some(side) = classifier.classify(art.source.as_deref().unwrap_or_default()) else {
            continue;
        };
        let kws = title_keywords(&art.title, forced);
        if kws.is_empty() {
            continue;
        }
        match side {
            Side::A => side_a.consider(art, &kws),
            Side::B => side_b.consider(art, &kws),
        }
    }

    (side_a, side_b)
}

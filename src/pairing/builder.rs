// src/pairing/builder.rs
//! Pair builder: one pair per keyword both sides share, freshest first.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use super::freshness::FreshnessIndex;
use crate::feed::types::RawArticle;
use crate::timestamp::resolve_str;

/// Public article shape handed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub date: String,
}

impl From<&RawArticle> for MappedArticle {
    fn from(a: &RawArticle) -> Self {
        Self {
            title: a.title.clone(),
            url: a.url.clone().filter(|u| !u.is_empty()).unwrap_or_else(|| "#".to_string()),
            summary: a.summary.clone().unwrap_or_default(),
            date: a.timestamp().map(|t| t.as_text()).unwrap_or_default(),
        }
    }
}

impl MappedArticle {
    pub fn resolved_ts(&self) -> i64 {
        resolve_str(&self.date)
    }
}

/// Identity of a pair: keyword plus both URLs without fragments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub keyword: String,
    pub url_a: String,
    pub url_b: String,
}

impl PairKey {
    /// Short stable hex id (first 6 bytes of SHA-256 over the triple).
    pub fn short_id(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.keyword.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.url_a.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.url_b.as_bytes());
        let digest = hasher.finalize();
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub id: String,
    pub keyword: String,
    pub side_a: Option<MappedArticle>,
    pub side_b: Option<MappedArticle>,
}

impl Pair {
    pub fn new(
        keyword: impl Into<String>,
        side_a: Option<MappedArticle>,
        side_b: Option<MappedArticle>,
    ) -> Self {
        let mut pair = Self {
            id: String::new(),
            keyword: keyword.into(),
            side_a,
            side_b,
        };
        pair.id = pair.key().short_id();
        pair
    }

    pub fn key(&self) -> PairKey {
        let url = |m: &Option<MappedArticle>| {
            m.as_ref()
                .map(|a| strip_fragment(&a.url).to_string())
                .unwrap_or_default()
        };
        PairKey {
            keyword: self.keyword.clone(),
            url_a: url(&self.side_a),
            url_b: url(&self.side_b),
        }
    }

    /// Max of both sides' resolved timestamps; a missing side counts as 0.
    pub fn freshness(&self) -> i64 {
        let ts = |m: &Option<MappedArticle>| m.as_ref().map(MappedArticle::resolved_ts).unwrap_or(0);
        ts(&self.side_a).max(ts(&self.side_b))
    }
}

pub fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map(|(head, _)| head).unwrap_or(url)
}

/// `eu` → `EU`, `gaza` → `Gaza`.
pub fn display_keyword(kw: &str) -> String {
    if kw.chars().count() <= 3 {
        return kw.to_uppercase();
    }
    let mut chars = kw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sort in place, freshest first. Ties keep their relative order.
pub fn sort_by_freshness(pairs: &mut [Pair]) {
    pairs.sort_by_cached_key(|p| Reverse(p.freshness()));
}

/// Intersect both indexes and build one pair per shared keyword.
pub fn build_pairs(side_a: &FreshnessIndex, side_b: &FreshnessIndex) -> Vec<Pair> {
    let mut pairs: Vec<Pair> = side_a
        .keywords()
        .filter_map(|kw| {
            let b = side_b.get(kw)?;
            let a = side_a.get(kw)?;
            Some(Pair::new(
                display_keyword(kw),
                Some(MappedArticle::from(a)),
                Some(MappedArticle::from(b)),
            ))
        })
        .collect();
    sort_by_freshness(&mut pairs);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn art(title: &str, url: &str, published: &str) -> RawArticle {
        RawArticle {
            title: title.into(),
            url: Some(url.into()),
            published: Some(published.into()),
            ..Default::default()
        }
    }

    fn kws(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn display_keyword_casing() {
        assert_eq!(display_keyword("eu"), "EU");
        assert_eq!(display_keyword("usa"), "USA");
        assert_eq!(display_keyword("gaza"), "Gaza");
        assert_eq!(display_keyword(""), "");
    }

    #[test]
    fn identity_ignores_fragment_and_summary() {
        let a = MappedArticle {
            title: "t".into(),
            url: "https://a.test/x#comments".into(),
            summary: "one".into(),
            date: String::new(),
        };
        let mut a2 = a.clone();
        a2.url = "https://a.test/x".into();
        a2.summary = "two".into();
        let p1 = Pair::new("Gaza", Some(a), None);
        let p2 = Pair::new("Gaza", Some(a2), None);
        assert_eq!(p1.key(), p2.key());
        assert_eq!(p1.id, p2.id);
        assert_eq!(p1.id.len(), 12);
        assert_ne!(Pair::new("Krieg", p1.side_a.clone(), None).id, p1.id);
    }

    #[test]
    fn only_shared_keywords_become_pairs() {
        let mut a = FreshnessIndex::new();
        let mut b = FreshnessIndex::new();
        a.consider(&art("A1", "https://a/1", "2025-03-01 08:00"), &kws(&["gaza", "krieg", "wahl"]));
        b.consider(&art("B1", "https://b/1", "2025-03-01 09:00"), &kws(&["gaza", "zoll"]));
        b.consider(&art("B2", "https://b/2", "2025-03-01 11:00"), &kws(&["wahl"]));

        let pairs = build_pairs(&a, &b);
        let names: Vec<_> = pairs.iter().map(|p| p.keyword.as_str()).collect();
        assert_eq!(names, vec!["Wahl", "Gaza"]);
        assert_eq!(pairs[0].side_b.as_ref().unwrap().title, "B2");
        assert!(pairs.windows(2).all(|w| w[0].freshness() >= w[1].freshness()));
    }

    #[test]
    fn missing_side_counts_as_epoch() {
        let p = Pair::new("X", None, None);
        assert_eq!(p.freshness(), 0);
        let m = MappedArticle::from(&RawArticle::default());
        assert_eq!(m.url, "#");
        assert_eq!(m.date, "");
    }
}

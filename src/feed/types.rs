// src/feed/types.rs
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp::{self, Timestamp};

/// Feeds send `null` where a value is missing; treat it like an absent field.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// One article as delivered by a feed. Read-only to the pairing core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArticle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, alias = "publisher")]
    pub source: Option<String>,
    #[serde(default)]
    pub published: Option<Timestamp>,
    #[serde(default)]
    pub date: Option<Timestamp>,
}

impl RawArticle {
    /// `published`, falling back to `date`.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        self.published.as_ref().or(self.date.as_ref())
    }

    /// Resolved timestamp in Unix millis (0 if missing/unparseable).
    pub fn resolved_ts(&self) -> i64 {
        timestamp::resolve(self.timestamp())
    }
}

/// Pass-through parameters for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub side_a_id: String,
    pub side_b_id: String,
    pub limit: usize,
    pub query: String,
    pub threshold: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub left: Vec<RawArticle>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub right: Vec<RawArticle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<FeedGroup>,
}

/// Envelope returned by a feed provider: `{ ok, data: { groups }, error }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(default)]
    pub data: Option<FeedData>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FeedResponse {
    pub fn success(groups: Vec<FeedGroup>) -> Self {
        Self {
            ok: true,
            data: Some(FeedData { groups }),
            error: None,
        }
    }

    /// Every article of every group, left and right alike. Group boundaries carry no meaning.
    pub fn into_articles(self) -> Vec<RawArticle> {
        self.data
            .map(|d| {
                d.groups
                    .into_iter()
                    .flat_map(|g| g.left.into_iter().chain(g.right))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetch raw groups. Transport and status failures come back as `Err`.
    async fn fetch_groups(&self, req: &FeedRequest) -> Result<FeedResponse>;
    fn name(&self) -> &'static str;
}

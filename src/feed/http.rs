// src/feed/http.rs
//! JSON feed provider: `GET {base}/api/feeds?left=&right=&limit=&q=&thr=`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::feed::types::{FeedProvider, FeedRequest, FeedResponse};

pub struct HttpFeedProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFeedProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("headline-pairs/0.1 (+github.com/lumlich/headline-pairs)")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .context("building feed http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/feeds", self.base_url)
    }
}

/// Query pairs for a request; empty values are left out.
pub fn query_pairs(req: &FeedRequest) -> Vec<(&'static str, String)> {
    [
        ("left", req.side_a_id.to_lowercase()),
        ("right", req.side_b_id.to_lowercase()),
        ("limit", req.limit.to_string()),
        ("q", req.query.clone()),
        ("thr", req.threshold.clone()),
    ]
    .into_iter()
    .filter(|(_, v)| !v.is_empty())
    .collect()
}

#[async_trait]
impl FeedProvider for HttpFeedProvider {
    async fn fetch_groups(&self, req: &FeedRequest) -> Result<FeedResponse> {
        let url = self.endpoint();
        let resp = self
            .client
            .get(&url)
            .query(&query_pairs(req))
            .header("cache-control", "no-store")
            .send()
            .await
            .with_context(|| format!("request failed for {url}"))?
            .error_for_status()
            .with_context(|| format!("http error for {url}"))?;

        let body: FeedResponse = resp
            .json()
            .await
            .with_context(|| format!("decoding feed json from {url}"))?;
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_values_are_skipped() {
        let req = FeedRequest {
            side_a_id: "SRF".into(),
            side_b_id: "tagesschau".into(),
            limit: 20,
            query: String::new(),
            threshold: "0.3".into(),
        };
        let q = query_pairs(&req);
        assert_eq!(
            q,
            vec![
                ("left", "srf".to_string()),
                ("right", "tagesschau".to_string()),
                ("limit", "20".to_string()),
                ("thr", "0.3".to_string()),
            ]
        );
    }

    #[test]
    fn endpoint_has_no_double_slash() {
        let p = HttpFeedProvider::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(p.endpoint(), "http://localhost:5000/api/feeds");
    }
}

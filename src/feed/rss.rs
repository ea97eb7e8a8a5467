// src/feed/rss.rs
//! RSS provider: reads one RSS 2.0 feed per side and returns them as a single group.

use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, macros::format_description, OffsetDateTime, UtcOffset};

use crate::feed::types::{FeedGroup, FeedProvider, FeedRequest, FeedResponse, RawArticle};
use crate::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// `pubDate` (RFC 2822) → `YYYY-MM-DD HH:MM` in UTC. Unparseable dates become `None`.
fn format_pub_date(ts: &str) -> Option<String> {
    let dt = OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()?
        .to_offset(UtcOffset::UTC);
    dt.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .ok()
}

fn unescape(s: Option<&str>) -> String {
    html_escape::decode_html_entities(s.unwrap_or_default())
        .trim()
        .to_string()
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&bdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Parse an RSS document into articles tagged with `label` as their source.
pub fn parse_items(xml: &str, label: &str, limit: usize) -> Result<Vec<RawArticle>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).with_context(|| format!("parsing {label} rss xml"))?;

    let out = rss
        .channel
        .item
        .into_iter()
        .filter(|it| it.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .take(limit)
        .map(|it| RawArticle {
            title: unescape(it.title.as_deref()),
            url: it.link.map(|l| l.trim().to_string()),
            summary: Some(unescape(it.description.as_deref())),
            source: Some(label.to_string()),
            published: it
                .pub_date
                .as_deref()
                .and_then(format_pub_date)
                .map(Timestamp::Text),
            date: None,
        })
        .collect();
    Ok(out)
}

enum Mode {
    Fixture(String),
    Http(String),
}

/// One side of the RSS provider.
pub struct RssSide {
    label: String,
    mode: Mode,
}

impl RssSide {
    pub fn from_url(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            mode: Mode::Http(url.to_string()),
        }
    }

    pub fn from_fixture(label: &str, xml: &str) -> Self {
        Self {
            label: label.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }
}

pub struct RssFeedProvider {
    side_a: RssSide,
    side_b: RssSide,
    client: reqwest::Client,
}

impl RssFeedProvider {
    pub fn new(side_a: RssSide, side_b: RssSide, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("headline-pairs/0.1 (+github.com/lumlich/headline-pairs)")
            .timeout(timeout)
            .build()
            .context("building rss http client")?;
        Ok(Self {
            side_a,
            side_b,
            client,
        })
    }

    async fn fetch_side(&self, side: &RssSide, limit: usize) -> Result<Vec<RawArticle>> {
        match &side.mode {
            Mode::Fixture(xml) => parse_items(xml, &side.label, limit),
            Mode::Http(url) => {
                let body = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("{} rss get()", side.label))?
                    .error_for_status()
                    .with_context(|| format!("{} rss status", side.label))?
                    .text()
                    .await
                    .with_context(|| format!("{} rss .text()", side.label))?;
                parse_items(&body, &side.label, limit)
            }
        }
    }
}

#[async_trait]
impl FeedProvider for RssFeedProvider {
    async fn fetch_groups(&self, req: &FeedRequest) -> Result<FeedResponse> {
        let limit = req.limit.max(1);
        let (left, right) = tokio::try_join!(
            self.fetch_side(&self.side_a, limit),
            self.fetch_side(&self.side_b, limit)
        )?;
        tracing::debug!(
            target: "feed",
            left = left.len(),
            right = right.len(),
            "rss feeds parsed"
        );
        Ok(FeedResponse::success(vec![FeedGroup { left, right }]))
    }

    fn name(&self) -> &'static str {
        "rss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>t</title>
<item><title>Gaza-Krieg &ndash; Lage eskaliert</title><link> https://example.test/a#top </link>
<pubDate>Sat, 01 Mar 2025 13:00:00 +0100</pubDate><description>&lt;p&gt;Text&lt;/p&gt;</description></item>
<item><title>   </title><link>https://example.test/empty</link></item>
<item><title>Zweiter Artikel</title><link>https://example.test/b</link><pubDate>kaputt</pubDate></item>
</channel></rss>"#;

    #[test]
    fn parses_items_and_dates() {
        let items = parse_items(XML, "SRF", 10).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Gaza-Krieg - Lage eskaliert");
        assert_eq!(items[0].url.as_deref(), Some("https://example.test/a#top"));
        assert_eq!(items[0].source.as_deref(), Some("SRF"));
        assert_eq!(
            items[0].published,
            Some(Timestamp::Text("2025-03-01 12:00".into()))
        );
        assert_eq!(items[1].published, None);
    }

    #[test]
    fn limit_applies_per_side() {
        let items = parse_items(XML, "SRF", 1).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn empty_channel_is_ok() {
        let xml = r#"<rss version="2.0"><channel><title>x</title></channel></rss>"#;
        assert!(parse_items(xml, "x", 5).unwrap().is_empty());
    }
}

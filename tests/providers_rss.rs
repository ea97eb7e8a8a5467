// tests/providers_rss.rs
//
// RSS provider over on-disk fixtures, then the full pipeline on top of it.

use std::sync::Arc;
use std::time::Duration;

use headline_pairs::engine::{EngineConfig, LoadOutcome, PairEngine};
use headline_pairs::feed::rss::{parse_items, RssFeedProvider, RssSide};
use headline_pairs::feed::types::{FeedProvider, FeedRequest};
use headline_pairs::timestamp::Timestamp;

const SRF: &str = include_str!("fixtures/srf_rss.xml");
const TAGESSCHAU: &str = include_str!("fixtures/tagesschau_rss.xml");

fn provider() -> RssFeedProvider {
    RssFeedProvider::new(
        RssSide::from_fixture("SRF", SRF),
        RssSide::from_fixture("tagesschau", TAGESSCHAU),
        Duration::from_secs(1),
    )
    .expect("build rss provider")
}

fn request(limit: usize) -> FeedRequest {
    FeedRequest {
        side_a_id: "srf".into(),
        side_b_id: "tagesschau".into(),
        limit,
        query: String::new(),
        threshold: String::new(),
    }
}

#[test]
fn fixture_items_are_tagged_and_dated() {
    let items = parse_items(SRF, "SRF", 10).expect("parse srf fixture");
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|a| a.source.as_deref() == Some("SRF")));
    assert_eq!(
        items[0].published,
        Some(Timestamp::Text("2025-03-01 08:00".into()))
    );
    assert_eq!(
        items[0].summary.as_deref(),
        Some("<p>Die Lage im Nahen Osten spitzt sich zu.</p>")
    );
}

#[tokio::test]
async fn one_group_with_both_sides_and_limit() {
    let resp = provider().fetch_groups(&request(2)).await.expect("fetch");
    assert!(resp.ok);
    let groups = resp.data.expect("data").groups;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].left.len(), 2);
    assert_eq!(groups[0].right.len(), 2);
    assert_eq!(groups[0].right[0].title, "Krieg in Gaza geht weiter");
}

#[tokio::test]
async fn broken_side_is_a_transport_error() {
    let p = RssFeedProvider::new(
        RssSide::from_fixture("SRF", SRF),
        RssSide::from_fixture("tagesschau", "<rss><channel><item>"),
        Duration::from_secs(1),
    )
    .unwrap();
    assert!(p.fetch_groups(&request(5)).await.is_err());
}

#[tokio::test]
async fn fixtures_pair_up_end_to_end() {
    let engine = PairEngine::new(Arc::new(provider()), EngineConfig::default());
    let LoadOutcome::Completed { fresh, groups } = engine.load().await else {
        panic!("fixture run should complete");
    };
    assert_eq!(fresh, 3);
    let kws: Vec<_> = groups.iter().map(|p| p.keyword.as_str()).collect();
    assert_eq!(kws, vec!["Gaza", "Krieg", "Rentner"]);

    let rentner = &groups[2];
    assert_eq!(
        rentner.side_a.as_ref().unwrap().url,
        "https://www.srf.ch/news/schweiz/rentnerinnen-protest"
    );
    assert_eq!(
        rentner.side_b.as_ref().unwrap().title,
        "Rentner fordern höhere Bezüge"
    );
}

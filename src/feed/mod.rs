// src/feed/mod.rs
//! Feed providers: the raw article wire shape and the two transports (JSON API, RSS).

pub mod http;
pub mod rss;
pub mod types;

pub use http::HttpFeedProvider;
pub use rss::{RssFeedProvider, RssSide};
pub use types::{FeedGroup, FeedProvider, FeedRequest, FeedResponse, RawArticle};

//! Feed module for gator.
//!
//! This module provides the feed store (feeds and follows) and the remote
//! feed fetcher.

pub mod fetcher;
pub mod repository;
pub mod types;

pub use fetcher::{decode_entities, parse_feed, validate_url, FeedSource, HttpFeedFetcher};
pub use repository::{FeedFollowRepository, FeedRepository};
pub use types::{
    Feed, FeedFollow, FeedWithOwner, FollowView, NewFeed, RemoteFeed, RemoteItem,
};

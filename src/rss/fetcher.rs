//! Remote feed fetcher.
//!
//! Fetching is a pure transform from URL to [`RemoteFeed`]: one GET request,
//! no retries, no persistence. Parsing is split out so it can be exercised
//! against canned documents.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::model::Link;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::rss::types::{RemoteFeed, RemoteItem};
use crate::{GatorError, Result};

/// Longest entity name (between `&` and `;`) that is still decoded.
const MAX_ENTITY_LEN: usize = 10;

/// Source of remote feed documents.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed at `url`, giving up after `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<RemoteFeed>;
}

/// HTTP feed fetcher.
pub struct HttpFeedFetcher {
    client: Client,
    max_feed_size: u64,
}

impl HttpFeedFetcher {
    /// Create a new fetcher from the fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GatorError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
        })
    }

    async fn fetch_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        if !response.status().is_success() {
            return Err(GatorError::Fetch(format!(
                "HTTP error from {}: {}",
                url,
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_feed_size {
                return Err(GatorError::Fetch(format!(
                    "feed too large: {} bytes (max {} bytes)",
                    content_length, self.max_feed_size
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        if bytes.len() as u64 > self.max_feed_size {
            return Err(GatorError::Fetch(format!(
                "feed too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_feed_size
            )));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl FeedSource for HttpFeedFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<RemoteFeed> {
        validate_url(url)?;

        debug!(url, timeout_secs = timeout.as_secs(), "fetching feed");
        let bytes = self.fetch_bytes(url, timeout).await?;

        let feed = parse_feed(&bytes)?;
        info!(url, items = feed.items.len(), "feed fetched");
        Ok(feed)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> GatorError {
    if e.is_timeout() {
        GatorError::Fetch(format!("request to {} timed out", url))
    } else {
        GatorError::Fetch(format!("failed to fetch {}: {}", url, e))
    }
}

/// Check that a URL is an absolute http(s) URL with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| GatorError::Fetch(format!("invalid URL {}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(GatorError::Fetch(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    if parsed.host().is_none() {
        return Err(GatorError::Fetch(format!("URL has no host: {}", url)));
    }

    Ok(())
}

/// Parse feed bytes into a [`RemoteFeed`], decoding HTML entities in every
/// title and description.
pub fn parse_feed(bytes: &[u8]) -> Result<RemoteFeed> {
    let feed =
        parser::parse(bytes).map_err(|e| GatorError::Parse(format!("failed to parse feed: {}", e)))?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| RemoteItem {
            title: entry
                .title
                .map(|t| decode_entities(&t.content))
                .unwrap_or_default(),
            link: primary_link(&entry.links),
            description: entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .map(|d| decode_entities(&d))
                .unwrap_or_default(),
            published_at: entry.published.or(entry.updated),
        })
        .collect();

    Ok(RemoteFeed {
        title: feed
            .title
            .map(|t| decode_entities(&t.content))
            .unwrap_or_default(),
        link: primary_link(&feed.links),
        description: feed
            .description
            .map(|d| decode_entities(&d.content))
            .unwrap_or_default(),
        items,
    })
}

/// Pick the link pointing at the site rather than at the feed itself.
///
/// Prefers `rel="alternate"` or a link without `rel`, then the first link.
fn primary_link(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default()
}

/// Decode HTML character entities.
///
/// Handles the common named entities plus decimal and hexadecimal numeric
/// references. Anything unrecognised is copied through unchanged.
pub fn decode_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        let decoded = tail
            .as_bytes()
            .iter()
            .take(MAX_ENTITY_LEN + 1)
            .position(|&b| b == b';')
            .and_then(|end| decode_entity(&tail[..end]).map(|c| (end, c)));

        match decoded {
            Some((end, c)) => {
                result.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                result.push('&');
                rest = tail;
            }
        }
    }

    result.push_str(rest);
    result
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "lsquo" => Some('‘'),
        "rsquo" => Some('’'),
        "ldquo" => Some('“'),
        "rdquo" => Some('”'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "trade" => Some('™'),
        _ => parse_numeric_entity(entity).and_then(char::from_u32),
    }
}

/// Parse a numeric HTML entity (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if entity.starts_with("#x") || entity.starts_with("#X") {
        u32::from_str_radix(&entity[2..], 16).ok()
    } else if let Some(decimal) = entity.strip_prefix('#') {
        decimal.parse().ok()
    } else {
        None
    }
}

//! Test helpers for integration tests.
//!
//! Provides TestApp, which drives the command registry against an in-memory
//! database, a memory session and canned feed documents.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use gator::config::FetchConfig;
use gator::rss::{parse_feed, RemoteFeed};
use gator::{
    CommandContext, CommandRegistry, Database, FeedSource, GatorError, MemorySession, Result,
    SessionStore,
};

/// Canned RSS document whose channel title carries an entity.
pub const TOM_AND_JERRY_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Tom &amp; Jerry</title>
    <link>https://example.com/</link>
    <description>Cat &amp;amp; mouse</description>
    <item>
      <title>Episode &#49;</title>
      <link>https://example.com/1</link>
      <description>&amp;lt;b&amp;gt;Chase&amp;lt;/b&amp;gt;</description>
      <pubDate>Mon, 06 Jan 2025 10:00:00 +0000</pubDate>
    </item>
  </channel>
</rss>"#;

/// Feed source serving canned documents by URL.
///
/// Documents go through the real parser, so entity decoding is exercised.
#[derive(Default)]
pub struct CannedSource {
    documents: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl CannedSource {
    pub fn with_document(mut self, url: &str, body: &str) -> Self {
        self.documents.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for CannedSource {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<RemoteFeed> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self
            .documents
            .get(url)
            .ok_or_else(|| GatorError::Fetch(format!("connection refused: {url}")))?;
        parse_feed(body)
    }
}

/// Test application.
pub struct TestApp {
    pub db: Database,
    pub session: MemorySession,
    pub source: CannedSource,
    pub fetch: FetchConfig,
    pub registry: CommandRegistry,
}

impl TestApp {
    /// Create a fresh app with the default commands.
    pub async fn new() -> Self {
        Self::with_registry(CommandRegistry::with_default_commands()).await
    }

    /// Create a fresh app with a custom registry.
    pub async fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            db: Database::open_in_memory().await.unwrap(),
            session: MemorySession::new(),
            source: CannedSource::default(),
            fetch: FetchConfig::default(),
            registry,
        }
    }

    /// Run one command and return what it printed.
    pub async fn run(&mut self, verb: &str, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let mut out = Vec::new();
        let mut ctx = CommandContext::new(
            &self.db,
            &mut self.session,
            &self.source,
            &self.fetch,
            &mut out,
        );
        self.registry.dispatch(&mut ctx, verb, &args).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    /// Run one command that must succeed.
    pub async fn ok(&mut self, verb: &str, args: &[&str]) -> String {
        match self.run(verb, args).await {
            Ok(out) => out,
            Err(e) => panic!("{verb} {args:?} failed: {e}"),
        }
    }

    /// Name of the current user.
    pub fn current_user(&self) -> Option<&str> {
        self.session.current_user()
    }
}

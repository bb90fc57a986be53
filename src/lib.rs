//! Gator - command-line RSS feed aggregator.
//!
//! Users register, log in, add and follow feeds, and fetch remote feeds.
//! Every invocation runs exactly one command through the
//! [`CommandRegistry`].

pub mod auth;
pub mod cli;
pub mod command;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod rss;

pub use auth::{FileSession, MemorySession, SessionStore};
pub use command::{CommandContext, CommandRegistry};
pub use config::Config;
pub use db::{Database, User, UserRepository};
pub use error::{GatorError, Result};
pub use rss::{FeedSource, HttpFeedFetcher};

//! Per-invocation command context.

use std::io::Write;
use std::time::Duration;

use crate::auth::SessionStore;
use crate::config::FetchConfig;
use crate::db::Database;
use crate::rss::FeedSource;

/// Everything a command handler may touch.
///
/// Built once per invocation by the caller and passed by reference to the
/// handler, so handlers never reach for global state.
pub struct CommandContext<'a> {
    /// Storage.
    pub db: &'a Database,
    /// Current-user session.
    pub session: &'a mut dyn SessionStore,
    /// Remote feed source used by `agg`.
    pub fetcher: &'a dyn FeedSource,
    /// Fetch settings.
    pub fetch: &'a FetchConfig,
    /// User-facing output.
    pub out: &'a mut dyn Write,
}

impl<'a> CommandContext<'a> {
    /// Create a new context.
    pub fn new(
        db: &'a Database,
        session: &'a mut dyn SessionStore,
        fetcher: &'a dyn FeedSource,
        fetch: &'a FetchConfig,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            db,
            session,
            fetcher,
            fetch,
            out,
        }
    }

    /// Timeout for a single feed fetch.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}

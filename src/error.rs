//! Error types for gator.

use thiserror::Error;

/// Common error type for gator.
#[derive(Error, Debug)]
pub enum GatorError {
    /// No handler is registered under the requested verb.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Missing or malformed positional arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The session names no user, or a user that no longer exists.
    #[error("not logged in: run `gator login <name>` or `gator register <name>` first")]
    NotAuthenticated,

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A user with this name is already registered.
    #[error("user already exists: {0}")]
    DuplicateIdentity(String),

    /// A feed with this URL is already registered.
    #[error("feed URL already registered: {0}")]
    DuplicateFeedUrl(String),

    /// The user already follows the feed.
    #[error("{user} already follows {feed}")]
    DuplicateFollow {
        /// Name of the following user.
        user: String,
        /// Name of the followed feed.
        feed: String,
    },

    /// Transport-level failure while fetching a remote feed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Remote document could not be parsed as a feed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Storage engine error.
    ///
    /// Errors from sqlx are converted into this variant automatically.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GatorError {
    /// Process exit code for this error.
    ///
    /// Usage errors exit with 2, everything else with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GatorError::UnknownCommand(_) | GatorError::InvalidArguments(_) => 2,
            _ => 1,
        }
    }
}

impl From<sqlx::Error> for GatorError {
    fn from(e: sqlx::Error) -> Self {
        GatorError::Storage(e.to_string())
    }
}

/// Result type alias for gator operations.
pub type Result<T> = std::result::Result<T, GatorError>;

//! Session storage for gator.
//!
//! A session is nothing more than the name of the current user. Commands
//! receive the store explicitly through their context; nothing reads the
//! session from global state.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::Result;

/// Persistent record of which user is current.
pub trait SessionStore {
    /// Name of the current user, if any.
    fn current_user(&self) -> Option<&str>;

    /// Make `name` the current user.
    fn set_current_user(&mut self, name: &str) -> Result<()>;

    /// Forget the current user.
    fn clear(&mut self) -> Result<()>;
}

/// Session kept in the configuration file.
///
/// Every change rewrites the file so the next invocation sees it.
#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    config: Config,
}

impl FileSession {
    /// Open the session stored in the config file at `path`.
    ///
    /// A missing file is an empty session; it is created on the first change.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = Config::load_or_default(&path)?;
        Ok(Self { path, config })
    }

    /// Path of the backing config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        self.config.save(&self.path)?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }
}

impl SessionStore for FileSession {
    fn current_user(&self) -> Option<&str> {
        self.config.session.current_user_name.as_deref()
    }

    fn set_current_user(&mut self, name: &str) -> Result<()> {
        self.config.session.current_user_name = Some(name.to_string());
        self.persist()
    }

    fn clear(&mut self) -> Result<()> {
        if self.config.session.current_user_name.take().is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

/// In-memory session.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    current: Option<String>,
}

impl MemorySession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with `name` already current.
    pub fn with_user(name: impl Into<String>) -> Self {
        Self {
            current: Some(name.into()),
        }
    }
}

impl SessionStore for MemorySession {
    fn current_user(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn set_current_user(&mut self, name: &str) -> Result<()> {
        self.current = Some(name.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}

//! Authentication module for gator.
//!
//! This module provides the session store and the middleware that resolves
//! the current user before identity-bound commands run.

mod middleware;
mod session;

pub use middleware::{resolve_identity, RequireIdentity};
pub use session::{FileSession, MemorySession, SessionStore};

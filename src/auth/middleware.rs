//! Auth middleware for identity-bound commands.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::session::SessionStore;
use crate::command::{AuthenticatedHandler, CommandContext, CommandHandler};
use crate::db::{Database, User, UserRepository};
use crate::{GatorError, Result};

/// Resolve the session's current user against the identity store.
///
/// An empty session and a session naming a user that no longer exists are
/// both [`GatorError::NotAuthenticated`].
pub async fn resolve_identity(db: &Database, session: &dyn SessionStore) -> Result<User> {
    let name = session
        .current_user()
        .filter(|name| !name.trim().is_empty())
        .ok_or(GatorError::NotAuthenticated)?;

    match UserRepository::new(db.pool()).find_by_name(name).await? {
        Some(user) => {
            debug!(user = %user.name, "identity resolved");
            Ok(user)
        }
        None => {
            warn!(user = name, "session names an unknown user");
            Err(GatorError::NotAuthenticated)
        }
    }
}

/// Adapter turning an [`AuthenticatedHandler`] into a [`CommandHandler`].
///
/// The inner handler only runs once the current user has been resolved.
pub struct RequireIdentity {
    inner: Box<dyn AuthenticatedHandler>,
}

impl RequireIdentity {
    /// Wrap `handler`.
    pub fn new<H>(handler: H) -> Self
    where
        H: AuthenticatedHandler + 'static,
    {
        Self {
            inner: Box::new(handler),
        }
    }
}

#[async_trait(?Send)]
impl CommandHandler for RequireIdentity {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
        let user = resolve_identity(ctx.db, &*ctx.session).await?;
        self.inner.run(ctx, args, &user).await
    }
}

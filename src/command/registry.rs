//! Command registry for gator.
//!
//! Verbs map to one of two handler kinds. Anonymous handlers see only the
//! context; identity-bound handlers also receive the resolved [`User`] and
//! can only be registered through [`CommandRegistry::register_authenticated`],
//! which wraps them in [`RequireIdentity`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::context::CommandContext;
use super::{agg, feed, user};
use crate::auth::RequireIdentity;
use crate::db::User;
use crate::rss::validate_url;
use crate::{GatorError, Result};

/// Handler that runs without an identity.
#[async_trait(?Send)]
pub trait CommandHandler {
    /// Run the command with its positional arguments.
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()>;
}

/// Handler that runs on behalf of the current user.
#[async_trait(?Send)]
pub trait AuthenticatedHandler {
    /// Run the command as `user`.
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String], user: &User)
        -> Result<()>;
}

/// A registered command.
enum Registered {
    Anonymous(Box<dyn CommandHandler>),
    Authenticated(RequireIdentity),
}

impl Registered {
    fn handler(&self) -> &dyn CommandHandler {
        match self {
            Registered::Anonymous(handler) => handler.as_ref(),
            Registered::Authenticated(handler) => handler as &dyn CommandHandler,
        }
    }
}

/// Table of verbs and their handlers.
///
/// Built once at startup and only read afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Registered>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in verb.
    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();

        registry.register("register", user::Register);
        registry.register("login", user::Login);
        registry.register("reset", user::Reset);
        registry.register("users", user::Users);

        registry.register_authenticated("addfeed", feed::AddFeed);
        registry.register("feeds", feed::Feeds);
        registry.register_authenticated("follow", feed::Follow);
        registry.register_authenticated("following", feed::Following);
        registry.register_authenticated("unfollow", feed::Unfollow);

        registry.register("agg", agg::Agg);

        registry
    }

    /// Register an anonymous handler, replacing any previous one.
    pub fn register<H>(&mut self, name: &str, handler: H)
    where
        H: CommandHandler + 'static,
    {
        self.insert(name, Registered::Anonymous(Box::new(handler)));
    }

    /// Register an identity-bound handler behind the auth middleware.
    pub fn register_authenticated<H>(&mut self, name: &str, handler: H)
    where
        H: AuthenticatedHandler + 'static,
    {
        self.insert(
            name,
            Registered::Authenticated(RequireIdentity::new(handler)),
        );
    }

    fn insert(&mut self, name: &str, entry: Registered) {
        if self.commands.insert(name.to_string(), entry).is_some() {
            warn!(verb = name, "command registered twice, replacing");
        }
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Whether `name` needs a logged-in user, `None` if unknown.
    pub fn requires_identity(&self, name: &str) -> Option<bool> {
        self.commands
            .get(name)
            .map(|entry| matches!(entry, Registered::Authenticated(_)))
    }

    /// Registered verbs in sorted order.
    pub fn verbs(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Look up `name` and run its handler.
    pub async fn dispatch(
        &self,
        ctx: &mut CommandContext<'_>,
        name: &str,
        args: &[String],
    ) -> Result<()> {
        let entry = self
            .commands
            .get(name)
            .ok_or_else(|| GatorError::UnknownCommand(name.to_string()))?;

        debug!(verb = name, args = args.len(), "dispatching command");
        entry.handler().run(ctx, args).await
    }
}

/// Check that at least `count` non-blank positional arguments were given.
///
/// Extra arguments are ignored. Returns the first `count` arguments.
pub fn require_args<'a>(args: &'a [String], count: usize, usage: &str) -> Result<&'a [String]> {
    if args.len() < count {
        return Err(GatorError::InvalidArguments(format!("usage: {usage}")));
    }

    let required = &args[..count];
    if required.iter().any(|arg| arg.trim().is_empty()) {
        return Err(GatorError::InvalidArguments(format!(
            "arguments must not be empty; usage: {usage}"
        )));
    }

    Ok(required)
}

/// Check that a URL argument is an absolute http(s) URL.
///
/// A malformed URL is bad input, not a fetch failure.
pub fn require_url(url: &str) -> Result<()> {
    validate_url(url).map_err(|e| match e {
        GatorError::Fetch(msg) => GatorError::InvalidArguments(msg),
        other => other,
    })
}

//! Command layer for gator.
//!
//! This module provides the command registry, the per-invocation context and
//! the handlers for every built-in verb.

mod agg;
mod context;
mod feed;
mod registry;
mod user;

pub use context::CommandContext;
pub use registry::{
    require_args, require_url, AuthenticatedHandler, CommandHandler, CommandRegistry,
};

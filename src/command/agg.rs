//! `agg [url]`: fetch one remote feed and print its structure.

use async_trait::async_trait;
use tracing::info;

use super::context::CommandContext;
use super::registry::{require_url, CommandHandler};
use crate::{GatorError, Result};

/// Fetches the given URL, or the configured default feed.
pub struct Agg;

#[async_trait(?Send)]
impl CommandHandler for Agg {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String]) -> Result<()> {
        let url = match args.first() {
            Some(url) if url.trim().is_empty() => {
                return Err(GatorError::InvalidArguments(
                    "usage: agg [url]".to_string(),
                ));
            }
            Some(url) => url.clone(),
            None => ctx.fetch.default_url.clone(),
        };
        require_url(&url)?;

        let feed = ctx.fetcher.fetch(&url, ctx.fetch_timeout()).await?;
        info!(url = %url, items = feed.items.len(), "aggregated feed");

        writeln!(ctx.out, "Title: {}", feed.title)?;
        writeln!(ctx.out, "Link: {}", feed.link)?;
        writeln!(ctx.out, "Description: {}", feed.description)?;
        writeln!(ctx.out, "Items")?;
        for item in &feed.items {
            writeln!(ctx.out, "Item Title: {}", item.title)?;
            writeln!(ctx.out, "Item Link: {}", item.link)?;
            writeln!(ctx.out, "Item Description: {}", item.description)?;
            match item.published_at {
                Some(date) => writeln!(ctx.out, "Item Publish Date: {}", date.to_rfc2822())?,
                None => writeln!(ctx.out, "Item Publish Date: unknown")?,
            }
        }
        Ok(())
    }
}

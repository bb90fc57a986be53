//! Feed verbs: addfeed, feeds, follow, following, unfollow.

use async_trait::async_trait;
use tracing::info;

use super::context::CommandContext;
use super::registry::{require_args, require_url, AuthenticatedHandler, CommandHandler};
use crate::db::User;
use crate::rss::{FeedFollowRepository, FeedRepository, NewFeed};
use crate::{GatorError, Result};

/// `addfeed <name> <url>`: register a feed and follow it.
pub struct AddFeed;

#[async_trait(?Send)]
impl AuthenticatedHandler for AddFeed {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String], user: &User) -> Result<()> {
        let args = require_args(args, 2, "addfeed <name> <url>")?;
        let (name, url) = (&args[0], &args[1]);
        require_url(url)?;

        let new_feed = NewFeed::new(name.as_str(), url.as_str(), user.id);
        let (feed, follow) = FeedRepository::new(ctx.db.pool())
            .create_and_follow(&new_feed)
            .await?;
        info!(user = %user.name, url = %feed.url, "feed added");

        writeln!(ctx.out, "Added feed {}", feed.name)?;
        writeln!(ctx.out, "ID: {}", feed.id)?;
        writeln!(ctx.out, "URL: {}", feed.url)?;
        writeln!(ctx.out, "{} now follows {}", follow.user_name, follow.feed_name)?;
        Ok(())
    }
}

/// `feeds`: list every feed with the user who added it.
pub struct Feeds;

#[async_trait(?Send)]
impl CommandHandler for Feeds {
    async fn run(&self, ctx: &mut CommandContext<'_>, _args: &[String]) -> Result<()> {
        let feeds = FeedRepository::new(ctx.db.pool()).list_with_owner().await?;

        for entry in feeds {
            writeln!(
                ctx.out,
                "* {} ({}) added by {}",
                entry.feed.name, entry.feed.url, entry.owner_name
            )?;
        }
        Ok(())
    }
}

/// `follow <url>`: follow an existing feed.
pub struct Follow;

#[async_trait(?Send)]
impl AuthenticatedHandler for Follow {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String], user: &User) -> Result<()> {
        let url = &require_args(args, 1, "follow <url>")?[0];

        let feed = FeedRepository::new(ctx.db.pool()).get_by_url(url).await?;
        let follow = FeedFollowRepository::new(ctx.db.pool())
            .create(user.id, feed.id)
            .await?;
        info!(user = %user.name, url = %feed.url, "feed followed");

        writeln!(ctx.out, "{} now follows {}", follow.user_name, follow.feed_name)?;
        Ok(())
    }
}

/// `following`: list the feeds the current user follows.
pub struct Following;

#[async_trait(?Send)]
impl AuthenticatedHandler for Following {
    async fn run(
        &self,
        ctx: &mut CommandContext<'_>,
        _args: &[String],
        user: &User,
    ) -> Result<()> {
        let follows = FeedFollowRepository::new(ctx.db.pool())
            .list_for_user(user.id)
            .await?;

        for follow in follows {
            writeln!(ctx.out, "* {}", follow.feed_name)?;
        }
        Ok(())
    }
}

/// `unfollow <url>`: stop following a feed.
pub struct Unfollow;

#[async_trait(?Send)]
impl AuthenticatedHandler for Unfollow {
    async fn run(&self, ctx: &mut CommandContext<'_>, args: &[String], user: &User) -> Result<()> {
        let url = &require_args(args, 1, "unfollow <url>")?[0];

        let feed = FeedRepository::new(ctx.db.pool()).get_by_url(url).await?;
        let removed = FeedFollowRepository::new(ctx.db.pool())
            .delete(user.id, feed.id)
            .await?;
        if !removed {
            return Err(GatorError::NotFound(format!(
                "follow of {} by {}",
                feed.url, user.name
            )));
        }

        writeln!(ctx.out, "{} unfollowed {}", user.name, feed.name)?;
        Ok(())
    }
}

//! Feed repositories for gator.
//!
//! The feed store: feeds and the follow relation between users and feeds.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{
    Feed, FeedFollow, FeedRow, FeedWithOwner, FeedWithOwnerRow, FollowView, NewFeed,
};
use crate::db::{is_unique_violation, parse_datetime, parse_id, DbPool};
use crate::{GatorError, Result};

/// Row type for follows joined with user and feed names.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FollowViewRow {
    id: String,
    user_id: String,
    feed_id: String,
    created_at: String,
    updated_at: String,
    feed_name: String,
    user_name: String,
}

impl TryFrom<FollowViewRow> for FollowView {
    type Error = GatorError;

    fn try_from(row: FollowViewRow) -> Result<Self> {
        Ok(FollowView {
            follow: FeedFollow {
                id: parse_id(&row.id)?,
                user_id: parse_id(&row.user_id)?,
                feed_id: parse_id(&row.feed_id)?,
                created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
                updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
            },
            feed_name: row.feed_name,
            user_name: row.user_name,
        })
    }
}

const FOLLOW_VIEW_SELECT: &str = r#"
    SELECT ff.id, ff.user_id, ff.feed_id, ff.created_at, ff.updated_at,
           f.name AS feed_name, u.name AS user_name
    FROM feed_follows ff
    JOIN feeds f ON f.id = ff.feed_id
    JOIN users u ON u.id = ff.user_id
"#;

/// Insert a feed row, mapping a URL collision to `DuplicateFeedUrl`.
async fn insert_feed(conn: &mut SqliteConnection, new_feed: &NewFeed) -> Result<Feed> {
    let now = Utc::now();
    let feed = Feed {
        id: Uuid::new_v4(),
        name: new_feed.name.clone(),
        url: new_feed.url.clone(),
        user_id: new_feed.user_id,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO feeds (id, name, url, user_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(feed.id.to_string())
    .bind(&feed.name)
    .bind(&feed.url)
    .bind(feed.user_id.to_string())
    .bind(feed.created_at.to_rfc3339())
    .bind(feed.updated_at.to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            GatorError::DuplicateFeedUrl(new_feed.url.clone())
        } else {
            GatorError::from(e)
        }
    })?;

    Ok(feed)
}

/// Insert a follow edge and return the joined view.
///
/// A second follow of the same pair fails with `DuplicateFollow`.
async fn insert_follow(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    feed_id: Uuid,
) -> Result<FollowView> {
    let follow = FeedFollow::new(user_id, feed_id);

    let inserted = sqlx::query(
        r#"
        INSERT INTO feed_follows (id, user_id, feed_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(follow.id.to_string())
    .bind(follow.user_id.to_string())
    .bind(follow.feed_id.to_string())
    .bind(follow.created_at.to_rfc3339())
    .bind(follow.updated_at.to_rfc3339())
    .execute(&mut *conn)
    .await;

    match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            let names: Option<(String, String)> = sqlx::query_as(
                "SELECT u.name, f.name FROM users u, feeds f WHERE u.id = $1 AND f.id = $2",
            )
            .bind(user_id.to_string())
            .bind(feed_id.to_string())
            .fetch_optional(&mut *conn)
            .await?;
            let (user, feed) =
                names.unwrap_or_else(|| (user_id.to_string(), feed_id.to_string()));
            return Err(GatorError::DuplicateFollow { user, feed });
        }
        Err(e) => return Err(e.into()),
    }

    let query = format!("{FOLLOW_VIEW_SELECT} WHERE ff.id = $1");
    let row = sqlx::query_as::<_, FollowViewRow>(&query)
        .bind(follow.id.to_string())
        .fetch_one(&mut *conn)
        .await?;

    FollowView::try_from(row)
}

/// Repository for feed operations.
pub struct FeedRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new feed.
    ///
    /// Fails with [`GatorError::DuplicateFeedUrl`] if the URL is registered.
    pub async fn create(&self, new_feed: &NewFeed) -> Result<Feed> {
        let mut conn = self.pool.acquire().await?;
        let feed = insert_feed(&mut conn, new_feed).await?;
        debug!(feed = %feed.name, url = %feed.url, "feed created");
        Ok(feed)
    }

    /// Create a feed and have its creator follow it, atomically.
    ///
    /// Either both rows are written or neither is.
    pub async fn create_and_follow(&self, new_feed: &NewFeed) -> Result<(Feed, FollowView)> {
        let mut tx = self.pool.begin().await?;

        let feed = insert_feed(&mut tx, new_feed).await?;
        let follow = insert_follow(&mut tx, new_feed.user_id, feed.id).await?;

        tx.commit().await?;

        info!(feed = %feed.name, url = %feed.url, user = %follow.user_name, "feed added");
        Ok((feed, follow))
    }

    /// Get a feed by URL.
    pub async fn get_by_url(&self, url: &str) -> Result<Feed> {
        self.find_by_url(url)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("feed {url}")))
    }

    /// Look up a feed by URL, `None` if absent.
    pub async fn find_by_url(&self, url: &str) -> Result<Option<Feed>> {
        let row = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT id, name, url, user_id, created_at, updated_at
            FROM feeds
            WHERE url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(self.pool)
        .await?;

        row.map(Feed::try_from).transpose()
    }

    /// Get a feed by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Feed>> {
        let row = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT id, name, url, user_id, created_at, updated_at
            FROM feeds
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(Feed::try_from).transpose()
    }

    /// List all feeds with owner names, in registration order.
    pub async fn list_with_owner(&self) -> Result<Vec<FeedWithOwner>> {
        let rows = sqlx::query_as::<_, FeedWithOwnerRow>(
            r#"
            SELECT f.id, f.name, f.url, f.user_id, f.created_at, f.updated_at,
                   u.name AS owner_name
            FROM feeds f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.rowid ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(FeedWithOwner::try_from).collect()
    }

    /// Count all feeds.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feeds")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

/// Repository for follow operations.
pub struct FeedFollowRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedFollowRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Make a user follow a feed.
    ///
    /// Fails with [`GatorError::DuplicateFollow`] if the pair already exists.
    pub async fn create(&self, user_id: Uuid, feed_id: Uuid) -> Result<FollowView> {
        let mut conn = self.pool.acquire().await?;
        let view = insert_follow(&mut conn, user_id, feed_id).await?;
        debug!(user = %view.user_name, feed = %view.feed_name, "follow created");
        Ok(view)
    }

    /// List the follows of a user, oldest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<FollowView>> {
        let query = format!("{FOLLOW_VIEW_SELECT} WHERE ff.user_id = $1 ORDER BY ff.rowid ASC");
        let rows = sqlx::query_as::<_, FollowViewRow>(&query)
            .bind(user_id.to_string())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(FollowView::try_from).collect()
    }

    /// Remove a follow edge.
    ///
    /// Returns true if an edge was removed.
    pub async fn delete(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feed_follows WHERE user_id = $1 AND feed_id = $2")
            .bind(user_id.to_string())
            .bind(feed_id.to_string())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

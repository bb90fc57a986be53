//! Feed types for gator.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{parse_datetime, parse_id};
use crate::{GatorError, Result};

/// A registered feed. The URL is unique across all users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Feed ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// User who added the feed.
    pub user_id: Uuid,
    /// When the feed was created.
    pub created_at: DateTime<Utc>,
    /// When the feed was last updated.
    pub updated_at: DateTime<Utc>,
}

/// New feed for creation.
#[derive(Debug, Clone)]
pub struct NewFeed {
    /// Display name.
    pub name: String,
    /// Feed URL.
    pub url: String,
    /// User adding the feed.
    pub user_id: Uuid,
}

impl NewFeed {
    /// Create a new feed request.
    pub fn new(name: impl Into<String>, url: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user_id,
        }
    }
}

/// Feed joined with the name of the user who added it.
#[derive(Debug, Clone)]
pub struct FeedWithOwner {
    /// The feed.
    pub feed: Feed,
    /// Name of the owning user.
    pub owner_name: String,
}

/// A follow edge between a user and a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFollow {
    /// Follow ID.
    pub id: Uuid,
    /// Following user.
    pub user_id: Uuid,
    /// Followed feed.
    pub feed_id: Uuid,
    /// When the follow was created.
    pub created_at: DateTime<Utc>,
    /// When the follow was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FeedFollow {
    /// Build a fresh follow edge with a new ID.
    pub fn new(user_id: Uuid, feed_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            feed_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Follow joined with user and feed names for display.
#[derive(Debug, Clone)]
pub struct FollowView {
    /// The follow edge.
    pub follow: FeedFollow,
    /// Name of the followed feed.
    pub feed_name: String,
    /// Name of the following user.
    pub user_name: String,
}

/// Feed document as fetched from the remote source. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFeed {
    /// Channel title (entities decoded).
    pub title: String,
    /// Channel link.
    pub link: String,
    /// Channel description (entities decoded).
    pub description: String,
    /// Items in document order.
    pub items: Vec<RemoteItem>,
}

/// A single item of a [`RemoteFeed`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteItem {
    /// Item title (entities decoded).
    pub title: String,
    /// Item link.
    pub link: String,
    /// Item description (entities decoded).
    pub description: String,
    /// Publish date.
    ///
    /// `None` when the item has no date or its date is not in a format the
    /// parser understands (RFC 2822 or RFC 3339 and common variants); the raw
    /// text is not kept.
    pub published_at: Option<DateTime<Utc>>,
}

/// Row type for feeds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct FeedRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<FeedRow> for Feed {
    type Error = GatorError;

    fn try_from(row: FeedRow) -> Result<Self> {
        Ok(Feed {
            id: parse_id(&row.id)?,
            name: row.name,
            url: row.url,
            user_id: parse_id(&row.user_id)?,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        })
    }
}

/// Row type for feeds joined with the owner name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct FeedWithOwnerRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub owner_name: String,
}

impl TryFrom<FeedWithOwnerRow> for FeedWithOwner {
    type Error = GatorError;

    fn try_from(row: FeedWithOwnerRow) -> Result<Self> {
        let feed = Feed::try_from(FeedRow {
            id: row.id,
            name: row.name,
            url: row.url,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })?;
        Ok(FeedWithOwner {
            feed,
            owner_name: row.owner_name,
        })
    }
}

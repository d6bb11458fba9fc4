//! Domain records and their wire DTOs. Every mutable resource carries an
//! owner id fixed at creation; the ownership guard compares against it and
//! nothing ever rewrites it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TweetKind {
    Tweet,
    Reply,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub handle: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Tweet {
    pub id: Uuid,
    pub content: String,
    pub kind: TweetKind,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tweet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub id: Uuid,
    pub content: String,
    pub kind: TweetKind,
    pub user_id: Uuid,
    pub tweet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// `follower_id` follows `user_id`. The edge's owner is the follower, the
/// actor that created it.
#[derive(Debug, Clone)]
pub struct FollowerEdge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub follower_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- wire DTOs ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub handle: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserDto {
    fn from(u: &User) -> Self {
        UserDto {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            handle: u.handle.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetDto {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TweetKind,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub like_count: usize,
    pub liked_by_current_user: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tweet_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub liked: bool,
    pub like_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyDto {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TweetKind,
    pub user_id: Uuid,
    pub tweet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Reply> for ReplyDto {
    fn from(r: &Reply) -> Self {
        ReplyDto {
            id: r.id,
            content: r.content.clone(),
            kind: r.kind,
            user_id: r.user_id,
            tweet_id: r.tweet_id,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowerDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub follower_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&FollowerEdge> for FollowerDto {
    fn from(e: &FollowerEdge) -> Self {
        FollowerDto { id: e.id, user_id: e.user_id, follower_id: e.follower_id, created_at: e.created_at }
    }
}

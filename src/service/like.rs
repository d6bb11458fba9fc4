//! Likes: one per (user, tweet) pair. A scoped miss on delete reports
//! NotFound, identical for an absent id and a foreign-owned one.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{resolve_owner, Identity};
use crate::error::{AppError, AppResult};
use crate::model::{Like, LikeDto};
use crate::store::Stores;

fn to_dto(stores: &Stores, like: &Like, liked: bool) -> LikeDto {
    LikeDto {
        id: like.id,
        user_id: like.user_id,
        tweet_id: like.tweet_id,
        created_at: like.created_at,
        liked,
        like_count: stores.likes.count_for_tweet(like.tweet_id),
    }
}

pub fn create(identity: &Identity, stores: &Stores, tweet_id: Uuid, user_id: Option<Uuid>) -> AppResult<LikeDto> {
    let owner = resolve_owner(identity, user_id)?;
    if !stores.users.exists(owner) {
        return Err(AppError::not_found("user_not_found", "user not found"));
    }
    if !stores.tweets.exists(tweet_id) {
        return Err(AppError::not_found("tweet_not_found", "tweet not found"));
    }
    if stores.likes.pair_exists(owner, tweet_id) {
        return Err(AppError::conflict("already_liked", "like already exists, unlike to remove it"));
    }
    let like = Like { id: Uuid::new_v4(), user_id: owner, tweet_id, created_at: Utc::now() };
    stores.likes.insert(like.clone());
    tracing::info!(like = %like.id, tweet = %tweet_id, user = %owner, "like.create");
    Ok(to_dto(stores, &like, true))
}

pub fn remove(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<LikeDto> {
    let removed = stores
        .likes
        .remove_owned(id, identity.sub)
        .ok_or_else(|| AppError::not_found("like_not_found", "like not found or not owned by the authenticated user"))?;
    Ok(to_dto(stores, &removed, false))
}

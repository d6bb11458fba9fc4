//! Tweet CRUD. Scoped misses on the single-row operations report Forbidden:
//! whether the id is absent or belongs to someone else, the caller learns
//! only that the operation was denied.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{resolve_owner, Identity};
use crate::error::{AppError, AppResult};
use crate::model::{Tweet, TweetDto, TweetKind};
use crate::store::Stores;

fn denied(action: &str) -> AppError {
    AppError::Forbidden {
        code: "not_owner".into(),
        message: format!("access denied: you cannot {} this tweet", action),
    }
}

fn to_dto(stores: &Stores, tweet: &Tweet, viewer: Uuid) -> TweetDto {
    TweetDto {
        id: tweet.id,
        content: tweet.content.clone(),
        kind: tweet.kind,
        user_id: tweet.user_id,
        created_at: tweet.created_at,
        updated_at: tweet.updated_at,
        like_count: stores.likes.count_for_tweet(tweet.id),
        liked_by_current_user: stores.likes.liked_by(tweet.id, viewer),
    }
}

pub fn create(identity: &Identity, stores: &Stores, content: String, user_id: Option<Uuid>) -> AppResult<TweetDto> {
    let owner = resolve_owner(identity, user_id)?;
    if !stores.users.exists(owner) {
        return Err(AppError::not_found("user_not_found", "user not found"));
    }
    let now = Utc::now();
    let tweet = Tweet {
        id: Uuid::new_v4(),
        content,
        kind: TweetKind::Tweet,
        user_id: owner,
        created_at: now,
        updated_at: now,
    };
    let dto = to_dto(stores, &tweet, identity.sub);
    stores.tweets.insert(tweet);
    tracing::info!(tweet = %dto.id, user = %owner, "tweet.create");
    Ok(dto)
}

/// The timeline view: all tweets, annotated with the viewer's like state.
pub fn find_all(identity: &Identity, stores: &Stores, kind: Option<TweetKind>) -> Vec<TweetDto> {
    stores
        .tweets
        .list(kind)
        .iter()
        .map(|t| to_dto(stores, t, identity.sub))
        .collect()
}

pub fn find_one(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<TweetDto> {
    let tweet = stores.tweets.get_owned(id, identity.sub).ok_or_else(|| denied("access"))?;
    Ok(to_dto(stores, &tweet, identity.sub))
}

pub fn update(identity: &Identity, stores: &Stores, id: Uuid, content: String) -> AppResult<TweetDto> {
    let updated = stores
        .tweets
        .update_owned(id, identity.sub, content)
        .ok_or_else(|| denied("update"))?;
    Ok(to_dto(stores, &updated, identity.sub))
}

pub fn remove(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<TweetDto> {
    let removed = stores
        .tweets
        .remove_owned(id, identity.sub)
        .ok_or_else(|| denied("delete"))?;
    tracing::info!(tweet = %id, user = %identity.sub, "tweet.remove");
    Ok(to_dto(stores, &removed, identity.sub))
}

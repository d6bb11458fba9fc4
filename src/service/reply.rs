//! Replies to tweets. The whole surface is per-owner: listing, reads and
//! mutations are scoped to the authenticated subject, and a scoped miss
//! reports NotFound.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{resolve_owner, Identity};
use crate::error::{AppError, AppResult};
use crate::model::{Reply, ReplyDto, TweetKind};
use crate::store::Stores;

fn missing(verb: &str) -> AppError {
    AppError::NotFound {
        code: "reply_not_found".into(),
        message: format!("reply to {} not found or not owned by the authenticated user", verb),
    }
}

pub fn create(
    identity: &Identity,
    stores: &Stores,
    content: String,
    tweet_id: Uuid,
    user_id: Option<Uuid>,
) -> AppResult<ReplyDto> {
    let owner = resolve_owner(identity, user_id)?;
    if !stores.users.exists(owner) {
        return Err(AppError::not_found("user_not_found", "user not found"));
    }
    if !stores.tweets.exists(tweet_id) {
        return Err(AppError::not_found("tweet_not_found", "tweet not found"));
    }
    let reply = Reply {
        id: Uuid::new_v4(),
        content,
        kind: TweetKind::Reply,
        user_id: owner,
        tweet_id,
        created_at: Utc::now(),
    };
    let dto = ReplyDto::from(&reply);
    stores.replies.insert(reply);
    tracing::info!(reply = %dto.id, tweet = %tweet_id, user = %owner, "reply.create");
    Ok(dto)
}

pub fn find_all(identity: &Identity, stores: &Stores, kind: Option<TweetKind>) -> Vec<ReplyDto> {
    stores.replies.list_owned(identity.sub, kind).iter().map(ReplyDto::from).collect()
}

pub fn find_one(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<ReplyDto> {
    let reply = stores.replies.get_owned(id, identity.sub).ok_or_else(|| missing("fetch"))?;
    Ok(ReplyDto::from(&reply))
}

pub fn update(identity: &Identity, stores: &Stores, id: Uuid, content: String) -> AppResult<ReplyDto> {
    let updated = stores
        .replies
        .update_owned(id, identity.sub, content)
        .ok_or_else(|| missing("update"))?;
    Ok(ReplyDto::from(&updated))
}

pub fn remove(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<ReplyDto> {
    let removed = stores
        .replies
        .remove_owned(id, identity.sub)
        .ok_or_else(|| missing("delete"))?;
    Ok(ReplyDto::from(&removed))
}

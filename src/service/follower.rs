//! Follower edges: `follower_id` follows `user_id`. The edge is owned by the
//! follower; creation and deletion are guarded on that side. Self-follows and
//! duplicate ordered pairs are rejected before creation, independent of
//! ownership.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{resolve_owner, Identity};
use crate::error::{AppError, AppResult};
use crate::model::{FollowerDto, FollowerEdge};
use crate::store::Stores;

pub fn create(
    identity: &Identity,
    stores: &Stores,
    user_id: Uuid,
    follower_id: Option<Uuid>,
) -> AppResult<FollowerDto> {
    let follower = resolve_owner(identity, follower_id)?;
    if !stores.users.exists(user_id) {
        return Err(AppError::not_found("user_not_found", "user to be followed not found"));
    }
    if !stores.users.exists(follower) {
        return Err(AppError::not_found("follower_not_found", "follower user not found"));
    }
    if user_id == follower {
        return Err(AppError::user("self_follow", "you cannot follow yourself"));
    }
    let edge = FollowerEdge { id: Uuid::new_v4(), user_id, follower_id: follower, created_at: Utc::now() };
    let dto = FollowerDto::from(&edge);
    if !stores.followers.insert_unique(edge) {
        return Err(AppError::conflict("already_following", "user is already following this user"));
    }
    tracing::info!(edge = %dto.id, user = %user_id, follower = %follower, "follower.create");
    Ok(dto)
}

pub fn find_all(stores: &Stores, user_id: Option<Uuid>, follower_id: Option<Uuid>) -> Vec<FollowerDto> {
    stores.followers.list(user_id, follower_id).iter().map(FollowerDto::from).collect()
}

pub fn remove(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<FollowerDto> {
    let removed = stores
        .followers
        .remove_owned(id, identity.sub)
        .ok_or_else(|| AppError::not_found("follower_not_found", "follower edge not found or not owned by the authenticated user"))?;
    Ok(FollowerDto::from(&removed))
}

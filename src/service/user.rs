//! User registration and self-profile management. Registration is the one
//! public mutation; everything else is scoped to the authenticated subject.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{assert_owner, Identity};
use crate::error::{AppError, AppResult};
use crate::model::{User, UserDto};
use crate::store::Stores;

pub fn create(stores: &Stores, name: String, email: String, handle: String, password: &str) -> AppResult<UserDto> {
    if stores.users.email_taken(&email) {
        return Err(AppError::conflict("email_in_use", "the e-mail address is already in use"));
    }
    let password_hash = crate::security::hash_password(password).map_err(AppError::from)?;
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        handle,
        password_hash,
        created_at: now,
        updated_at: now,
    };
    let dto = UserDto::from(&user);
    stores.users.insert(user);
    tracing::info!(user = %dto.id, "user.create");
    Ok(dto)
}

pub fn find_all(stores: &Stores, email_contains: Option<&str>) -> Vec<UserDto> {
    stores.users.list(email_contains).iter().map(UserDto::from).collect()
}

/// A profile is only readable by its subject.
pub fn find_one(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<UserDto> {
    assert_owner(identity, id)?;
    let user = stores
        .users
        .get(id)
        .ok_or_else(|| AppError::not_found("user_not_found", "user not found"))?;
    Ok(UserDto::from(&user))
}

pub fn update(
    identity: &Identity,
    stores: &Stores,
    id: Uuid,
    name: Option<String>,
    handle: Option<String>,
    password: Option<&str>,
) -> AppResult<UserDto> {
    assert_owner(identity, id)?;
    let password_hash = match password {
        Some(p) => Some(crate::security::hash_password(p).map_err(AppError::from)?),
        None => None,
    };
    let updated = stores
        .users
        .update_with(id, |user| {
            if let Some(n) = name { user.name = n; }
            if let Some(h) = handle { user.handle = h; }
            if let Some(ph) = password_hash { user.password_hash = ph; }
        })
        .ok_or_else(|| AppError::not_found("user_not_found", "user not found"))?;
    Ok(UserDto::from(&updated))
}

pub fn remove(identity: &Identity, stores: &Stores, id: Uuid) -> AppResult<UserDto> {
    assert_owner(identity, id)?;
    let removed = stores
        .users
        .remove(id)
        .ok_or_else(|| AppError::not_found("user_not_found", "user not found"))?;
    tracing::info!(user = %id, "user.remove");
    Ok(UserDto::from(&removed))
}

//! Login and logout: credential verification, token issuance, token
//! revocation.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::UserStore;

use super::claims::IdentityClaims;
use super::codec::TokenCodec;
use super::revocation::RevocationBackend;

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: Uuid,
}

/// Verify the credential and issue a token whose claims snapshot the stored
/// profile. An unknown email and a wrong password produce the same failure,
/// so a caller cannot probe which addresses exist.
pub fn login(users: &UserStore, codec: &TokenCodec, email: &str, password: &str) -> AppResult<LoginOutcome> {
    let Some(user) = users.find_by_email(email) else {
        return Err(AppError::invalid_credentials());
    };
    if !crate::security::verify_password(&user.password_hash, password) {
        return Err(AppError::invalid_credentials());
    }
    let identity = IdentityClaims { sub: user.id, name: user.name.clone(), handle: user.handle.clone() };
    let token = codec.issue(&identity).map_err(AppError::from)?;
    tracing::info!(user = %user.id, "session.login");
    Ok(LoginOutcome { token, user_id: user.id })
}

/// Revoke the presented token for the remainder of its lifetime. The token
/// must still verify: a string the codec rejects cannot be revoked, so the
/// store never accumulates garbage entries.
pub fn logout(codec: &TokenCodec, revocations: &dyn RevocationBackend, token: &str) -> AppResult<()> {
    let claims = codec
        .verify(token)
        .map_err(|_| AppError::unauthenticated("invalid_token", "invalid or expired token"))?;
    revocations.revoke(token, claims.exp).map_err(AppError::from)?;
    tracing::info!(user = %claims.sub, "session.logout");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use chrono::Utc;
    use std::time::Duration;

    fn codec() -> TokenCodec {
        TokenCodec::new("session-test-secret", Duration::from_secs(3600)).unwrap()
    }

    fn seed_user(users: &UserStore, email: &str, password: &str) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".into(),
            email: email.into(),
            handle: "ada".into(),
            password_hash: crate::security::hash_password(password).unwrap(),
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        users.insert(user);
        id
    }

    #[test]
    fn login_issues_a_token_for_the_stored_user() {
        let users = UserStore::default();
        let codec = codec();
        let id = seed_user(&users, "ada@x.com", "correct");
        let out = login(&users, &codec, "ada@x.com", "correct").unwrap();
        assert_eq!(out.user_id, id);
        let claims = codec.verify(&out.token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.handle, "ada");
    }

    #[test]
    fn unknown_email_and_wrong_password_are_indistinguishable() {
        let users = UserStore::default();
        let codec = codec();
        seed_user(&users, "ada@x.com", "correct");

        let missing = login(&users, &codec, "nobody@x.com", "whatever").unwrap_err();
        let wrong = login(&users, &codec, "ada@x.com", "incorrect").unwrap_err();
        assert_eq!(missing.code_str(), wrong.code_str());
        assert_eq!(missing.message(), wrong.message());
        assert_eq!(missing.http_status(), wrong.http_status());
    }

    #[test]
    fn logout_records_the_tokens_own_expiry() {
        use crate::auth::revocation::{MemoryRevocationStore, RevocationBackend};
        let users = UserStore::default();
        let codec = codec();
        seed_user(&users, "ada@x.com", "correct");
        let out = login(&users, &codec, "ada@x.com", "correct").unwrap();
        let exp = codec.verify(&out.token).unwrap().exp;

        let revocations = MemoryRevocationStore::new();
        logout(&codec, &revocations, &out.token).unwrap();
        assert!(revocations.is_revoked(&out.token).unwrap());
        // The record dies exactly when the token itself does.
        assert_eq!(revocations.purge_expired(exp).unwrap(), 0);
        assert_eq!(revocations.purge_expired(exp + 1).unwrap(), 1);
    }

    #[test]
    fn logout_rejects_garbage_tokens() {
        use crate::auth::revocation::MemoryRevocationStore;
        let revocations = MemoryRevocationStore::new();
        let err = logout(&codec(), &revocations, "not-a-token").unwrap_err();
        assert_eq!(err.http_status(), 401);
        assert_eq!(revocations.len(), 0);
    }
}

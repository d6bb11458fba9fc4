//! The ownership rule applied by every mutating service operation: the
//! authenticated actor may only touch resources it owns.

use uuid::Uuid;

use crate::error::{AppError, AppResult};

use super::gate::Identity;

/// Assert that the actor is the owner of a resource already in hand.
pub fn assert_owner(identity: &Identity, owner_id: Uuid) -> AppResult<()> {
    if identity.sub != owner_id {
        return Err(AppError::forbidden("not_owner", "access denied: you do not own this resource"));
    }
    Ok(())
}

/// Resolve the owner for a create-on-behalf operation. A body-supplied owner
/// id must match the authenticated subject; an absent one defaults to it. A
/// caller can never create a resource owned by someone else.
pub fn resolve_owner(identity: &Identity, requested: Option<Uuid>) -> AppResult<Uuid> {
    match requested {
        Some(id) if id != identity.sub => {
            Err(AppError::forbidden("not_owner", "access denied: cannot act on behalf of another user"))
        }
        Some(id) => Ok(id),
        None => Ok(identity.sub),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity { sub: Uuid::new_v4(), name: "Ada".into(), handle: "ada".into() }
    }

    #[test]
    fn owner_passes_stranger_fails() {
        let me = identity();
        assert!(assert_owner(&me, me.sub).is_ok());
        let err = assert_owner(&me, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.http_status(), 403);
    }

    #[test]
    fn create_owner_defaults_to_subject() {
        let me = identity();
        assert_eq!(resolve_owner(&me, None).unwrap(), me.sub);
        assert_eq!(resolve_owner(&me, Some(me.sub)).unwrap(), me.sub);
    }

    #[test]
    fn create_on_behalf_of_another_is_forbidden() {
        let me = identity();
        let err = resolve_owner(&me, Some(Uuid::new_v4())).unwrap_err();
        assert_eq!(err.http_status(), 403);
    }
}

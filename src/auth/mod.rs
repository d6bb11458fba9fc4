//! Session authority and ownership enforcement for chirp.
//! Keep the public surface thin and split implementation across sub-modules.

mod claims;
mod codec;
mod gate;
mod gc;
mod ownership;
mod revocation;
mod session;

pub use claims::{AuthClaims, IdentityClaims};
pub use codec::{TokenCodec, VerifyError};
pub use gate::{authenticate, require_identity, BearerToken, Identity};
pub use gc::spawn_revocation_gc;
pub use ownership::{assert_owner, resolve_owner};
pub use revocation::{MemoryRevocationStore, RevocationBackend};
pub use session::{login, logout, LoginOutcome};

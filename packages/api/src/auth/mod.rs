//! Authentication: password hashing, session payload and identity resolution.

mod identity;
mod password;
mod session;

pub use identity::resolve_identity;
pub use password::{hash_password, verify_password};
pub use session::{SessionData, SESSION_PATIENT_KEY};

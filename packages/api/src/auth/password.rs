//! Patient passwords.
//!
//! Registration stores [`hash_password`]'s output in `patients.password_hash`.
//! Login loads that column by email and asks [`verify_password`]: `Ok(false)`
//! becomes the "Incorrect password." notice, while a column that does not
//! parse as an Argon2id hash is a server error.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::Result;

/// Argon2id with a fresh salt, as a `$argon2id$...` string.
pub fn hash_password(password: &str) -> Result<String> {
    let stored = Argon2::default()
        .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))?
        .to_string();
    Ok(stored)
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let stored = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

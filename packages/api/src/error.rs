//! Error type shared by every use-case in this crate.

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required form field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The store rejected a write because of a uniqueness constraint.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials on login.
    #[error("{0}")]
    Auth(String),

    /// The appointment does not exist or is owned by another patient.
    #[error("Appointment not found or access denied.")]
    NotFound,

    /// The store could not be reached at all.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("password hash error: {0}")]
    PasswordHash(String),
}

impl Error {
    /// Whether the message is meant to be shown to the patient as a notice.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Conflict(_) | Error::Auth(_) | Error::NotFound
        )
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// The store's unique constraint fired.
    pub(crate) fn is_unique_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }

    /// The store's foreign key constraint fired.
    pub(crate) fn is_foreign_key_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(e)) => e.is_foreign_key_violation(),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Error::StoreUnavailable(e),
            e => Error::Database(e),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(e: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(e.to_string())
    }
}

//! Connection pool construction.

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::Database;
use crate::error::Result;

/// Build the pool described by the database settings.
///
/// The pool connects lazily: an unreachable store does not prevent the
/// process from starting, it only fails the requests that need storage.
pub fn connect(settings: &Database) -> Result<AnyPool> {
    connect_url(&settings.url(), settings.connections)
}

/// Build a lazily-connecting pool for an explicit URL.
pub fn connect_url(url: &str, max_connections: u32) -> Result<AnyPool> {
    sqlx::any::install_default_drivers();

    let pool = AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(url)?;
    tracing::debug!(max_connections, "database pool configured");
    Ok(pool)
}

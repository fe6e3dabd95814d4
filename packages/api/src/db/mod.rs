//! # Database module: pool, per-request gateway, schema
//!
//! Everything runs through SQLx's driver-agnostic `Any` driver so the same
//! statements serve both the PostgreSQL and the SQLite backend. Statements use
//! `$N` placeholders, which both drivers accept.
//!
//! ## Re-exports
//!
//! - [`connect`]: builds the lazily-connecting [`AnyPool`] from [`crate::config::Database`].
//! - [`Gateway`]: one unit of work per request; rolled back unless committed.
//! - [`schema::initialize`]: idempotent table creation and doctor seeding.

mod gateway;
mod pool;
pub mod schema;

pub use gateway::Gateway;
pub use pool::{connect, connect_url};
pub use sqlx::AnyPool;

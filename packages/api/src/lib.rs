//! # API crate: storage and use-cases of the clinic appointment service
//!
//! Everything the HTTP layer needs lives here, independent of axum: the
//! per-request storage gateway, the schema initializer, password hashing and
//! identity resolution, and the patient-facing use-cases.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`accounts`] | Registration and login |
//! | [`appointments`] | Booking, listing, editing and deleting a patient's own appointments |
//! | [`auth`] | Argon2id password hashing, session payload, identity resolution |
//! | [`config`] | Layered settings (defaults, `config.toml`, `CLINIC_*` environment) |
//! | [`db`] | `Any` connection pool, per-request [`db::Gateway`], schema initializer |
//! | [`models`] | `Patient`, `Doctor`, `Appointment` rows and their view projections |
//!
//! Every use-case takes a `&mut Gateway` and, when it needs an identity, the
//! authenticated `&Patient`. Nothing in this crate reads global state.

pub mod accounts;
pub mod appointments;
pub mod auth;
pub mod config;
pub mod db;
mod error;
pub mod models;

pub use config::Settings;
pub use error::{Error, Result};
pub use models::{Patient, PatientInfo};

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the unit tests.

    use sqlx::AnyPool;

    use crate::accounts::{register, Registration};
    use crate::db::{connect_url, schema, Gateway};
    use crate::models::Patient;

    /// An empty in-memory SQLite database.
    ///
    /// One connection only: every connection to `sqlite::memory:` is its own
    /// database.
    pub async fn memory_pool() -> AnyPool {
        connect_url("sqlite::memory:", 1).unwrap()
    }

    /// A file-backed database with several connections, for tests where
    /// requests overlap. The file lives as long as `dir`.
    pub async fn file_pool(dir: &tempfile::TempDir) -> AnyPool {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("clinic.db").display());
        let pool = connect_url(&url, 5).unwrap();
        schema::initialize(&pool).await.unwrap();
        pool
    }

    /// An in-memory database with tables created and doctors seeded.
    pub async fn clinic_pool() -> AnyPool {
        let pool = memory_pool().await;
        schema::initialize(&pool).await.unwrap();
        pool
    }

    pub async fn register_patient(pool: &AnyPool, email: &str, password: &str) -> i64 {
        let mut gateway = Gateway::new(pool.clone());
        let form = Registration {
            first_name: "Test".into(),
            last_name: "Patient".into(),
            email: email.into(),
            password: password.into(),
        };
        register(&mut gateway, &form).await.unwrap().id
    }

    pub async fn patient(pool: &AnyPool, email: &str) -> Patient {
        let id = register_patient(pool, email, "password").await;
        let mut gateway = Gateway::new(pool.clone());
        Patient::find(&mut gateway, id).await.unwrap().unwrap()
    }

    pub async fn count(pool: &AnyPool, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let mut gateway = Gateway::new(pool.clone());
        gateway
            .query_scalar(sqlx::query_scalar(&sql))
            .await
            .unwrap()
    }
}

//! # Schema initializer
//!
//! Creates the `patients`, `doctors` and `appointments` tables when they are
//! missing and seeds the doctor roster the first time the `doctors` table is
//! empty. Safe to run on every start.
//!
//! Dates and times are stored as ISO text (`YYYY-MM-DD`, `HH:MM`) on both
//! backends, so `ORDER BY date, time` is chronological.

use sqlx::AnyPool;

use super::Gateway;
use crate::error::Result;

/// The fixed doctor roster seeded into an empty `doctors` table.
pub const DOCTORS: [(&str, &str); 5] = [
    ("Sarah Jenkins", "Cardiology"),
    ("Michael Chen", "Pediatrics"),
    ("Emily Rodriguez", "Dermatology"),
    ("James Wilson", "Orthopedics"),
    ("Priya Patel", "General Practice"),
];

/// DDL flavour; the backends only disagree on auto-increment keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    fn from_backend_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("sqlite") {
            Dialect::Sqlite
        } else {
            Dialect::Postgres
        }
    }

    fn primary_key(self) -> &'static str {
        match self {
            Dialect::Postgres => "BIGSERIAL PRIMARY KEY",
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    fn reference(self) -> &'static str {
        match self {
            Dialect::Postgres => "BIGINT",
            Dialect::Sqlite => "INTEGER",
        }
    }

    fn tables(self) -> [String; 3] {
        let pk = self.primary_key();
        let fk = self.reference();
        [
            format!(
                "CREATE TABLE IF NOT EXISTS patients (
                    id {pk},
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS doctors (
                    id {pk},
                    name TEXT NOT NULL,
                    specialty TEXT NOT NULL
                )"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS appointments (
                    id {pk},
                    patient_id {fk} NOT NULL REFERENCES patients (id),
                    doctor_id {fk} NOT NULL REFERENCES doctors (id),
                    date TEXT NOT NULL,
                    time TEXT NOT NULL,
                    notes TEXT
                )"
            ),
        ]
    }
}

/// Create the tables if absent and seed the doctors if none exist.
pub async fn initialize(pool: &AnyPool) -> Result<()> {
    let mut gateway = Gateway::new(pool.clone());
    let dialect = Dialect::from_backend_name(&gateway.backend_name().await?);

    for ddl in dialect.tables() {
        gateway.execute(sqlx::query(&ddl)).await?;
    }

    let doctors: i64 = gateway
        .query_scalar(sqlx::query_scalar("SELECT COUNT(*) FROM doctors"))
        .await?;

    if doctors == 0 {
        for (name, specialty) in DOCTORS {
            gateway
                .execute(
                    sqlx::query("INSERT INTO doctors (name, specialty) VALUES ($1, $2)")
                        .bind(name)
                        .bind(specialty),
                )
                .await?;
        }
        tracing::info!(doctors = DOCTORS.len(), "database initialized and seeded with doctors");
    } else {
        tracing::info!(doctors, "database already initialized");
    }

    gateway.commit().await
}

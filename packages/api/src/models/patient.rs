//! # Patient model
//!
//! Two representations of a registered patient:
//!
//! - [`Patient`] is the complete `patients` row, password hash included. It is
//!   loaded on login and on every request that carries a session, and never
//!   leaves the server.
//! - [`PatientInfo`] is the projection handed to views: it omits the hash.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::Gateway;
use crate::error::Result;

/// Full patient record from the database.
#[derive(Debug, Clone, FromRow)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl Patient {
    pub async fn find(gateway: &mut Gateway, id: i64) -> Result<Option<Patient>> {
        gateway
            .query_one(sqlx::query_as("SELECT * FROM patients WHERE id = $1").bind(id))
            .await
    }

    pub async fn find_by_email(gateway: &mut Gateway, email: &str) -> Result<Option<Patient>> {
        gateway
            .query_one(sqlx::query_as("SELECT * FROM patients WHERE email = $1").bind(email))
            .await
    }

    /// Convert to PatientInfo for the presentation layer.
    pub fn to_info(&self) -> PatientInfo {
        PatientInfo {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Patient information safe to hand to a view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientInfo {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

//! # Patient accounts: registration and login
//!
//! Both use-cases take the request's [`Gateway`] and a deserialized form.
//! Session handling (storing the patient id, clearing on logout) belongs to
//! the HTTP layer; these functions only decide *who* the patient is.

use serde::Deserialize;

use crate::auth::{hash_password, verify_password};
use crate::db::Gateway;
use crate::error::{Error, Result};
use crate::models::Patient;

/// Body of `POST /register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Create a patient account.
///
/// Every field is required. The password is stored as an Argon2id hash. A
/// second registration for the same email is rejected by the store's unique
/// constraint and surfaces as [`Error::Conflict`].
pub async fn register(gateway: &mut Gateway, form: &Registration) -> Result<Patient> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = form.email.trim();

    if first_name.is_empty() || last_name.is_empty() || email.is_empty() || form.password.is_empty()
    {
        return Err(Error::validation("All fields are required."));
    }

    let password_hash = hash_password(&form.password)?;

    let inserted = gateway
        .insert(
            sqlx::query_scalar(
                "INSERT INTO patients (first_name, last_name, email, password_hash) \
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(&password_hash),
        )
        .await;

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            gateway.rollback().await?;
            if e.is_unique_violation() {
                return Err(Error::Conflict(format!("User {email} is already registered.")));
            }
            return Err(e);
        }
    };
    gateway.commit().await?;

    tracing::info!(patient_id = id, "patient registered");
    Ok(Patient {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password_hash,
    })
}

/// Check a patient's credentials.
///
/// An unknown email and a wrong password are reported separately.
pub async fn login(gateway: &mut Gateway, form: &Credentials) -> Result<Patient> {
    let Some(patient) = Patient::find_by_email(gateway, form.email.trim()).await? else {
        return Err(Error::Auth("Incorrect email.".into()));
    };

    if !verify_password(&form.password, &patient.password_hash)? {
        return Err(Error::Auth("Incorrect password.".into()));
    }

    tracing::info!(patient_id = patient.id, "patient logged in");
    Ok(patient)
}

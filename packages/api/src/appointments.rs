//! # Appointment use-cases
//!
//! Every function here takes the authenticated [`Patient`] explicitly; the
//! HTTP layer is responsible for refusing anonymous requests before calling
//! in. Ownership is enforced in SQL: reads, updates and deletes always filter
//! on `patient_id`, so an appointment owned by someone else is
//! indistinguishable from one that does not exist ([`Error::NotFound`]).
//!
//! | Use-case | Writes | Commit |
//! |----------|--------|--------|
//! | [`booking_form`] | - | - |
//! | [`book`] | one `INSERT` | after validation |
//! | [`list_mine`] | - | - |
//! | [`edit_form`] | - | - |
//! | [`edit`] | one `UPDATE` | after validation |
//! | [`delete`] | one `DELETE` | always |

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::db::Gateway;
use crate::error::{Error, Result};
use crate::models::{display_time, Appointment, AppointmentListing, Doctor, Patient};

const REQUIRED_FIELDS: &str = "Doctor, date, and time are required.";

/// Body of `POST /book` and `POST /edit-appointment/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

/// A validated [`AppointmentForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentInput {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

impl AppointmentInput {
    fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn time_text(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

impl AppointmentForm {
    /// Check the required fields and parse them.
    pub fn validate(&self) -> Result<AppointmentInput> {
        let doctor_id = self.doctor_id.trim();
        let date = self.date.trim();
        let time = self.time.trim();

        if doctor_id.is_empty() || date.is_empty() || time.is_empty() {
            return Err(Error::validation(REQUIRED_FIELDS));
        }

        let doctor_id = doctor_id
            .parse()
            .map_err(|_| Error::validation("Selected doctor does not exist."))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Error::validation("Date must be in YYYY-MM-DD format."))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
            .map_err(|_| Error::validation("Time must be in HH:MM format."))?;
        let notes = Some(self.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(AppointmentInput {
            doctor_id,
            date,
            time,
            notes,
        })
    }
}

/// What the booking form needs: the roster and a default date.
#[derive(Debug, Clone, Serialize)]
pub struct BookingForm {
    pub doctors: Vec<Doctor>,
    pub today: NaiveDate,
}

/// What the edit form needs: the appointment as it is now and the roster.
#[derive(Debug, Clone, Serialize)]
pub struct EditForm {
    pub appointment: Appointment,
    pub doctors: Vec<Doctor>,
}

/// All doctors, in seed order.
pub async fn doctors(gateway: &mut Gateway) -> Result<Vec<Doctor>> {
    gateway
        .query_all(sqlx::query_as("SELECT id, name, specialty FROM doctors ORDER BY id"))
        .await
}

pub async fn booking_form(gateway: &mut Gateway) -> Result<BookingForm> {
    Ok(BookingForm {
        doctors: doctors(gateway).await?,
        today: Local::now().date_naive(),
    })
}

/// Book an appointment for `patient`. Returns the new appointment id.
pub async fn book(gateway: &mut Gateway, patient: &Patient, form: &AppointmentForm) -> Result<i64> {
    let input = form.validate()?;

    let inserted = gateway
        .insert(
            sqlx::query_scalar(
                "INSERT INTO appointments (patient_id, doctor_id, date, time, notes) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(patient.id)
            .bind(input.doctor_id)
            .bind(input.date_text())
            .bind(input.time_text())
            .bind(input.notes.clone()),
        )
        .await;

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            gateway.rollback().await?;
            return Err(unknown_doctor(e));
        }
    };
    gateway.commit().await?;

    tracing::info!(patient_id = patient.id, appointment_id = id, "appointment booked");
    Ok(id)
}

/// The patient's appointments, earliest first.
pub async fn list_mine(gateway: &mut Gateway, patient: &Patient) -> Result<Vec<AppointmentListing>> {
    gateway
        .query_all(
            sqlx::query_as(
                "SELECT a.id, a.date, a.time, a.notes, d.name AS doctor_name, d.specialty \
                 FROM appointments a \
                 JOIN doctors d ON a.doctor_id = d.id \
                 WHERE a.patient_id = $1 \
                 ORDER BY a.date, a.time",
            )
            .bind(patient.id),
        )
        .await
}

/// Load an appointment only if `patient` owns it.
pub async fn find_owned(gateway: &mut Gateway, patient: &Patient, id: i64) -> Result<Appointment> {
    gateway
        .query_one(
            sqlx::query_as("SELECT * FROM appointments WHERE id = $1 AND patient_id = $2")
                .bind(id)
                .bind(patient.id),
        )
        .await?
        .ok_or(Error::NotFound)
}

pub async fn edit_form(gateway: &mut Gateway, patient: &Patient, id: i64) -> Result<EditForm> {
    let mut appointment = find_owned(gateway, patient, id).await?;
    appointment.time = display_time(&appointment.time);

    Ok(EditForm {
        appointment,
        doctors: doctors(gateway).await?,
    })
}

/// Replace doctor, date, time and notes of an owned appointment.
///
/// Ownership is checked before the form is validated, so a foreign id is
/// reported as [`Error::NotFound`] even when the form is also invalid.
pub async fn edit(
    gateway: &mut Gateway,
    patient: &Patient,
    id: i64,
    form: &AppointmentForm,
) -> Result<()> {
    find_owned(gateway, patient, id).await?;
    let input = form.validate()?;

    let updated = gateway
        .execute(
            sqlx::query(
                "UPDATE appointments SET doctor_id = $1, date = $2, time = $3, notes = $4 \
                 WHERE id = $5 AND patient_id = $6",
            )
            .bind(input.doctor_id)
            .bind(input.date_text())
            .bind(input.time_text())
            .bind(input.notes.clone())
            .bind(id)
            .bind(patient.id),
        )
        .await;

    let updated = match updated {
        Ok(updated) => updated,
        Err(e) => {
            gateway.rollback().await?;
            return Err(unknown_doctor(e));
        }
    };
    if updated == 0 {
        return Err(Error::NotFound);
    }
    gateway.commit().await?;

    tracing::info!(patient_id = patient.id, appointment_id = id, "appointment updated");
    Ok(())
}

/// Delete an owned appointment in a single conditional statement.
pub async fn delete(gateway: &mut Gateway, patient: &Patient, id: i64) -> Result<()> {
    let deleted = gateway
        .execute(
            sqlx::query("DELETE FROM appointments WHERE id = $1 AND patient_id = $2")
                .bind(id)
                .bind(patient.id),
        )
        .await?;
    gateway.commit().await?;

    if deleted == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!(patient_id = patient.id, appointment_id = id, "appointment deleted");
    Ok(())
}

fn unknown_doctor(e: Error) -> Error {
    if e.is_foreign_key_violation() {
        Error::validation("Selected doctor does not exist.")
    } else {
        e
    }
}

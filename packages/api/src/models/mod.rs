//! Data models for the application.

mod appointment;
mod doctor;
mod patient;

pub use appointment::{display_time, Appointment, AppointmentListing};
pub use doctor::Doctor;
pub use patient::{Patient, PatientInfo};

//! Session data types.

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// Key under which [`SessionData`] is stored in the session.
pub const SESSION_PATIENT_KEY: &str = "patient";

/// What a signed-in browser carries between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub patient_id: i64,
    /// First name, used for greetings without a database round trip.
    pub patient_name: String,
}

impl SessionData {
    pub fn for_patient(patient: &Patient) -> Self {
        Self {
            patient_id: patient.id,
            patient_name: patient.first_name.clone(),
        }
    }
}

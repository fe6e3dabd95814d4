//! Resolving the patient behind a request.

use super::SessionData;
use crate::db::Gateway;
use crate::error::Result;
use crate::models::Patient;

/// Load the patient a session points at.
///
/// No session payload means an anonymous request and costs no database
/// access. A payload whose patient no longer exists is treated as anonymous
/// too, not as an error.
pub async fn resolve_identity(
    gateway: &mut Gateway,
    session: Option<&SessionData>,
) -> Result<Option<Patient>> {
    let Some(session) = session else {
        return Ok(None);
    };

    let patient = Patient::find(gateway, session.patient_id).await?;
    if patient.is_none() {
        tracing::debug!(patient_id = session.patient_id, "session refers to unknown patient");
    }
    Ok(patient)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{clinic_pool, memory_pool, register_patient};

    #[tokio::test]
    async fn test_anonymous_without_session() {
        let pool = memory_pool().await;
        let mut gateway = Gateway::new(pool);
        assert!(resolve_identity(&mut gateway, None).await.unwrap().is_none());
        assert!(!gateway.is_open());
    }

    #[tokio::test]
    async fn test_resolves_session_patient() {
        let pool = clinic_pool().await;
        let id = register_patient(&pool, "ada@example.com", "secret").await;

        let session = SessionData {
            patient_id: id,
            patient_name: "Ada".into(),
        };
        let mut gateway = Gateway::new(pool);
        let patient = resolve_identity(&mut gateway, Some(&session))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(patient.id, id);
        assert_eq!(patient.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_unknown_patient_is_anonymous() {
        let pool = clinic_pool().await;
        let session = SessionData {
            patient_id: 999,
            patient_name: "Ghost".into(),
        };
        let mut gateway = Gateway::new(pool);
        assert!(resolve_identity(&mut gateway, Some(&session))
            .await
            .unwrap()
            .is_none());
    }
}

//! # Per-request context
//!
//! [`RequestContext`] is the first extractor of every page handler. Building
//! it is the identity step that runs before each request:
//!
//! 1. the tower-sessions [`Session`] is pulled from the request,
//! 2. a fresh [`Gateway`] is created (no connection yet),
//! 3. if the session carries a [`SessionData`] payload the patient is loaded
//!    through that gateway; an id that no longer resolves is dropped from the
//!    session and the request continues anonymously.
//!
//! The handler then reuses the same gateway for its own reads and writes, so
//! a request holds at most one connection. The gateway is dropped, and any
//! uncommitted write rolled back, when the handler returns.
//!
//! The methods take `&mut self`: a pooled connection is `Send` but not `Sync`,
//! and handler futures must stay `Send`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;
use tower_sessions::Session;

use api::auth::{resolve_identity, SessionData, SESSION_PATIENT_KEY};
use api::db::Gateway;
use api::Patient;

use crate::app::AppState;
use crate::error::WebError;
use crate::flash::{self, Level};
use crate::views::Renderer;

pub struct RequestContext {
    pub session: Session,
    pub gateway: Gateway,
    pub patient: Option<Patient>,
    renderer: Arc<dyn Renderer>,
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| WebError::SessionLayer(message))?;

        let data: Option<SessionData> = session.get(SESSION_PATIENT_KEY).await?;
        let mut gateway = Gateway::new(state.pool.clone());
        let patient = resolve_identity(&mut gateway, data.as_ref()).await?;

        if data.is_some() && patient.is_none() {
            session.remove::<SessionData>(SESSION_PATIENT_KEY).await?;
        }

        Ok(Self {
            session,
            gateway,
            patient,
            renderer: state.renderer.clone(),
        })
    }
}

impl RequestContext {
    /// The signed-in patient, or a redirect to the login page.
    ///
    /// Anonymous requests get a notice queued and [`WebError::LoginRequired`],
    /// which answers with the redirect; nothing protected is touched.
    pub async fn require_login(&mut self) -> Result<Patient, WebError> {
        if let Some(patient) = &self.patient {
            return Ok(patient.clone());
        }
        self.flash(Level::Error, "Please log in to access this page.")
            .await?;
        Err(WebError::LoginRequired)
    }

    pub async fn flash(&mut self, level: Level, message: impl Into<String>) -> Result<(), WebError> {
        flash::push(&self.session, level, message).await?;
        Ok(())
    }

    /// Start a fresh session for `patient`, dropping whatever the old one held.
    pub async fn sign_in(&mut self, patient: &Patient) -> Result<(), WebError> {
        self.session.clear().await;
        self.session.cycle_id().await?;
        self.session
            .insert(SESSION_PATIENT_KEY, SessionData::for_patient(patient))
            .await?;
        Ok(())
    }

    pub async fn sign_out(&mut self) {
        self.session.clear().await;
    }

    /// Render a view, consuming the queued notices.
    pub async fn render(&mut self, view: &str, context: impl Serialize) -> Result<Response, WebError> {
        let mut context = match serde_json::to_value(context)? {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".into(), other);
                map
            }
        };

        let messages = flash::take(&self.session).await?;
        context.insert("messages".into(), serde_json::to_value(messages)?);
        context.insert(
            "current_patient".into(),
            serde_json::to_value(self.patient.as_ref().map(Patient::to_info))?,
        );

        Ok(self.renderer.render(view, Value::Object(context)))
    }
}

//! # Presentation boundary
//!
//! Handlers never build markup. They hand a view name and a JSON context to a
//! [`Renderer`], which is free to feed a template engine. The bundled
//! [`JsonRenderer`] answers with the context itself, which is what API clients
//! and the router tests consume.
//!
//! Every context is an object carrying, besides the handler's own variables:
//!
//! - `messages`: the flash notices queued since the last rendered view,
//! - `current_patient`: the signed-in patient or `null`.

use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

pub const INDEX: &str = "index.html";
pub const REGISTER: &str = "register.html";
pub const LOGIN: &str = "login.html";
pub const BOOK_APPOINTMENT: &str = "book_appointment.html";
pub const MY_APPOINTMENTS: &str = "my_appointments.html";
pub const EDIT_APPOINTMENT: &str = "edit_appointment.html";

/// Turns a view name and its variables into a response.
pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, context: Value) -> Response;
}

/// Renders `{"view": <name>, "context": {...}}` as `application/json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, view: &str, context: Value) -> Response {
        Json(json!({ "view": view, "context": context })).into_response()
    }
}

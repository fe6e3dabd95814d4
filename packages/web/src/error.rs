use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Anything a handler cannot turn into a notice for the patient.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// The request is anonymous; the notice has already been queued.
    #[error("login required")]
    LoginRequired,

    #[error(transparent)]
    Api(#[from] api::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("session layer missing: {0}")]
    SessionLayer(&'static str),

    #[error("view context error: {0}")]
    Context(#[from] serde_json::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::LoginRequired => Redirect::to("/login").into_response(),
            e => {
                tracing::error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

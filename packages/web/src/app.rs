//! Router assembly: shared state, session layer and routes.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use api::config::Session as SessionSettings;
use api::db::AnyPool;

use crate::handlers::{accounts, appointments};
use crate::views::Renderer;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(pool: AnyPool, renderer: Arc<dyn Renderer>) -> Self {
        Self { pool, renderer }
    }
}

/// Cookie signing key from the configured secret.
///
/// A missing or short secret falls back to a random key, which logs every
/// patient out on restart.
pub fn signing_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(_)) => {
            tracing::warn!("session secret shorter than 64 bytes, using a random key");
            Key::generate()
        }
        None => {
            tracing::warn!("no session secret configured, using a random key");
            Key::generate()
        }
    }
}

/// Create the tables and seed the doctors, logging the outcome.
///
/// Returns whether the store is ready. The router is served either way:
/// pages that need no storage keep answering and the rest fail until the
/// store comes back.
pub async fn prepare_store(pool: &AnyPool) -> bool {
    match api::db::schema::initialize(pool).await {
        Ok(()) => {
            tracing::info!("database schema ready");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "database initialization failed");
            false
        }
    }
}

pub fn router(state: AppState, settings: &SessionSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(settings.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(settings.days)))
        .with_signed(signing_key(settings.secret.as_deref()));

    Router::new()
        .route("/", get(accounts::index))
        .route("/register", get(accounts::register_form).post(accounts::register))
        .route("/login", get(accounts::login_form).post(accounts::login))
        .route("/logout", get(accounts::logout))
        .route("/book", get(appointments::book_form).post(appointments::book))
        .route("/my-appointments", get(appointments::list_mine))
        .route(
            "/edit-appointment/{id}",
            get(appointments::edit_form).post(appointments::edit),
        )
        .route("/delete-appointment/{id}", post(appointments::delete))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

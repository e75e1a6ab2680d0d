//! In-memory stand-in for the clinic backend.
//!
//! Serves the same routes and error conventions as the real API under
//! `/api/v1`, plus a plain-text `/health`. State lives for the lifetime of
//! the router; every `app()` call starts from the same seed.

pub mod appointments;
pub mod auth;
pub mod chat;
pub mod doctors;
pub mod error;
pub mod journal;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

pub use state::{AppState, SEED_PATIENT_EMAIL, SEED_PATIENT_PASSWORD};

pub fn app() -> Router {
    app_with_state(AppState::seeded())
}

pub fn app_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/doctors", get(doctors::list_doctors))
        .route("/doctors/{id}", get(doctors::get_doctor))
        .route("/doctors/{id}/slots", get(doctors::available_slots))
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::book_appointment),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get_appointment).patch(appointments::update_status),
        )
        .route(
            "/journal/entries",
            get(journal::list_entries).post(journal::create_entry),
        )
        .route(
            "/journal/entries/{id}",
            get(journal::get_entry)
                .put(journal::update_entry)
                .delete(journal::delete_entry),
        )
        .route("/chat/rooms", get(chat::list_rooms).post(chat::start_chat))
        .route(
            "/chat/rooms/{id}/messages",
            get(chat::list_messages).post(chat::send_message),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> &'static str {
    "ok"
}

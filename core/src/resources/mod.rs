//! Typed resource clients.
//!
//! Each client borrows the shared `Executor` and maps one domain operation to
//! exactly one executor call. Failures are logged once here and returned
//! unchanged; presenting them is up to the caller.

mod appointments;
mod auth;
mod chat;
mod doctors;
mod journal;

pub use appointments::AppointmentsApi;
pub use auth::AuthApi;
pub use chat::ChatApi;
pub use doctors::DoctorsApi;
pub use journal::JournalApi;

use crate::error::ApiError;

/// Validation error for input that never reached the network, logged at
/// `warn`.
fn rejected(message: impl Into<String>) -> ApiError {
    let message = message.into();
    tracing::warn!(%message, "request rejected before sending");
    ApiError::validation(message)
}

fn require_text<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(rejected(format!("{field} is required")));
    }
    Ok(trimmed)
}

fn require_id(id: i64, field: &str) -> Result<i64, ApiError> {
    if id <= 0 {
        return Err(rejected(format!("{field} must be a positive id")));
    }
    Ok(id)
}

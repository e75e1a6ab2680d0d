//! Async API client core for the clinic backend.
//!
//! # Overview
//! Screens talk to `ClinicClient`, which hands out one typed client per
//! backend resource: auth, doctors, journal, appointments and chat. Every
//! call goes through the shared `Executor`: one attempt, bearer token
//! attached when stored, a fixed timeout, and uniform error surfacing.
//!
//! # Design
//! - Request building and response parsing (`request`) are sans-IO and
//!   tested without a network; `Transport` is the only seam that does I/O.
//! - The token store is injected, never global.
//! - List responses decode through `ListPayload`, which accepts exactly a
//!   bare array or a `data`-wrapped array.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod http;
pub mod request;
pub mod resources;
pub mod token;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::ClinicClient;
pub use config::{ClientConfig, Platform};
pub use envelope::ListPayload;
pub use error::{ApiError, ConfigError, TokenStoreError, TransportError};
pub use executor::Executor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::{PageRequest, Pagination, RequestDescriptor};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    Appointment, AppointmentStatus, ChatMessage, ChatRoom, Doctor, JournalEntry,
    JournalEntryUpdate, NewAppointment, NewJournalEntry, NewUser, TokenPair, User,
};

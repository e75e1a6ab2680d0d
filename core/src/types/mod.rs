//! Domain DTOs for the clinic API.
//!
//! # Design
//! These types are defined independently from the mock-server's rows; the
//! integration tests catch schema drift between the two. Records coming back
//! from the backend are consumed as-is apart from `Doctor`, which always
//! deserializes through `DoctorRecord` so nested and top-level profile fields
//! collapse into one field set. Request payloads skip unset optional fields.

mod appointment;
mod chat;
mod doctor;
mod journal;
pub(crate) mod timestamp;
mod user;

pub use appointment::{Appointment, AppointmentStatus, AppointmentStatusUpdate, NewAppointment};
pub use chat::{ChatMessage, ChatRoom, NewMessage, StartChat};
pub use doctor::{Doctor, DoctorProfileFields, DoctorRecord, Numeric};
pub use journal::{JournalEntry, JournalEntryUpdate, NewJournalEntry};
pub use user::{Credentials, NewUser, TokenPair, User};

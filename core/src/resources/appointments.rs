use chrono::NaiveTime;

use crate::envelope::{decode, ListPayload};
use crate::error::ApiError;
use crate::executor::Executor;
use crate::request::{with_query, Pagination};
use crate::types::{Appointment, AppointmentStatus, AppointmentStatusUpdate, NewAppointment};

use super::{rejected, require_id};

/// Booking and managing the signed-in patient's appointments.
pub struct AppointmentsApi<'a> {
    executor: &'a Executor,
}

impl<'a> AppointmentsApi<'a> {
    pub(crate) fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<Appointment>, ApiError> {
        self.executor
            .get(&with_query("/appointments", &page.query_pairs()))
            .await
            .and_then(ListPayload::<Appointment>::decode)
            .map(ListPayload::into_items)
            .inspect_err(|error| tracing::error!(%error, "failed to load appointments"))
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, ApiError> {
        self.executor
            .get(&format!("/appointments/{id}"))
            .await
            .and_then(decode)
            .inspect_err(|error| {
                tracing::error!(%error, appointment_id = id, "failed to load appointment")
            })
    }

    /// Book a slot. `appointment_time` must be `HH:MM`.
    pub async fn book(&self, request: &NewAppointment) -> Result<Appointment, ApiError> {
        require_id(request.doctor_id, "doctor_id")?;
        if NaiveTime::parse_from_str(&request.appointment_time, "%H:%M").is_err() {
            return Err(rejected(format!(
                "appointment_time must be HH:MM, got {:?}",
                request.appointment_time
            )));
        }
        self.executor
            .post("/appointments", request)
            .await
            .and_then(decode)
            .inspect_err(|error| {
                tracing::error!(%error, doctor_id = request.doctor_id, "failed to book appointment")
            })
    }

    pub async fn cancel(&self, id: i64) -> Result<Appointment, ApiError> {
        let update = AppointmentStatusUpdate {
            status: AppointmentStatus::Cancelled,
        };
        self.executor
            .patch(&format!("/appointments/{id}"), &update)
            .await
            .and_then(decode)
            .inspect_err(|error| {
                tracing::error!(%error, appointment_id = id, "failed to cancel appointment")
            })
    }
}

use chrono::NaiveDate;

use crate::envelope::{decode, ListPayload};
use crate::error::ApiError;
use crate::executor::Executor;
use crate::request::{with_query, Pagination};
use crate::types::Doctor;

/// Doctor directory. Every result is normalized through `Doctor`'s
/// deserializer.
pub struct DoctorsApi<'a> {
    executor: &'a Executor,
}

impl<'a> DoctorsApi<'a> {
    pub(crate) fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    /// List doctors, optionally restricted to one specialization.
    pub async fn list(
        &self,
        page: Pagination,
        specialization: Option<&str>,
    ) -> Result<Vec<Doctor>, ApiError> {
        let mut params = page.query_pairs();
        if let Some(specialization) = specialization.map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("specialization", specialization.to_string()));
        }
        self.executor
            .get(&with_query("/doctors", &params))
            .await
            .and_then(ListPayload::<Doctor>::decode)
            .map(ListPayload::into_items)
            .inspect_err(|error| tracing::error!(%error, ?specialization, "failed to load doctors"))
    }

    pub async fn get(&self, id: i64) -> Result<Doctor, ApiError> {
        self.executor
            .get(&format!("/doctors/{id}"))
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, doctor_id = id, "failed to load doctor"))
    }

    /// Free `HH:MM` slots for `date`.
    pub async fn available_slots(&self, id: i64, date: NaiveDate) -> Result<Vec<String>, ApiError> {
        let endpoint = with_query(
            &format!("/doctors/{id}/slots"),
            &[("date", date.format("%Y-%m-%d").to_string())],
        );
        self.executor
            .get(&endpoint)
            .await
            .and_then(ListPayload::<String>::decode)
            .map(ListPayload::into_items)
            .inspect_err(|error| {
                tracing::error!(%error, doctor_id = id, %date, "failed to load available slots")
            })
    }
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiFailure;
use crate::state::{paginate, AppState, DoctorRow, SLOT_TIMES};

#[derive(Deserialize)]
pub struct DoctorQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub specialization: Option<String>,
}

#[derive(Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
}

pub async fn list_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorQuery>,
) -> Json<Vec<Value>> {
    let db = state.db.read().await;
    let matching = db.doctors.iter().filter(|d| match &query.specialization {
        Some(wanted) => d.specialization.eq_ignore_ascii_case(wanted),
        None => true,
    });
    Json(
        paginate(matching, query.skip, query.limit)
            .into_iter()
            .map(DoctorRow::to_json)
            .collect(),
    )
}

pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiFailure> {
    let db = state.db.read().await;
    db.doctor(id)
        .map(|d| Json(d.to_json()))
        .ok_or_else(|| ApiFailure::not_found("Doctor not found"))
}

pub async fn available_slots(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<&'static str>>, ApiFailure> {
    let db = state.db.read().await;
    if db.doctor(id).is_none() {
        return Err(ApiFailure::not_found("Doctor not found"));
    }
    let booked: Vec<&str> = db
        .appointments
        .iter()
        .filter(|a| {
            a.doctor_id == id && a.appointment_date == query.date && a.status != "cancelled"
        })
        .map(|a| a.appointment_time.as_str())
        .collect();
    Ok(Json(
        SLOT_TIMES
            .iter()
            .copied()
            .filter(|slot| !booked.contains(slot))
            .collect(),
    ))
}

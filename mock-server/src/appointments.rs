use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::state::{paginate, rfc3339_now, AppState, AppointmentRow, SLOT_TIMES};

const STATUSES: [&str; 4] = ["pending", "confirmed", "cancelled", "completed"];

#[derive(Deserialize)]
pub struct OffsetQuery {
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct BookingInput {
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: String,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<OffsetQuery>,
) -> Json<Vec<Value>> {
    let db = state.db.read().await;
    let owned = db.appointments.iter().filter(|a| a.patient_id == user.id);
    Json(
        paginate(owned, query.skip, query.limit)
            .into_iter()
            .map(|a| db.appointment_json(a))
            .collect(),
    )
}

pub async fn book_appointment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<BookingInput>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let mut db = state.db.write().await;
    if db.doctor(input.doctor_id).is_none() {
        return Err(ApiFailure::not_found("Doctor not found"));
    }
    if !SLOT_TIMES.contains(&input.appointment_time.as_str()) {
        return Err(ApiFailure::bad_request("Invalid time slot"));
    }
    let taken = db.appointments.iter().any(|a| {
        a.doctor_id == input.doctor_id
            && a.appointment_date == input.appointment_date
            && a.appointment_time == input.appointment_time
            && a.status != "cancelled"
    });
    if taken {
        return Err(ApiFailure::conflict("Time slot is already booked"));
    }

    let row = AppointmentRow {
        id: db.next_id(),
        patient_id: user.id,
        doctor_id: input.doctor_id,
        appointment_date: input.appointment_date,
        appointment_time: input.appointment_time,
        status: "pending".to_string(),
        reason: input.reason,
        created_at: rfc3339_now(),
    };
    let body = db.appointment_json(&row);
    db.appointments.push(row);
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiFailure> {
    let db = state.db.read().await;
    db.appointments
        .iter()
        .find(|a| a.id == id && a.patient_id == user.id)
        .map(|a| Json(db.appointment_json(a)))
        .ok_or_else(|| ApiFailure::not_found("Appointment not found"))
}

pub async fn update_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<StatusInput>,
) -> Result<Json<Value>, ApiFailure> {
    if !STATUSES.contains(&input.status.as_str()) {
        return Err(ApiFailure::bad_request("Invalid status"));
    }
    let mut db = state.db.write().await;
    let row = db
        .appointments
        .iter_mut()
        .find(|a| a.id == id && a.patient_id == user.id)
        .ok_or_else(|| ApiFailure::not_found("Appointment not found"))?;
    row.status = input.status;
    let row = row.clone();
    Ok(Json(db.appointment_json(&row)))
}

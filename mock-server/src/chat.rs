use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::appointments::OffsetQuery;
use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::state::{paginate, rfc3339_now, AppState, MessageRow, RoomRow};

#[derive(Deserialize)]
pub struct StartChatInput {
    pub doctor_id: i64,
}

#[derive(Deserialize)]
pub struct MessageInput {
    pub content: String,
}

pub async fn list_rooms(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<OffsetQuery>,
) -> Json<Vec<Value>> {
    let db = state.db.read().await;
    let owned = db.rooms.iter().filter(|r| r.patient_id == user.id);
    Json(
        paginate(owned, query.skip, query.limit)
            .into_iter()
            .map(|r| db.room_json(r))
            .collect(),
    )
}

/// Returns the existing room with 200, or a new one with 201.
pub async fn start_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<StartChatInput>,
) -> Result<(StatusCode, Json<Value>), ApiFailure> {
    let mut db = state.db.write().await;
    if db.doctor(input.doctor_id).is_none() {
        return Err(ApiFailure::not_found("Doctor not found"));
    }
    if let Some(room) = db
        .rooms
        .iter()
        .find(|r| r.patient_id == user.id && r.doctor_id == input.doctor_id)
    {
        return Ok((StatusCode::OK, Json(db.room_json(room))));
    }

    let room = RoomRow {
        id: db.next_id(),
        patient_id: user.id,
        doctor_id: input.doctor_id,
        created_at: rfc3339_now(),
    };
    let body = db.room_json(&room);
    db.rooms.push(room);
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<i64>,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<Value>, ApiFailure> {
    let db = state.db.read().await;
    if !db.rooms.iter().any(|r| r.id == room_id && r.patient_id == user.id) {
        return Err(ApiFailure::not_found("Chat room not found"));
    }
    let in_room = db.messages.iter().filter(|m| m.room_id == room_id);
    let data = paginate(in_room, query.skip, query.limit);
    Ok(Json(json!({ "data": data })))
}

pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<i64>,
    Json(input): Json<MessageInput>,
) -> Result<(StatusCode, Json<MessageRow>), ApiFailure> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(ApiFailure::bad_request("Message cannot be empty"));
    }
    let mut db = state.db.write().await;
    if !db.rooms.iter().any(|r| r.id == room_id && r.patient_id == user.id) {
        return Err(ApiFailure::not_found("Chat room not found"));
    }
    let message = MessageRow {
        id: db.next_id(),
        room_id,
        sender_id: user.id,
        content: content.to_string(),
        created_at: rfc3339_now(),
        is_read: false,
    };
    db.messages.push(message.clone());
    Ok((StatusCode::CREATED, Json(message)))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::ApiFailure;
use crate::state::{naive_now, AppState, JournalRow};

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct CreateEntry {
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateEntry {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Newest first, wrapped in `{"data": [...], "total", "page"}`.
pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let db = state.db.read().await;
    let mut owned: Vec<&JournalRow> = db
        .journal
        .iter()
        .filter(|e| e.user_id == user.id)
        .collect();
    owned.sort_by(|a, b| b.id.cmp(&a.id));
    let total = owned.len();
    let data: Vec<&JournalRow> = owned
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(limit))
        .take(limit)
        .collect();
    Json(json!({ "data": data, "total": total, "page": page }))
}

pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateEntry>,
) -> Result<(StatusCode, Json<JournalRow>), ApiFailure> {
    if input.title.trim().is_empty() {
        return Err(ApiFailure::bad_request("Title is required"));
    }
    let mut db = state.db.write().await;
    let entry = JournalRow {
        id: db.next_id(),
        user_id: user.id,
        title: input.title.trim().to_string(),
        content: input.content,
        mood: input.mood,
        tags: input.tags,
        created_at: naive_now(),
        updated_at: None,
    };
    db.journal.push(entry.clone());
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<JournalRow>, ApiFailure> {
    let db = state.db.read().await;
    db.journal
        .iter()
        .find(|e| e.id == id && e.user_id == user.id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiFailure::not_found("Entry not found"))
}

pub async fn update_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdateEntry>,
) -> Result<Json<JournalRow>, ApiFailure> {
    let mut db = state.db.write().await;
    let entry = db
        .journal
        .iter_mut()
        .find(|e| e.id == id && e.user_id == user.id)
        .ok_or_else(|| ApiFailure::not_found("Entry not found"))?;
    if let Some(title) = input.title {
        entry.title = title;
    }
    if let Some(content) = input.content {
        entry.content = content;
    }
    if let Some(mood) = input.mood {
        entry.mood = Some(mood);
    }
    if let Some(tags) = input.tags {
        entry.tags = tags;
    }
    entry.updated_at = Some(naive_now());
    Ok(Json(entry.clone()))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiFailure> {
    let mut db = state.db.write().await;
    let before = db.journal.len();
    db.journal.retain(|e| !(e.id == id && e.user_id == user.id));
    if db.journal.len() == before {
        return Err(ApiFailure::not_found("Entry not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

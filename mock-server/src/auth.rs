use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiFailure;
use crate::state::{AppState, UserRow};

#[derive(Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenOut {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// The user owning the request's bearer token.
pub struct CurrentUser(pub UserRow);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiFailure::unauthorized("Not authenticated"))?;

        let db = state.db.read().await;
        db.sessions
            .get(token)
            .and_then(|user_id| db.user(*user_id))
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiFailure::unauthorized("Could not validate credentials"))
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<UserRow>), ApiFailure> {
    let email = input.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiFailure::bad_request("Email is required"));
    }
    if input.password.len() < 6 {
        return Err(ApiFailure::bad_request("Password must be at least 6 characters"));
    }

    let mut db = state.db.write().await;
    if db.users.iter().any(|u| u.email == email) {
        return Err(ApiFailure::bad_request("Email already registered"));
    }
    let user = UserRow {
        id: db.next_id(),
        email,
        password: input.password,
        full_name: input.full_name,
        role: "patient".to_string(),
    };
    db.users.push(user.clone());
    tracing::info!(user_id = user.id, "registered user");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<TokenOut>, ApiFailure> {
    let email = input.email.trim().to_lowercase();
    let mut db = state.db.write().await;
    let user_id = db
        .users
        .iter()
        .find(|u| u.email == email && u.password == input.password)
        .map(|u| u.id)
        .ok_or_else(|| ApiFailure::unauthorized("Incorrect email or password"))?;

    let access_token = Uuid::new_v4().to_string();
    db.sessions.insert(access_token.clone(), user_id);
    tracing::info!(user_id, "issued access token");
    Ok(Json(TokenOut {
        access_token,
        refresh_token: Uuid::new_v4().to_string(),
        token_type: "bearer",
    }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserRow> {
    Json(user)
}

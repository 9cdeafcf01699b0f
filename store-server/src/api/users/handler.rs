//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::models::{User, UserCreate, UserUpdate};

use crate::api::DeleteResponse;
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser, UserChanges, hash_password};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppJson, AppResult, ErrorCode};

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

fn user_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
}

/// GET /api/users - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(Json(user))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let created = user::create(
        &state.pool,
        NewUser {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            role: payload.role,
            hash_pass: hash(&payload.password)?,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, role = ?created.role, "User created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UserUpdate>,
) -> AppResult<Json<User>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_email(&payload.email)?;

    let hash_pass = match payload.password.as_deref() {
        Some(p) => {
            validate_password(p)?;
            Some(hash(p)?)
        }
        None => None,
    };

    let updated = user::update(
        &state.pool,
        id,
        UserChanges {
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            role: payload.role,
            hash_pass,
        },
    )
    .await
    .map_err(|e| e.into_app_error(ErrorCode::UserNotFound))?;

    tracing::info!(user_id = id, "User updated");
    Ok(Json(updated))
}

/// DELETE /api/users/{id}
///
/// Orders referencing the user keep their `customer_id`.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteResponse>> {
    if !user::delete(&state.pool, id).await? {
        return Err(user_not_found(id));
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(DeleteResponse::ok())
}

//! User administration endpoints. All of them require the admin role.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{CreateUserRequest, Role, User, UserResponse};
use crate::AppState;

use super::auth::{hash_password, require_role};
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_password, validate_role, validate_username, validate_uuid};
use super::MessageResponse;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    actor: User,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_role(&actor, Role::Admin)?;

    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at ASC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

fn validate_create_request(req: &CreateUserRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    match req.username.as_deref() {
        None | Some("") => {
            errors.add("username", "Username is required");
        }
        Some(username) => {
            if let Err(e) = validate_username(username) {
                errors.add("username", e);
            }
        }
    }

    match req.password.as_deref() {
        None | Some("") => {
            errors.add("password", "Password is required");
        }
        Some(password) => {
            if let Err(e) = validate_password(password) {
                errors.add("password", e);
            }
        }
    }

    match req.role.as_deref() {
        None | Some("") => {
            errors.add("role", "Role is required");
        }
        Some(role) => {
            if let Err(e) = validate_role(role) {
                errors.add("role", e);
            }
        }
    }

    errors.finish()
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    actor: User,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    require_role(&actor, Role::Admin)?;
    validate_create_request(&req)?;

    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let role: Role = req
        .role
        .unwrap_or_default()
        .parse()
        .map_err(|e: String| ApiError::validation_field("role", e))?;

    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(&username)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("Username already exists"));
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&password).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })?;
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&username)
    .bind(&password_hash)
    .bind(role)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        // Lost a race on the UNIQUE constraint
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("Username already exists")
        } else {
            tracing::error!("Failed to create user: {}", e);
            ApiError::database("Failed to create user")
        }
    })?;

    tracing::info!(username = %username, role = %role, "User created");

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    actor: User,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_role(&actor, Role::Admin)?;

    if let Err(e) = validate_uuid(&id, "user_id") {
        return Err(ApiError::validation_field("user_id", e));
    }

    let target: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    // The bootstrap admin account is protected
    if target.username == state.config.auth.admin_username {
        return Err(ApiError::invalid_operation("Cannot delete the admin user"));
    }

    // Remove the user together with their reservations
    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM reservations WHERE owner_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(username = %target.username, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}

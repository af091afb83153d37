//! Reservation endpoints: create with conflict detection, list own
//! reservations joined with resource detail, delete with ownership checks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::booking::{self, Slot};
use crate::db::{
    CreateReservationRequest, Reservation, ReservationResourceRow, ReservationWithResource,
    Resource, User,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_date, validate_duration, validate_start_time, validate_uuid};
use super::MessageResponse;

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<ReservationWithResource>>, ApiError> {
    let rows: Vec<ReservationResourceRow> = sqlx::query_as(
        r#"
        SELECT
            r.id, r.resource_id, r.owner_id, r.date, r.start_time, r.duration, r.created_at,
            res.name AS resource_name,
            res.type AS resource_type,
            res.created_at AS resource_created_at
        FROM reservations AS r
        INNER JOIN resources AS res ON res.id = r.resource_id
        WHERE r.owner_id = ?
        ORDER BY r.date ASC, r.start_time ASC
        "#,
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

fn validate_create_request(req: &CreateReservationRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    match req.resource_id.as_deref() {
        None | Some("") => {
            errors.add("resourceId", "Resource id is required");
        }
        Some(id) => {
            if let Err(e) = validate_uuid(id, "resourceId") {
                errors.add("resourceId", e);
            }
        }
    }

    match req.date.as_deref() {
        None | Some("") => {
            errors.add("date", "Date is required");
        }
        Some(date) => {
            if let Err(e) = validate_date(date) {
                errors.add("date", e);
            }
        }
    }

    match req.start_time.as_deref() {
        None | Some("") => {
            errors.add("startTime", "Start time is required");
        }
        Some(start_time) => {
            if let Err(e) = validate_start_time(start_time) {
                errors.add("startTime", e);
            }
        }
    }

    match req.duration {
        None => {
            errors.add("duration", "Duration is required");
        }
        Some(duration) => {
            if let Err(e) = validate_duration(duration) {
                errors.add("duration", e);
            }
        }
    }

    errors.finish()
}

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    validate_create_request(&req)?;

    let resource_id = req.resource_id.unwrap_or_default();
    let date = req.date.unwrap_or_default();
    let start_time = req.start_time.unwrap_or_default();
    let duration = req.duration.unwrap_or_default();

    let resource: Resource = sqlx::query_as("SELECT * FROM resources WHERE id = ?")
        .bind(&resource_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found"))?;

    let candidate = Slot::parse(&start_time, duration).map_err(|e| {
        tracing::error!("Failed to compute reservation interval: {}", e);
        ApiError::internal("Failed to compute reservation interval")
    })?;

    // Serialize check-then-insert per (resource, date) so two overlapping
    // requests cannot both pass the conflict scan.
    let lock = state.booking_lock(&resource.id, &date);
    let _guard = lock.lock().await;

    let conflict = booking::find_conflict(&state.db, &resource.id, &date, &candidate)
        .await
        .map_err(|e| {
            tracing::error!("Conflict check failed: {}", e);
            ApiError::internal("Failed to check availability")
        })?;

    if let Some(existing) = conflict {
        tracing::debug!(
            resource = %resource.name,
            date = %date,
            existing = %existing.id,
            "Rejected overlapping reservation"
        );
        return Err(ApiError::conflict("Time slot already reserved"));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO reservations (id, resource_id, owner_id, date, start_time, duration, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&resource.id)
    .bind(&user.id)
    .bind(&date)
    .bind(&start_time)
    .bind(duration)
    .bind(&now)
    .execute(&state.db)
    .await?;

    tracing::info!(
        resource = %resource.name,
        date = %date,
        start = %start_time,
        owner = %user.username,
        "Reservation created"
    );

    let reservation: Reservation = sqlx::query_as("SELECT * FROM reservations WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

pub async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Err(e) = validate_uuid(&id, "reservation_id") {
        return Err(ApiError::validation_field("reservation_id", e));
    }

    let reservation: Reservation = sqlx::query_as("SELECT * FROM reservations WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Reservation not found"))?;

    // Owner or admin only
    if reservation.owner_id != user.id && !user.is_admin() {
        return Err(ApiError::forbidden("Access denied"));
    }

    sqlx::query("DELETE FROM reservations WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    tracing::info!(reservation = %id, actor = %user.username, "Reservation deleted");

    Ok(Json(MessageResponse {
        message: "Reservation deleted".to_string(),
    }))
}

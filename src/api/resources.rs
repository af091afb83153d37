//! Bookable resource listing. Open to any authenticated caller.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::db::{Resource, User};
use crate::AppState;

use super::error::ApiError;

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
    _user: User,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let resources: Vec<Resource> = sqlx::query_as("SELECT * FROM resources ORDER BY name ASC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(resources))
}

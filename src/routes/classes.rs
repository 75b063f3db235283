//! Class timetable routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::class::{CreateClass, GymClass, UpdateClass};
use crate::services::class as class_service;
use crate::AppState;

/// GET /api/v1/classes — the timetable, ordered by day then start time.
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<GymClass>>>, AppError> {
    let rows = class_service::list(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/classes (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateClass>,
) -> Result<Json<ApiResponse<GymClass>>, AppError> {
    let row = class_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /api/v1/classes/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateClass>,
) -> Result<Json<ApiResponse<GymClass>>, AppError> {
    let row = class_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/v1/classes/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    class_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Class deleted"))
}

//! Trainer roster routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::trainer::{CreateTrainer, Trainer, UpdateTrainer};
use crate::services::trainer as trainer_service;
use crate::AppState;

/// GET /api/v1/trainers
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Trainer>>>, AppError> {
    let rows = trainer_service::list(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/trainers (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateTrainer>,
) -> Result<Json<ApiResponse<Trainer>>, AppError> {
    let row = trainer_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /api/v1/trainers/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTrainer>,
) -> Result<Json<ApiResponse<Trainer>>, AppError> {
    let row = trainer_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/v1/trainers/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    trainer_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Trainer deleted"))
}

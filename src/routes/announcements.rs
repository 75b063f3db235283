//! Announcement board routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::announcement::{CreateAnnouncement, Announcement, UpdateAnnouncement};
use crate::services::announcement as announcement_service;
use crate::AppState;

/// GET /api/v1/announcements
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Announcement>>>, AppError> {
    let rows = announcement_service::list(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/announcements (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<CreateAnnouncement>,
) -> Result<Json<ApiResponse<Announcement>>, AppError> {
    let row = announcement_service::create(&state.db, &body, admin.id).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /api/v1/announcements/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAnnouncement>,
) -> Result<Json<ApiResponse<Announcement>>, AppError> {
    let row = announcement_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/v1/announcements/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    announcement_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Announcement deleted"))
}

//! Membership plan routes.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::plan::{CreatePlan, Plan, UpdatePlan};
use crate::services::plan as plan_service;
use crate::AppState;

/// GET /api/v1/plans
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Plan>>>, AppError> {
    let rows = plan_service::list(&state.db).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/plans (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreatePlan>,
) -> Result<Json<ApiResponse<Plan>>, AppError> {
    let row = plan_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /api/v1/plans/{id} (admin)
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePlan>,
) -> Result<Json<ApiResponse<Plan>>, AppError> {
    let row = plan_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /api/v1/plans/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    plan_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Plan deleted"))
}

//! Member directory routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{CreateMember, MemberResponse, UpdateMember};
use crate::services::member::{self as member_service, MemberFilters, MemberStats};
use crate::AppState;

/// GET /api/v1/members — list members with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<MemberFilters>,
) -> Result<Json<ApiResponse<PagedResult<MemberResponse>>>, AppError> {
    let result = member_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// GET /api/v1/members/stats — headcounts by status and tier (admin).
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<MemberStats>>, AppError> {
    let stats = member_service::stats(&state.db).await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/members/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MemberResponse>>, AppError> {
    let member = member_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(member))
}

/// POST /api/v1/members — create a member (admin).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateMember>,
) -> Result<Json<ApiResponse<MemberResponse>>, AppError> {
    let member =
        member_service::create(&state.db, &body, &state.config.default_member_password).await?;
    Ok(ApiResponse::success(member))
}

/// PUT /api/v1/members/{id} — partial update (admin).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMember>,
) -> Result<Json<ApiResponse<MemberResponse>>, AppError> {
    let member = member_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(member))
}

/// DELETE /api/v1/members/{id} (admin)
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    member_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Member deleted"))
}

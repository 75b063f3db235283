//! Attendance routes.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::attendance::{Attendance, AttendanceCount, MarkAttendance};
use crate::services::attendance::{self as attendance_service, AttendanceFilters};
use crate::AppState;

/// GET /api/v1/attendance/today — check-ins since local midnight.
pub async fn today(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<AttendanceCount>>, AppError> {
    let count = attendance_service::count_today(&state.db, state.business_now()).await?;
    Ok(ApiResponse::success(AttendanceCount { count }))
}

/// GET /api/v1/attendance (admin)
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<AttendanceFilters>,
) -> Result<Json<ApiResponse<Vec<Attendance>>>, AppError> {
    let rows = attendance_service::list(&state.db, &filters).await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/v1/attendance — mark a check-in (admin).
pub async fn mark(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<MarkAttendance>,
) -> Result<Json<ApiResponse<Attendance>>, AppError> {
    let row = attendance_service::mark(&state.db, &body).await?;
    Ok(ApiResponse::success(row))
}

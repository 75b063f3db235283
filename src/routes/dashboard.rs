//! Dashboard routes: administrator overview and member self-service view.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::services::dashboard::{self, AdminDashboard, MemberDashboard};
use crate::AppState;

/// GET /api/v1/dashboard/summary — gym-wide counters (admin).
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<ApiResponse<AdminDashboard>> {
    let view = dashboard::get_admin_dashboard(&state.db, state.business_now()).await;
    ApiResponse::success(view)
}

/// GET /api/v1/dashboard/me — the signed-in member's own dashboard.
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<MemberDashboard>>, AppError> {
    let view =
        dashboard::get_member_dashboard(&state.db, current_user.id, state.business_now()).await?;
    Ok(ApiResponse::success(view))
}

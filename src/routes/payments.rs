//! Payment ledger routes. Administrator only.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::models::payment::{CreatePayment, Payment, UpdatePaymentStatus};
use crate::services::payment::{self as payment_service, PaymentFilters};
use crate::AppState;

/// GET /api/v1/payments — newest first, filterable by `status` and `member_id`.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<PaymentFilters>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, AppError> {
    let payments = payment_service::list(&state.db, &filters).await?;
    Ok(ApiResponse::success(payments))
}

/// POST /api/v1/payments
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreatePayment>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let payment = payment_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(payment))
}

/// PATCH /api/v1/payments/{id} — move a payment to a new status.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePaymentStatus>,
) -> Result<Json<ApiResponse<Payment>>, AppError> {
    let payment = payment_service::update_status(&state.db, id, body.status).await?;
    tracing::info!(
        payment_id = %id,
        status = ?payment.status,
        changed_by = %admin.id,
        "Payment status changed"
    );
    Ok(ApiResponse::success(payment))
}

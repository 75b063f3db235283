//! Payment ledger service.
//!
//! The member reference is checked once when a payment is recorded. After that the
//! payment keeps its own copy of the member name and email, so deleting a member
//! leaves their payment history readable.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::payment::{CreatePayment, Payment, PaymentStatus};
use crate::services::member;

/// Filters for listing payments.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaymentFilters {
    pub status: Option<PaymentStatus>,
    pub member_id: Option<Uuid>,
}

/// Derive a transaction reference for payments recorded without one.
///
/// Inputs: member id, plan, amount, timestamp in nanoseconds.
pub fn transaction_reference(member_id: Uuid, plan: &str, amount: i64, at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!(
        "PAY:{member_id}:{plan}:{amount}:{}",
        at.timestamp_nanos_opt().unwrap_or_else(|| at.timestamp())
    ));
    let digest = hex::encode(hasher.finalize());
    format!("TXN-{}", digest[..12].to_uppercase())
}

/// Payments, newest first.
pub async fn list(pool: &PgPool, filters: &PaymentFilters) -> Result<Vec<Payment>, AppError> {
    let rows = sqlx::query_as::<_, Payment>(
        r#"
        SELECT * FROM payments
        WHERE ($1::payment_status IS NULL OR status = $1)
          AND ($2::uuid IS NULL OR member_id = $2)
        ORDER BY date DESC
        "#,
    )
    .bind(filters.status)
    .bind(filters.member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Record a payment against an existing member.
pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, AppError> {
    input.validate()?;

    let member = member::require_member(pool, input.member_id).await?;
    let now = Utc::now();
    let transaction_id = input
        .transaction_id
        .clone()
        .unwrap_or_else(|| transaction_reference(member.id, &input.plan, input.amount, now));

    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (member_id, member_name, email, plan, amount, method, status,
            transaction_id, date)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Cash'::payment_method),
            COALESCE($7, 'pending'::payment_status), $8, COALESCE($9, NOW()))
        RETURNING *
        "#,
    )
    .bind(member.id)
    .bind(input.member_name.as_deref().unwrap_or(&member.name))
    .bind(input.email.as_deref().unwrap_or(&member.email))
    .bind(&input.plan)
    .bind(input.amount)
    .bind(input.method)
    .bind(input.status)
    .bind(&transaction_id)
    .bind(input.date)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(e, format!("Transaction '{transaction_id}' already recorded"))
    })?;

    tracing::info!(
        payment_id = %payment.id,
        member_id = %payment.member_id,
        amount = payment.amount,
        "Payment recorded"
    );
    Ok(payment)
}

/// Move a payment to a new status.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: PaymentStatus,
) -> Result<Payment, AppError> {
    sqlx::query_as::<_, Payment>(
        "UPDATE payments SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn transaction_reference_is_deterministic() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
        let a = transaction_reference(Uuid::nil(), "Premium", 2499, at);
        let b = transaction_reference(Uuid::nil(), "Premium", 2499, at);
        assert_eq!(a, b);
        assert!(a.starts_with("TXN-"));
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn transaction_reference_changes_with_inputs() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
        let base = transaction_reference(Uuid::nil(), "Premium", 2499, at);
        assert_ne!(base, transaction_reference(Uuid::nil(), "Basic", 2499, at));
        assert_ne!(base, transaction_reference(Uuid::nil(), "Premium", 999, at));
        assert_ne!(
            base,
            transaction_reference(Uuid::nil(), "Premium", 2499, at + chrono::Duration::seconds(1))
        );
    }
}

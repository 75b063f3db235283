//! Membership payments. `member_id` is advisory: checked on write, not a foreign key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    #[sqlx(rename = "UPI")]
    #[serde(rename = "UPI")]
    Upi,
    #[sqlx(rename = "Net Banking")]
    #[serde(rename = "Net Banking")]
    NetBanking,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub email: String,
    pub plan: String,
    /// Minor currency units.
    pub amount: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePayment {
    pub member_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub member_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub plan: String,
    #[validate(range(min = 1))]
    pub amount: i64,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 100))]
    pub transaction_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaymentStatus {
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentStatus::Completed).unwrap(), "\"completed\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::NetBanking).unwrap(), "\"Net Banking\"");
        let method: PaymentMethod = serde_json::from_str("\"UPI\"").unwrap();
        assert_eq!(method, PaymentMethod::Upi);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<PaymentStatus>("\"refunded\"").is_err());
    }

    #[test]
    fn non_positive_amount_fails_validation() {
        let input: CreatePayment = serde_json::from_value(serde_json::json!({
            "member_id": Uuid::nil(),
            "plan": "Basic",
            "amount": 0
        }))
        .unwrap();
        assert!(input.validate().is_err());
    }
}

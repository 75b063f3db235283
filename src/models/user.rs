//! Member account model. Administrators and members share one table, split by role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Administrator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Member => "member",
            UserRole::Administrator => "administrator",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, Default)]
#[sqlx(type_name = "membership_type")]
pub enum MembershipType {
    #[default]
    Basic,
    Premium,
    #[sqlx(rename = "VIP")]
    #[serde(rename = "VIP")]
    Vip,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "member_status")]
pub enum MemberStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

/// Person to call when something goes wrong on the gym floor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
}

/// Full user row from database (includes password_hash — never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub membership_type: MembershipType,
    pub address: Option<String>,
    pub emergency_contact: Option<serde_json::Value>,
    pub status: MemberStatus,
    pub join_date: DateTime<Utc>,
    pub membership_expiry: Option<DateTime<Utc>>,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member response DTO — excludes password_hash and lockout bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub membership_type: MembershipType,
    pub address: Option<String>,
    pub emergency_contact: Option<serde_json::Value>,
    pub status: MemberStatus,
    pub join_date: DateTime<Utc>,
    pub membership_expiry: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for MemberResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            phone: u.phone,
            membership_type: u.membership_type,
            address: u.address,
            emergency_contact: u.emergency_contact,
            status: u.status,
            join_date: u.join_date,
            membership_expiry: u.membership_expiry,
            last_login: u.last_login,
            created_at: u.created_at,
        }
    }
}

/// Self-service sign-up payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
}

/// Admin-side member creation; the password falls back to the configured default.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMember {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub membership_expiry: Option<DateTime<Utc>>,
}

/// Partial member update. Role and password are deliberately absent.
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub status: Option<MemberStatus>,
    pub membership_expiry: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::nil(),
            name: "Test".to_string(),
            email: "test@gym.test".to_string(),
            password_hash: "secret_hash".to_string(),
            role: UserRole::Member,
            phone: None,
            membership_type: MembershipType::Premium,
            address: None,
            emergency_contact: None,
            status: MemberStatus::Active,
            join_date: Utc::now(),
            membership_expiry: None,
            failed_login_attempts: 0,
            locked_until: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn wire_names_match_stored_values() {
        assert_eq!(serde_json::to_string(&UserRole::Administrator).unwrap(), "\"administrator\"");
        assert_eq!(serde_json::to_string(&MembershipType::Vip).unwrap(), "\"VIP\"");
        assert_eq!(serde_json::to_string(&MemberStatus::Suspended).unwrap(), "\"Suspended\"");
        assert_eq!(UserRole::Member.as_str(), "member");
    }

    #[test]
    fn member_response_excludes_password() {
        let json = serde_json::to_string(&MemberResponse::from(sample_user())).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
        assert!(!json.contains("failed_login_attempts"));
    }

    #[test]
    fn update_member_ignores_role_field() {
        let update: UpdateMember =
            serde_json::from_str(r#"{"name":"New","role":"administrator"}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some("New"));
    }

    #[test]
    fn create_member_requires_valid_email() {
        let input = CreateMember {
            name: "Jane".to_string(),
            email: "jane-at-gym".to_string(),
            password: None,
            phone: None,
            membership_type: None,
            address: None,
            emergency_contact: None,
            membership_expiry: None,
        };
        assert!(input.validate().is_err());
    }
}

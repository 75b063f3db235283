//! Member directory service: listing, CRUD and headcount statistics.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::{
    CreateMember, MemberResponse, MemberStatus, MembershipType, UpdateMember, User,
};
use crate::services::auth::hash_password;

/// Filters for listing members.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MemberFilters {
    pub status: Option<MemberStatus>,
    pub membership_type: Option<MembershipType>,
    pub search: Option<String>,
}

/// Headcounts for the member statistics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberStats {
    pub total_members: i64,
    pub active_members: i64,
    pub inactive_members: i64,
    pub suspended_members: i64,
    pub membership_types: Vec<MembershipCount>,
}

/// Number of members on one membership tier.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, PartialEq)]
pub struct MembershipCount {
    pub membership_type: MembershipType,
    pub count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    total: i64,
    active: i64,
    inactive: i64,
    suspended: i64,
}

/// List members (administrators excluded), newest first.
pub async fn list(
    pool: &PgPool,
    filters: &MemberFilters,
    pagination: &Pagination,
) -> Result<PagedResult<MemberResponse>, AppError> {
    let mut conditions: Vec<String> = vec!["role = 'member'".to_string()];
    let mut param_index = 0u32;

    if filters.status.is_some() {
        param_index += 1;
        conditions.push(format!("status = ${param_index}"));
    }
    if filters.membership_type.is_some() {
        param_index += 1;
        conditions.push(format!("membership_type = ${param_index}"));
    }
    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(name ILIKE ${param_index} OR email ILIKE ${param_index})"
        ));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    let count_sql = format!("SELECT COUNT(*) FROM users {where_clause}");
    let data_sql = format!(
        "SELECT * FROM users {where_clause} ORDER BY created_at DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, User>(&data_sql);

    if let Some(status) = filters.status {
        count_query = count_query.bind(status);
        data_query = data_query.bind(status);
    }
    if let Some(tier) = filters.membership_type {
        count_query = count_query.bind(tier);
        data_query = data_query.bind(tier);
    }
    if let Some(ref search) = filters.search {
        let pattern = format!("%{search}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(MemberResponse::from)
        .collect();

    Ok(PagedResult::new(items, total, pagination))
}

/// Find a member by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<MemberResponse, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(MemberResponse::from)
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
}

/// Create a member on behalf of an administrator.
pub async fn create(
    pool: &PgPool,
    input: &CreateMember,
    default_password: &str,
) -> Result<MemberResponse, AppError> {
    input.validate()?;

    let password_hash = hash_password(input.password.as_deref().unwrap_or(default_password))?;
    let emergency_contact = input
        .emergency_contact
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Internal(format!("Emergency contact encoding failed: {e}")))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, role, phone, membership_type,
            address, emergency_contact, status, membership_expiry)
        VALUES ($1, $2, $3, 'member', $4, COALESCE($5, 'Basic'::membership_type), $6, $7,
            'Active', $8)
        RETURNING *
        "#,
    )
    .bind(input.name.trim())
    .bind(input.email.trim().to_lowercase())
    .bind(&password_hash)
    .bind(&input.phone)
    .bind(input.membership_type)
    .bind(&input.address)
    .bind(&emergency_contact)
    .bind(input.membership_expiry)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A member with this email already exists"))?;

    tracing::info!(member_id = %user.id, "Member created");
    Ok(user.into())
}

/// Update a member. Role and password cannot be changed through this path.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateMember,
) -> Result<MemberResponse, AppError> {
    input.validate()?;

    let email = input.email.as_ref().map(|e| e.trim().to_lowercase());
    if let Some(ref email) = email {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(id)
        .fetch_one(pool)
        .await?;
        if taken {
            return Err(AppError::Conflict(
                "Email already in use by another member".to_string(),
            ));
        }
    }

    let emergency_contact = input
        .emergency_contact
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Internal(format!("Emergency contact encoding failed: {e}")))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            membership_type = COALESCE($5, membership_type),
            address = COALESCE($6, address),
            emergency_contact = COALESCE($7, emergency_contact),
            status = COALESCE($8, status),
            membership_expiry = COALESCE($9, membership_expiry),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.name.as_deref().map(str::trim))
    .bind(&email)
    .bind(&input.phone)
    .bind(input.membership_type)
    .bind(&input.address)
    .bind(&emergency_contact)
    .bind(input.status)
    .bind(input.membership_expiry)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Email already in use by another member"))?
    .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    Ok(user.into())
}

/// Delete a member. Their payments and attendance rows are left in place.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Member not found".to_string()));
    }
    tracing::info!(member_id = %id, "Member deleted");
    Ok(())
}

/// Existence check used by writes that reference a member. Administrators do not count.
pub async fn require_member(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND role = 'member'")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Member {id} does not exist")))
}

/// Headcounts by status and membership tier.
pub async fn stats(pool: &PgPool) -> Result<MemberStats, AppError> {
    let (status_row, membership_types) = tokio::try_join!(
        fetch_status_counts(pool),
        fetch_membership_breakdown(pool),
    )?;

    Ok(MemberStats {
        total_members: status_row.total,
        active_members: status_row.active,
        inactive_members: status_row.inactive,
        suspended_members: status_row.suspended,
        membership_types,
    })
}

async fn fetch_status_counts(pool: &PgPool) -> Result<StatusRow, AppError> {
    let row = sqlx::query_as::<_, StatusRow>(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN status = 'Active'    THEN 1 ELSE 0 END), 0) AS active,
            COALESCE(SUM(CASE WHEN status = 'Inactive'  THEN 1 ELSE 0 END), 0) AS inactive,
            COALESCE(SUM(CASE WHEN status = 'Suspended' THEN 1 ELSE 0 END), 0) AS suspended
        FROM users
        WHERE role = 'member'
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

async fn fetch_membership_breakdown(pool: &PgPool) -> Result<Vec<MembershipCount>, AppError> {
    let rows = sqlx::query_as::<_, MembershipCount>(
        r#"
        SELECT membership_type, COUNT(*) AS count
        FROM users
        WHERE role = 'member'
        GROUP BY membership_type
        ORDER BY membership_type
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::announcement::{Announcement, CreateAnnouncement, UpdateAnnouncement};

/// All announcements, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Announcement>, AppError> {
    let rows =
        sqlx::query_as::<_, Announcement>("SELECT * FROM announcements ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn create(
    pool: &PgPool,
    input: &CreateAnnouncement,
    created_by: Uuid,
) -> Result<Announcement, AppError> {
    input.validate()?;

    let row = sqlx::query_as::<_, Announcement>(
        r#"
        INSERT INTO announcements (title, message, priority, category, is_active, created_by)
        VALUES ($1, $2, COALESCE($3, 'normal'::announcement_priority),
            COALESCE($4, 'general'::announcement_category), COALESCE($5, true), $6)
        RETURNING *
        "#,
    )
    .bind(input.title.trim())
    .bind(&input.message)
    .bind(input.priority)
    .bind(input.category)
    .bind(input.is_active)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateAnnouncement,
) -> Result<Announcement, AppError> {
    input.validate()?;

    sqlx::query_as::<_, Announcement>(
        r#"
        UPDATE announcements SET
            title = COALESCE($2, title),
            message = COALESCE($3, message),
            priority = COALESCE($4, priority),
            category = COALESCE($5, category),
            is_active = COALESCE($6, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title.as_deref().map(str::trim))
    .bind(&input.message)
    .bind(input.priority)
    .bind(input.category)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }
    Ok(())
}

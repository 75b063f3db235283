//! Class timetable service.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::class::{CreateClass, GymClass, UpdateClass};

/// Full timetable ordered by day then start time.
pub async fn list(pool: &PgPool) -> Result<Vec<GymClass>, AppError> {
    let classes = sqlx::query_as::<_, GymClass>("SELECT * FROM classes ORDER BY day, time")
        .fetch_all(pool)
        .await?;
    Ok(classes)
}

pub async fn create(pool: &PgPool, input: &CreateClass) -> Result<GymClass, AppError> {
    input.validate()?;
    warn_if_overbooked(input.enrolled, Some(input.capacity), &input.name);

    let class = sqlx::query_as::<_, GymClass>(
        r#"
        INSERT INTO classes (name, instructor, day, time, duration, capacity, enrolled,
            description, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), $8, COALESCE($9, true))
        RETURNING *
        "#,
    )
    .bind(input.name.trim())
    .bind(input.instructor.trim())
    .bind(input.day)
    .bind(&input.time)
    .bind(input.duration)
    .bind(input.capacity)
    .bind(input.enrolled)
    .bind(&input.description)
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    Ok(class)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateClass) -> Result<GymClass, AppError> {
    input.validate()?;
    warn_if_overbooked(input.enrolled, input.capacity, &id.to_string());

    sqlx::query_as::<_, GymClass>(
        r#"
        UPDATE classes SET
            name = COALESCE($2, name),
            instructor = COALESCE($3, instructor),
            day = COALESCE($4, day),
            time = COALESCE($5, time),
            duration = COALESCE($6, duration),
            capacity = COALESCE($7, capacity),
            enrolled = COALESCE($8, enrolled),
            description = COALESCE($9, description),
            is_active = COALESCE($10, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.instructor.as_deref().map(str::trim))
    .bind(input.day)
    .bind(&input.time)
    .bind(input.duration)
    .bind(input.capacity)
    .bind(input.enrolled)
    .bind(&input.description)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM classes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Class not found".to_string()));
    }
    Ok(())
}

// Enrolment above capacity is allowed; the front desk decides what to do with it.
fn warn_if_overbooked(enrolled: Option<i32>, capacity: Option<i32>, class: &str) {
    if let (Some(enrolled), Some(capacity)) = (enrolled, capacity) {
        if enrolled > capacity {
            tracing::warn!(class, enrolled, capacity, "Class enrolment exceeds capacity");
        }
    }
}

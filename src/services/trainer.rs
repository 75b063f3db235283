use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::trainer::{CreateTrainer, Trainer, UpdateTrainer};

/// All trainers, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Trainer>, AppError> {
    let trainers = sqlx::query_as::<_, Trainer>("SELECT * FROM trainers ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(trainers)
}

pub async fn create(pool: &PgPool, input: &CreateTrainer) -> Result<Trainer, AppError> {
    input.validate()?;

    let trainer = sqlx::query_as::<_, Trainer>(
        r#"
        INSERT INTO trainers (name, email, phone, specialization, experience,
            certification, salary, status)
        VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7, COALESCE($8, 'Active'::trainer_status))
        RETURNING *
        "#,
    )
    .bind(input.name.trim())
    .bind(input.email.trim().to_lowercase())
    .bind(&input.phone)
    .bind(&input.specialization)
    .bind(input.experience)
    .bind(&input.certification)
    .bind(input.salary)
    .bind(input.status)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A trainer with this email already exists"))?;

    Ok(trainer)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateTrainer) -> Result<Trainer, AppError> {
    input.validate()?;

    sqlx::query_as::<_, Trainer>(
        r#"
        UPDATE trainers SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            specialization = COALESCE($5, specialization),
            experience = COALESCE($6, experience),
            certification = COALESCE($7, certification),
            salary = COALESCE($8, salary),
            status = COALESCE($9, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.email.as_ref().map(|e| e.trim().to_lowercase()))
    .bind(&input.phone)
    .bind(&input.specialization)
    .bind(input.experience)
    .bind(&input.certification)
    .bind(input.salary)
    .bind(input.status)
    .fetch_optional(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A trainer with this email already exists"))?
    .ok_or_else(|| AppError::NotFound("Trainer not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Trainer not found".to_string()));
    }
    Ok(())
}

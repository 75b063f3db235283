use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::plan::{CreatePlan, Plan, UpdatePlan};

fn features_json(features: Option<&Vec<String>>) -> Option<serde_json::Value> {
    features.map(|f| serde_json::Value::from(f.clone()))
}

/// All plans, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Plan>, AppError> {
    let plans = sqlx::query_as::<_, Plan>("SELECT * FROM plans ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(plans)
}

pub async fn create(pool: &PgPool, input: &CreatePlan) -> Result<Plan, AppError> {
    input.validate()?;

    let features = features_json(input.features.as_ref()).unwrap_or(serde_json::json!([]));

    let plan = sqlx::query_as::<_, Plan>(
        r#"
        INSERT INTO plans (name, price, duration, features, description, is_active)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, true))
        RETURNING *
        "#,
    )
    .bind(input.name.trim())
    .bind(input.price)
    .bind(&input.duration)
    .bind(&features)
    .bind(&input.description)
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    Ok(plan)
}

pub async fn update(pool: &PgPool, id: Uuid, input: &UpdatePlan) -> Result<Plan, AppError> {
    input.validate()?;

    sqlx::query_as::<_, Plan>(
        r#"
        UPDATE plans SET
            name = COALESCE($2, name),
            price = COALESCE($3, price),
            duration = COALESCE($4, duration),
            features = COALESCE($5, features),
            description = COALESCE($6, description),
            is_active = COALESCE($7, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.name.as_deref().map(str::trim))
    .bind(input.price)
    .bind(&input.duration)
    .bind(features_json(input.features.as_ref()))
    .bind(&input.description)
    .bind(input.is_active)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Plan not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Plan not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_become_json_array() {
        let features = vec!["Locker facility".to_string(), "Diet plan".to_string()];
        let json = features_json(Some(&features)).unwrap();
        assert_eq!(json, serde_json::json!(["Locker facility", "Diet plan"]));
        assert!(features_json(None).is_none());
    }
}

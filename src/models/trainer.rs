use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "trainer_status")]
pub enum TrainerStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub experience: i32,
    pub certification: Option<String>,
    pub salary: Option<i64>,
    pub status: TrainerStatus,
    pub join_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTrainer {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    #[validate(range(min = 0))]
    pub experience: Option<i32>,
    pub certification: Option<String>,
    #[validate(range(min = 0))]
    pub salary: Option<i64>,
    pub status: Option<TrainerStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateTrainer {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    #[validate(range(min = 0))]
    pub experience: Option<i32>,
    pub certification: Option<String>,
    #[validate(range(min = 0))]
    pub salary: Option<i64>,
    pub status: Option<TrainerStatus>,
}

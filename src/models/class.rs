//! Weekly class timetable entries.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Day a class recurs on. Stored and serialized by its English name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, PartialOrd, Ord)]
#[sqlx(type_name = "weekday")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct GymClass {
    pub id: Uuid,
    pub name: String,
    pub instructor: String,
    pub day: Weekday,
    pub time: String,
    /// Minutes.
    pub duration: i32,
    pub capacity: i32,
    pub enrolled: i32,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClass {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub instructor: String,
    pub day: Weekday,
    #[validate(custom(function = "validate_start_time"))]
    pub time: String,
    #[validate(range(min = 1))]
    pub duration: i32,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[validate(range(min = 0))]
    pub enrolled: Option<i32>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateClass {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub instructor: Option<String>,
    pub day: Option<Weekday>,
    #[validate(custom(function = "validate_start_time"))]
    pub time: Option<String>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0))]
    pub enrolled: Option<i32>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Start times are zero-padded 24-hour `HH:MM`, so the timetable sorts by them as text.
fn validate_start_time(time: &str) -> Result<(), ValidationError> {
    let shaped = time.len() == 5
        && time
            .bytes()
            .enumerate()
            .all(|(i, b)| if i == 2 { b == b':' } else { b.is_ascii_digit() });
    if shaped && NaiveTime::parse_from_str(time, "%H:%M").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("start_time"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_serializes_by_name() {
        for day in [Weekday::Monday, Weekday::Saturday, Weekday::Sunday] {
            let json = serde_json::to_string(&day).unwrap();
            assert_eq!(json, format!("\"{}\"", day.as_str()));
        }
    }

    #[test]
    fn lowercase_weekday_is_rejected() {
        assert!(serde_json::from_str::<Weekday>("\"monday\"").is_err());
    }

    #[test]
    fn create_class_rejects_zero_capacity() {
        let input: CreateClass = serde_json::from_str(
            r#"{"name":"Yoga","instructor":"Sarah","day":"Monday","time":"07:00","duration":60,"capacity":0}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn start_time_must_be_padded_24_hour_clock() {
        for good in ["00:00", "07:00", "18:30", "23:59"] {
            assert!(validate_start_time(good).is_ok(), "{good}");
        }
        for bad in ["9:00", "24:00", "12:60", "ab:cd", "07.00", "7pm", "", "+9:00"] {
            assert!(validate_start_time(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn update_checks_time_only_when_given() {
        assert!(UpdateClass::default().validate().is_ok());
        let update = UpdateClass {
            time: Some("6:15".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn create_class_rejects_unpadded_time() {
        let input: CreateClass = serde_json::from_str(
            r#"{"name":"Yoga","instructor":"Sarah","day":"Monday","time":"7:00","duration":60,"capacity":20}"#,
        )
        .unwrap();
        assert!(input.validate().is_err());
    }
}

//! Attendance log service.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::attendance::{Attendance, MarkAttendance};
use crate::services::member;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AttendanceFilters {
    pub member_id: Option<Uuid>,
}

/// Start of the business day containing `now`, as a UTC instant.
pub fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default();
    now.offset()
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Check-ins dated at or after the start of the business day.
pub async fn count_today(pool: &PgPool, now: DateTime<FixedOffset>) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE date >= $1")
        .bind(start_of_day(now))
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Attendance records, newest first.
pub async fn list(
    pool: &PgPool,
    filters: &AttendanceFilters,
) -> Result<Vec<Attendance>, AppError> {
    let rows = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT * FROM attendance
        WHERE ($1::uuid IS NULL OR member_id = $1)
        ORDER BY date DESC
        "#,
    )
    .bind(filters.member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Record a check-in for an existing member.
pub async fn mark(pool: &PgPool, input: &MarkAttendance) -> Result<Attendance, AppError> {
    input.validate()?;

    let member = member::require_member(pool, input.member_id).await?;
    let check_in = input.check_in.unwrap_or_else(Utc::now);

    let row = sqlx::query_as::<_, Attendance>(
        r#"
        INSERT INTO attendance (member_id, member_name, date, check_in, check_out, duration)
        VALUES ($1, $2, COALESCE($3, $4), $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(member.id)
    .bind(input.member_name.as_deref().unwrap_or(&member.name))
    .bind(input.date)
    .bind(check_in)
    .bind(input.check_out)
    .bind(input.resolved_duration(check_in))
    .fetch_one(pool)
    .await?;

    tracing::debug!(member_id = %row.member_id, "Attendance marked");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_of_day_in_utc() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 3, 15, 45, 0)
            .unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn start_of_day_respects_business_offset() {
        // 01:30 on June 4th at +05:30 is still June 3rd in UTC.
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2024, 6, 4, 1, 30, 0).unwrap();
        assert_eq!(
            start_of_day(now),
            Utc.with_ymd_and_hms(2024, 6, 3, 18, 30, 0).unwrap()
        );
    }
}

//! Gym check-ins. Like payments, `member_id` is advisory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub date: DateTime<Utc>,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    /// Minutes spent in the gym, when known.
    pub duration: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkAttendance {
    pub member_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub member_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
}

impl MarkAttendance {
    /// Explicit duration wins; otherwise derive it from check-in/check-out.
    pub fn resolved_duration(&self, check_in: DateTime<Utc>) -> Option<i32> {
        self.duration.or_else(|| {
            self.check_out
                .filter(|out| *out >= check_in)
                .and_then(|out| i32::try_from((out - check_in).num_minutes()).ok())
        })
    }
}

/// `{ "count": n }` body of the attendance-today endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceCount {
    pub count: i64,
}

//! Dashboard aggregation.
//!
//! [`compute_summary`] is a pure reduction over collections that were fetched
//! beforehand. Fetching happens in [`get_admin_dashboard`] (server side) and in
//! [`crate::client::GymClient::admin_summary`] (client side); both fan out all
//! reads at once, wait for every one of them, and hand the results over as
//! [`Fetched`] values. A read that failed becomes [`Fetched::Missing`], which
//! zeroes the counters that depend on it and leaves the rest intact.

use std::fmt::Display;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::attendance::Attendance;
use crate::models::class::GymClass;
use crate::models::pagination::Pagination;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::trainer::Trainer;
use crate::models::user::{MemberResponse, MemberStatus, MembershipType};
use crate::services::{attendance, class as class_service, member, payment};

/// Day names indexed by days since Sunday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Minutes credited for a visit with no recorded duration.
const DEFAULT_VISIT_MINUTES: i64 = 60;

/// Result of one collaborator read, normalized to a single shape.
///
/// Endpoints answer either with a list or with a bare count; both land here,
/// and so does a read that never produced anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Collection(Vec<T>),
    Count(u64),
    Missing,
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Fetched::Missing
    }
}

impl<T> Fetched<T> {
    /// Wrap a list read, degrading a failure to `Missing`.
    pub fn from_rows<E: Display>(source: &'static str, result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(rows) => Fetched::Collection(rows),
            Err(e) => {
                tracing::warn!(source, error = %e, "Dashboard read failed, using empty collection");
                Fetched::Missing
            }
        }
    }

    /// Wrap a count read, degrading a failure (or a negative count) to `Missing`.
    pub fn from_count<E: Display>(source: &'static str, result: Result<i64, E>) -> Self {
        match result {
            Ok(n) => u64::try_from(n).map(Fetched::Count).unwrap_or(Fetched::Missing),
            Err(e) => {
                tracing::warn!(source, error = %e, "Dashboard count failed, using zero");
                Fetched::Missing
            }
        }
    }

    /// Records carried by a collection; empty for counts and missing reads.
    pub fn items(&self) -> &[T] {
        match self {
            Fetched::Collection(rows) => rows,
            Fetched::Count(_) | Fetched::Missing => &[],
        }
    }

    /// Number of records, whichever shape the read came back in.
    pub fn len(&self) -> u64 {
        match self {
            Fetched::Collection(rows) => rows.len() as u64,
            Fetched::Count(n) => *n,
            Fetched::Missing => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Collection(rows) => Fetched::Collection(rows.into_iter().map(f).collect()),
            Fetched::Count(n) => Fetched::Count(n),
            Fetched::Missing => Fetched::Missing,
        }
    }
}

impl<T> From<Option<Vec<T>>> for Fetched<T> {
    fn from(rows: Option<Vec<T>>) -> Self {
        rows.map(Fetched::Collection).unwrap_or_default()
    }
}

/// The member columns the summary looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberRow {
    pub status: MemberStatus,
    pub membership_type: MembershipType,
}

impl From<&MemberResponse> for MemberRow {
    fn from(m: &MemberResponse) -> Self {
        Self {
            status: m.status,
            membership_type: m.membership_type,
        }
    }
}

/// The payment columns the summary looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentRow {
    pub amount: i64,
    pub status: PaymentStatus,
}

impl From<&Payment> for PaymentRow {
    fn from(p: &Payment) -> Self {
        Self {
            amount: p.amount,
            status: p.status,
        }
    }
}

/// Everything [`compute_summary`] reads, already fetched.
#[derive(Debug, Clone, Default)]
pub struct SummaryInputs {
    pub members: Fetched<MemberRow>,
    pub trainers: Fetched<Trainer>,
    pub payments: Fetched<PaymentRow>,
    pub classes: Fetched<GymClass>,
    pub today_attendance: Fetched<Attendance>,
}

/// Summary record shown on the administrator dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_members: u64,
    pub active_members: u64,
    pub total_trainers: u64,
    pub total_revenue: i64,
    pub pending_payments_count: u64,
    pub pending_amount: i64,
    pub today_attendance: u64,
    pub todays_classes: Vec<GymClass>,
}

/// Per-status payment totals. Every payment lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentTotals {
    pub completed_amount: i64,
    pub completed_count: u64,
    pub pending_amount: i64,
    pub pending_count: u64,
    pub failed_amount: i64,
    pub failed_count: u64,
}

impl PaymentTotals {
    pub fn tally(payments: &[PaymentRow]) -> Self {
        payments.iter().fold(Self::default(), |mut totals, p| {
            let (amount, count) = match p.status {
                PaymentStatus::Completed => {
                    (&mut totals.completed_amount, &mut totals.completed_count)
                }
                PaymentStatus::Pending => (&mut totals.pending_amount, &mut totals.pending_count),
                PaymentStatus::Failed => (&mut totals.failed_amount, &mut totals.failed_count),
            };
            *amount = amount.saturating_add(p.amount);
            *count += 1;
            totals
        })
    }
}

/// Weekday name for `now`, read as-is with no timezone conversion.
pub fn weekday_name<Tz: TimeZone>(now: &DateTime<Tz>) -> &'static str {
    WEEKDAY_NAMES[now.weekday().num_days_from_sunday() as usize]
}

/// Classes whose `day` is today's weekday name, in input order.
pub fn classes_on<Tz: TimeZone>(classes: &[GymClass], now: &DateTime<Tz>) -> Vec<GymClass> {
    let today = weekday_name(now);
    classes
        .iter()
        .filter(|c| c.day.as_str() == today)
        .cloned()
        .collect()
}

/// Reduce the fetched collections into the dashboard summary.
///
/// Pure and linear in the size of the inputs. `Missing` inputs count as empty.
pub fn compute_summary<Tz: TimeZone>(inputs: &SummaryInputs, now: &DateTime<Tz>) -> DashboardSummary {
    let active_members = inputs
        .members
        .items()
        .iter()
        .filter(|m| m.status == MemberStatus::Active)
        .count() as u64;
    let payments = PaymentTotals::tally(inputs.payments.items());

    DashboardSummary {
        total_members: inputs.members.len(),
        active_members,
        total_trainers: inputs.trainers.len(),
        total_revenue: payments.completed_amount,
        pending_payments_count: payments.pending_count,
        pending_amount: payments.pending_amount,
        today_attendance: inputs.today_attendance.len(),
        todays_classes: classes_on(inputs.classes.items(), now),
    }
}

/// Administrator dashboard payload: the summary plus the newest sign-ups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub summary: DashboardSummary,
    pub recent_members: Vec<MemberResponse>,
}

/// Fetch every dashboard source concurrently and reduce them.
///
/// Never fails: each read that errors is logged and degrades on its own.
pub async fn get_admin_dashboard(pool: &PgPool, now: DateTime<FixedOffset>) -> AdminDashboard {
    let newest = Pagination::first(5);
    let all_members = member::MemberFilters::default();
    let (members, trainers, payments, classes, today_attendance, recent) = tokio::join!(
        fetch_member_rows(pool),
        fetch_trainer_count(pool),
        fetch_payment_rows(pool),
        class_service::list(pool),
        attendance::count_today(pool, now),
        member::list(pool, &all_members, &newest),
    );

    let inputs = SummaryInputs {
        members: Fetched::from_rows("members", members),
        trainers: Fetched::from_count("trainers", trainers),
        payments: Fetched::from_rows("payments", payments),
        classes: Fetched::from_rows("classes", classes),
        today_attendance: Fetched::from_count("attendance_today", today_attendance),
    };

    let recent_members = recent.map(|page| page.items).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Recent members read failed");
        Vec::new()
    });

    AdminDashboard {
        summary: compute_summary(&inputs, &now),
        recent_members,
    }
}

async fn fetch_member_rows(pool: &PgPool) -> Result<Vec<MemberRow>, AppError> {
    let rows = sqlx::query_as::<_, MemberRow>(
        "SELECT status, membership_type FROM users WHERE role = 'member'",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn fetch_trainer_count(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trainers")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn fetch_payment_rows(pool: &PgPool) -> Result<Vec<PaymentRow>, AppError> {
    let rows = sqlx::query_as::<_, PaymentRow>("SELECT amount, status FROM payments")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// A member's own visit statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberActivity {
    pub classes_this_month: u64,
    pub total_hours: u64,
    pub days_active: u64,
}

/// Reduce one member's attendance history.
///
/// A visit counts toward this month when its date, seen in `now`'s timezone,
/// falls in the same year and month as `now`.
pub fn compute_member_activity<Tz: TimeZone>(
    records: &[Attendance],
    now: &DateTime<Tz>,
) -> MemberActivity {
    let tz = now.timezone();
    let classes_this_month = records
        .iter()
        .filter(|a| {
            let local = a.date.with_timezone(&tz);
            local.year() == now.year() && local.month() == now.month()
        })
        .count() as u64;

    let total_minutes: i64 = records
        .iter()
        .map(|a| a.duration.map(i64::from).unwrap_or(DEFAULT_VISIT_MINUTES).max(0))
        .sum();

    MemberActivity {
        classes_this_month,
        total_hours: ((total_minutes + 30) / 60) as u64,
        days_active: records.len() as u64,
    }
}

/// Member-facing dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDashboard {
    pub member: MemberResponse,
    pub todays_classes: Vec<GymClass>,
    pub activity: MemberActivity,
    pub payments: Vec<Payment>,
}

/// Fetch the signed-in member's dashboard.
///
/// The profile read must succeed; the other reads degrade to empty.
pub async fn get_member_dashboard(
    pool: &PgPool,
    member_id: Uuid,
    now: DateTime<FixedOffset>,
) -> Result<MemberDashboard, AppError> {
    let attendance_filters = attendance::AttendanceFilters {
        member_id: Some(member_id),
    };
    let payment_filters = payment::PaymentFilters {
        member_id: Some(member_id),
        ..Default::default()
    };

    let (profile, classes, visits, payments) = tokio::join!(
        member::find_by_id(pool, member_id),
        class_service::list(pool),
        attendance::list(pool, &attendance_filters),
        payment::list(pool, &payment_filters),
    );

    let member = profile?;
    let classes = Fetched::from_rows("classes", classes);
    let visits = Fetched::from_rows("attendance", visits);
    let payments = Fetched::from_rows("payments", payments);

    Ok(MemberDashboard {
        member,
        todays_classes: classes_on(classes.items(), &now),
        activity: compute_member_activity(visits.items(), &now),
        payments: match payments {
            Fetched::Collection(rows) => rows,
            _ => Vec::new(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class::Weekday;
    use crate::models::trainer::TrainerStatus;
    use chrono::{Duration, Utc};

    // 2024-06-03 is a Monday.
    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap()
    }

    fn member(status: MemberStatus) -> MemberRow {
        MemberRow {
            status,
            membership_type: MembershipType::Basic,
        }
    }

    fn pay(amount: i64, status: PaymentStatus) -> PaymentRow {
        PaymentRow { amount, status }
    }

    fn class(name: &str, day: Weekday) -> GymClass {
        GymClass {
            id: Uuid::new_v4(),
            name: name.to_string(),
            instructor: "Sarah Smith".to_string(),
            day,
            time: "07:00".to_string(),
            duration: 60,
            capacity: 20,
            enrolled: 5,
            description: None,
            is_active: true,
            created_at: monday(),
            updated_at: monday(),
        }
    }

    fn trainer(name: &str) -> Trainer {
        Trainer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@fitzone.test", name.to_lowercase()),
            phone: None,
            specialization: None,
            experience: 3,
            certification: None,
            salary: None,
            status: TrainerStatus::Active,
            join_date: monday(),
            created_at: monday(),
            updated_at: monday(),
        }
    }

    fn visit(date: DateTime<Utc>, duration: Option<i32>) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            member_id: Uuid::nil(),
            member_name: "Jane".to_string(),
            date,
            check_in: date,
            check_out: None,
            duration,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn weekday_table_starts_on_sunday() {
        let sunday = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        assert_eq!(weekday_name(&sunday), "Sunday");
        assert_eq!(weekday_name(&monday()), "Monday");
        assert_eq!(weekday_name(&(sunday + Duration::days(6))), "Saturday");
    }

    #[test]
    fn weekday_uses_supplied_offset_as_is() {
        // Monday 23:30 UTC is already Tuesday at +05:30.
        let late = Utc.with_ymd_and_hms(2024, 6, 3, 23, 30, 0).unwrap();
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(weekday_name(&late), "Monday");
        assert_eq!(weekday_name(&late.with_timezone(&ist)), "Tuesday");
    }

    #[test]
    fn active_members_counted_by_status() {
        let inputs = SummaryInputs {
            members: Fetched::Collection(vec![
                member(MemberStatus::Active),
                member(MemberStatus::Active),
                member(MemberStatus::Inactive),
            ]),
            ..Default::default()
        };
        let summary = compute_summary(&inputs, &monday());
        assert_eq!(summary.total_members, 3);
        assert_eq!(summary.active_members, 2);
    }

    #[test]
    fn payments_partitioned_by_status() {
        let inputs = SummaryInputs {
            payments: Fetched::Collection(vec![
                pay(999, PaymentStatus::Completed),
                pay(2499, PaymentStatus::Pending),
                pay(500, PaymentStatus::Failed),
            ]),
            ..Default::default()
        };
        let summary = compute_summary(&inputs, &monday());
        assert_eq!(summary.total_revenue, 999);
        assert_eq!(summary.pending_amount, 2499);
        assert_eq!(summary.pending_payments_count, 1);
    }

    #[test]
    fn revenue_ignores_payment_order() {
        let mut payments = vec![
            pay(100, PaymentStatus::Completed),
            pay(250, PaymentStatus::Pending),
            pay(40, PaymentStatus::Completed),
            pay(75, PaymentStatus::Failed),
            pay(5, PaymentStatus::Completed),
        ];
        let forward = PaymentTotals::tally(&payments);
        payments.reverse();
        payments.swap(0, 3);
        assert_eq!(PaymentTotals::tally(&payments), forward);
        assert_eq!(forward.completed_amount, 145);
    }

    #[test]
    fn partition_counts_every_payment_once() {
        let payments = vec![
            pay(10, PaymentStatus::Completed),
            pay(20, PaymentStatus::Pending),
            pay(30, PaymentStatus::Failed),
            pay(40, PaymentStatus::Pending),
        ];
        let totals = PaymentTotals::tally(&payments);
        assert_eq!(
            totals.completed_count + totals.pending_count + totals.failed_count,
            payments.len() as u64
        );
        assert_eq!(
            totals.completed_amount + totals.pending_amount + totals.failed_amount,
            payments.iter().map(|p| p.amount).sum::<i64>()
        );
    }

    #[test]
    fn only_todays_classes_kept() {
        let inputs = SummaryInputs {
            classes: Fetched::Collection(vec![
                class("Morning Yoga", Weekday::Monday),
                class("HIIT", Weekday::Tuesday),
            ]),
            ..Default::default()
        };
        let summary = compute_summary(&inputs, &monday());
        assert_eq!(summary.todays_classes.len(), 1);
        assert_eq!(summary.todays_classes[0].name, "Morning Yoga");
        assert_eq!(summary.todays_classes[0].day, Weekday::Monday);
    }

    #[test]
    fn empty_collections_give_zero_counters() {
        let inputs = SummaryInputs {
            members: Fetched::Collection(vec![]),
            payments: Fetched::Collection(vec![]),
            ..Default::default()
        };
        let summary = compute_summary(&inputs, &monday());
        assert_eq!(summary.total_members, 0);
        assert_eq!(summary.active_members, 0);
        assert_eq!(summary.total_revenue, 0);
        assert_eq!(summary.pending_amount, 0);
        assert_eq!(summary.pending_payments_count, 0);
    }

    #[test]
    fn missing_inputs_degrade_without_touching_others() {
        let inputs = SummaryInputs {
            members: Fetched::Missing,
            trainers: Fetched::Count(4),
            payments: Fetched::Collection(vec![pay(999, PaymentStatus::Completed)]),
            classes: Fetched::Missing,
            today_attendance: Fetched::Count(12),
        };
        let summary = compute_summary(&inputs, &monday());
        assert_eq!(summary.total_members, 0);
        assert_eq!(summary.active_members, 0);
        assert!(summary.todays_classes.is_empty());
        assert_eq!(summary.total_trainers, 4);
        assert_eq!(summary.total_revenue, 999);
        assert_eq!(summary.today_attendance, 12);
    }

    #[test]
    fn counts_and_collections_both_pass_through() {
        let as_list = SummaryInputs {
            trainers: Fetched::Collection(vec![trainer("John"), trainer("Sarah")]),
            today_attendance: Fetched::Collection(vec![visit(monday(), Some(45))]),
            ..Default::default()
        };
        let summary = compute_summary(&as_list, &monday());
        assert_eq!(summary.total_trainers, 2);
        assert_eq!(summary.today_attendance, 1);
    }

    #[test]
    fn summary_is_idempotent_and_leaves_inputs_alone() {
        let inputs = SummaryInputs {
            members: Fetched::Collection(vec![member(MemberStatus::Active)]),
            trainers: Fetched::Count(3),
            payments: Fetched::Collection(vec![
                pay(999, PaymentStatus::Completed),
                pay(2499, PaymentStatus::Pending),
            ]),
            classes: Fetched::Collection(vec![class("Spin", Weekday::Monday)]),
            today_attendance: Fetched::Count(7),
        };
        let snapshot = inputs.clone();
        let first = compute_summary(&inputs, &monday());
        let second = compute_summary(&inputs, &monday());
        assert_eq!(first, second);
        assert_eq!(inputs.classes, snapshot.classes);
        assert_eq!(inputs.payments, snapshot.payments);
        assert_eq!(inputs.members, snapshot.members);
    }

    #[test]
    fn failed_reads_become_missing() {
        let rows: Fetched<PaymentRow> = Fetched::from_rows("payments", Err("connection reset"));
        assert_eq!(rows, Fetched::Missing);
        let count: Fetched<Attendance> = Fetched::from_count("attendance_today", Err("timeout"));
        assert!(count.is_empty());
        let negative: Fetched<Trainer> = Fetched::from_count::<&str>("trainers", Ok(-1));
        assert_eq!(negative.len(), 0);
        let absent: Fetched<GymClass> = None.into();
        assert!(absent.items().is_empty());
    }

    #[test]
    fn member_activity_counts_this_month_only() {
        let now = monday();
        let records = vec![
            visit(now - Duration::days(1), Some(90)),
            visit(now - Duration::days(2), None),
            // Same month a year earlier does not count toward this month.
            visit(Utc.with_ymd_and_hms(2023, 6, 10, 8, 0, 0).unwrap(), Some(30)),
            visit(Utc.with_ymd_and_hms(2024, 5, 31, 8, 0, 0).unwrap(), Some(60)),
        ];
        let activity = compute_member_activity(&records, &now);
        assert_eq!(activity.classes_this_month, 2);
        assert_eq!(activity.days_active, 4);
        // 90 + 60 (default) + 30 + 60 = 240 minutes.
        assert_eq!(activity.total_hours, 4);
    }

    #[test]
    fn member_activity_rounds_half_hours_up() {
        let records = vec![visit(monday(), Some(90))];
        assert_eq!(compute_member_activity(&records, &monday()).total_hours, 2);
        let records = vec![visit(monday(), Some(80))];
        assert_eq!(compute_member_activity(&records, &monday()).total_hours, 1);
    }

    #[test]
    fn member_activity_of_nobody_is_zero() {
        assert_eq!(
            compute_member_activity(&[], &monday()),
            MemberActivity::default()
        );
    }
}

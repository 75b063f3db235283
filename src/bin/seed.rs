//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Each section is skipped when its table
//! already has rows, so the script can be re-run safely.

use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use gymdesk::services::auth::hash_password;
use gymdesk::services::payment::transaction_reference;
use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_EMAIL: &str = "admin@gym.com";
const ADMIN_PASSWORD: &str = "admin123";
const MEMBER_PASSWORD: &str = "Member@123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = gymdesk::db::create_pool(&db_url, 5).await?;
    gymdesk::db::run_migrations(&pool).await?;

    println!("=== gymdesk seed ===");

    let admin_id = seed_admin(&pool).await?;
    seed_plans(&pool).await?;
    seed_trainers(&pool).await?;
    seed_classes(&pool).await?;
    let members = seed_members(&pool).await?;
    seed_payments(&pool, &members).await?;
    seed_attendance(&pool, &members).await?;
    seed_announcements(&pool, admin_id).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");
    println!("Member login: any seeded member / {MEMBER_PASSWORD}");

    Ok(())
}

async fn table_is_empty(pool: &PgPool, table: &str) -> anyhow::Result<bool> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

async fn seed_admin(pool: &PgPool) -> anyhow::Result<Uuid> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(ADMIN_EMAIL)
        .fetch_optional(pool)
        .await?;
    if let Some(id) = existing {
        println!("[skip] Admin already exists");
        return Ok(id);
    }

    let hash = hash_password(ADMIN_PASSWORD)?;
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role, membership_type)
         VALUES ('Admin', $1, $2, 'administrator', 'VIP') RETURNING id",
    )
    .bind(ADMIN_EMAIL)
    .bind(&hash)
    .fetch_one(pool)
    .await?;

    println!("[done] Created admin user");
    Ok(id)
}

async fn seed_plans(pool: &PgPool) -> anyhow::Result<()> {
    if !table_is_empty(pool, "plans").await? {
        println!("[skip] Plans already present");
        return Ok(());
    }

    let plans: [(&str, i64, &str, &[&str], &str); 3] = [
        (
            "Basic",
            999,
            "1 Month",
            &["Access to gym", "Basic equipment", "Locker facility"],
            "Perfect for beginners",
        ),
        (
            "Premium",
            2499,
            "3 Months",
            &["Access to gym", "All equipment", "Personal trainer", "Diet plan", "Locker facility"],
            "Best value for money",
        ),
        (
            "VIP",
            4999,
            "6 Months",
            &["24/7 gym access", "All equipment", "Personal trainer", "Diet plan", "Spa access"],
            "Ultimate fitness package",
        ),
    ];

    for (name, price, duration, features, description) in plans {
        sqlx::query(
            "INSERT INTO plans (name, price, duration, features, description)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(name)
        .bind(price)
        .bind(duration)
        .bind(serde_json::json!(features))
        .bind(description)
        .execute(pool)
        .await?;
    }

    println!("[done] Added {} plans", plans.len());
    Ok(())
}

async fn seed_trainers(pool: &PgPool) -> anyhow::Result<()> {
    if !table_is_empty(pool, "trainers").await? {
        println!("[skip] Trainers already present");
        return Ok(());
    }

    let trainers = [
        ("John Doe", "john@fitzone.com", "9876543210", "Strength Training", 5, "ACE Certified", 30000),
        ("Sarah Smith", "sarah@fitzone.com", "9876543211", "Yoga & Flexibility", 3, "RYT 500", 25000),
        ("Mike Ross", "mike@fitzone.com", "9876543212", "Cardio & HIIT", 4, "NASM Certified", 28000),
    ];

    for (name, email, phone, specialization, experience, certification, salary) in trainers {
        sqlx::query(
            "INSERT INTO trainers (name, email, phone, specialization, experience, certification, salary)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(specialization)
        .bind(experience as i32)
        .bind(certification)
        .bind(salary as i64)
        .execute(pool)
        .await?;
    }

    println!("[done] Added {} trainers", trainers.len());
    Ok(())
}

async fn seed_classes(pool: &PgPool) -> anyhow::Result<()> {
    if !table_is_empty(pool, "classes").await? {
        println!("[skip] Classes already present");
        return Ok(());
    }

    let classes = [
        ("Morning Yoga", "Sarah Smith", "Monday", "06:00", 60, 15, 12, "Start your day with peace and flexibility"),
        ("Strength Training", "John Doe", "Monday", "10:00", 45, 10, 8, "Build muscle and strength"),
        ("Cardio Blast", "Mike Ross", "Monday", "17:00", 30, 20, 15, "High-intensity cardio workout"),
        ("Evening Yoga", "Sarah Smith", "Tuesday", "18:00", 60, 15, 10, "Relax and unwind"),
        ("HIIT Circuit", "Mike Ross", "Wednesday", "07:00", 45, 12, 9, "Intervals for endurance"),
        ("Powerlifting Basics", "John Doe", "Friday", "18:30", 60, 8, 6, "Squat, bench and deadlift technique"),
        ("Weekend Stretch", "Sarah Smith", "Saturday", "09:00", 45, 20, 7, "Mobility and recovery"),
    ];

    for (name, instructor, day, time, duration, capacity, enrolled, description) in classes {
        sqlx::query(
            "INSERT INTO classes (name, instructor, day, time, duration, capacity, enrolled, description)
             VALUES ($1, $2, $3::weekday, $4, $5, $6, $7, $8)",
        )
        .bind(name)
        .bind(instructor)
        .bind(day)
        .bind(time)
        .bind(duration as i32)
        .bind(capacity as i32)
        .bind(enrolled as i32)
        .bind(description)
        .execute(pool)
        .await?;
    }

    println!("[done] Added {} classes", classes.len());
    Ok(())
}

/// Sample members as `(id, name, email)`.
async fn seed_members(pool: &PgPool) -> anyhow::Result<Vec<(Uuid, String, String)>> {
    let samples = [
        ("Priya Sharma", "priya@example.com", "Premium", "Active"),
        ("Rahul Verma", "rahul@example.com", "Basic", "Active"),
        ("Anita Desai", "anita@example.com", "VIP", "Active"),
        ("Karan Mehta", "karan@example.com", "Basic", "Inactive"),
    ];

    let hash = hash_password(MEMBER_PASSWORD)?;
    let mut created = 0;
    for (name, email, membership_type, status) in samples {
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, role, membership_type, status)
             VALUES ($1, $2, $3, 'member', $4::membership_type, $5::member_status)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(name)
        .bind(email)
        .bind(&hash)
        .bind(membership_type)
        .bind(status)
        .execute(pool)
        .await?;
        created += result.rows_affected();
    }
    println!("[done] Added {created} members");

    let members: Vec<(Uuid, String, String)> = sqlx::query_as(
        "SELECT id, name, email FROM users WHERE role = 'member' ORDER BY created_at LIMIT 3",
    )
    .fetch_all(pool)
    .await?;
    Ok(members)
}

async fn seed_payments(pool: &PgPool, members: &[(Uuid, String, String)]) -> anyhow::Result<()> {
    if members.is_empty() || !table_is_empty(pool, "payments").await? {
        println!("[skip] Payments");
        return Ok(());
    }

    let now = Utc::now();
    let schedule: [(&str, i64, &str, &str, _); 3] = [
        ("Basic", 999, "UPI", "completed", Utc.with_ymd_and_hms(2024, 11, 1, 10, 0, 0)),
        ("Premium", 2499, "Card", "completed", Utc.with_ymd_and_hms(2024, 11, 5, 10, 0, 0)),
        ("VIP", 4999, "Cash", "pending", chrono::LocalResult::Single(now)),
    ];

    for (i, (plan, amount, method, status, date)) in schedule.into_iter().enumerate() {
        let (member_id, name, email) = &members[i % members.len()];
        let date = date.single().unwrap_or(now);
        sqlx::query(
            "INSERT INTO payments (member_id, member_name, email, plan, amount, method, status,
                transaction_id, date)
             VALUES ($1, $2, $3, $4, $5, $6::payment_method, $7::payment_status, $8, $9)",
        )
        .bind(member_id)
        .bind(name)
        .bind(email)
        .bind(plan)
        .bind(amount)
        .bind(method)
        .bind(status)
        .bind(transaction_reference(*member_id, plan, amount, date))
        .bind(date)
        .execute(pool)
        .await?;
    }

    println!("[done] Added {} payments", schedule.len());
    Ok(())
}

async fn seed_attendance(pool: &PgPool, members: &[(Uuid, String, String)]) -> anyhow::Result<()> {
    if members.is_empty() || !table_is_empty(pool, "attendance").await? {
        println!("[skip] Attendance");
        return Ok(());
    }

    let now = Utc::now();
    let visits = [(0usize, 0i64, Some(90)), (1, 0, Some(60)), (0, 2, None), (2, 1, Some(45))];

    for (member_index, days_ago, duration) in visits {
        let (member_id, name, _) = &members[member_index % members.len()];
        let check_in = now - Duration::days(days_ago);
        sqlx::query(
            "INSERT INTO attendance (member_id, member_name, date, check_in, duration)
             VALUES ($1, $2, $3, $3, $4)",
        )
        .bind(member_id)
        .bind(name)
        .bind(check_in)
        .bind(duration)
        .execute(pool)
        .await?;
    }

    println!("[done] Added {} attendance records", visits.len());
    Ok(())
}

async fn seed_announcements(pool: &PgPool, admin_id: Uuid) -> anyhow::Result<()> {
    if !table_is_empty(pool, "announcements").await? {
        println!("[skip] Announcements already present");
        return Ok(());
    }

    let announcements = [
        (
            "Gym Maintenance Notice",
            "The gym will be closed for maintenance on Sunday. We apologize for the inconvenience.",
            "important",
            "maintenance",
        ),
        (
            "New Year Special Offer",
            "Get 20% off on all annual memberships! Offer valid till December 31st.",
            "urgent",
            "event",
        ),
        (
            "New Yoga Batch",
            "An evening yoga batch starts next Tuesday at 18:00.",
            "normal",
            "schedule",
        ),
    ];

    for (title, message, priority, category) in announcements {
        sqlx::query(
            "INSERT INTO announcements (title, message, priority, category, created_by)
             VALUES ($1, $2, $3::announcement_priority, $4::announcement_category, $5)",
        )
        .bind(title)
        .bind(message)
        .bind(priority)
        .bind(category)
        .bind(admin_id)
        .execute(pool)
        .await?;
    }

    println!("[done] Added {} announcements", announcements.len());
    Ok(())
}

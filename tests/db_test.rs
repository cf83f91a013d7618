//! Database-level tests for migrations and the user queries behind sign-in.

use cashflow::db::queries::users::{self, GoogleProfile};
use cashflow::db::queries::{self, goals, incomes};
use cashflow::db::{create_in_memory_pool, migrations, DbPool};
use cashflow::models::{Frequency, Goal, Income, IncomeCategory, IncomeType};
use chrono::NaiveDate;
use std::path::Path;

fn pool() -> DbPool {
    let pool = create_in_memory_pool().unwrap();
    let conn = pool.get().unwrap();
    migrations::run_migrations(&conn, Path::new("migrations")).unwrap();
    drop(conn);
    pool
}

fn profile(email: Option<&str>) -> GoogleProfile {
    GoogleProfile {
        google_id: "google-123".into(),
        email: email.map(str::to_string),
        name: Some("Alice Example".into()),
        picture: Some("https://example.com/a.png".into()),
    }
}

#[test]
fn test_migrations_are_idempotent() {
    let pool = pool();
    let conn = pool.get().unwrap();
    migrations::run_migrations(&conn, Path::new("migrations")).unwrap();

    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, 1);
}

#[test]
fn test_google_user_is_created_once() {
    let pool = pool();
    let conn = pool.get().unwrap();

    let first = users::upsert_google_user(&conn, &profile(Some("alice@example.com"))).unwrap();
    assert_eq!(first.username, "alice@example.com");
    assert_eq!(first.google_id.as_deref(), Some("google-123"));
    assert_eq!(first.google_name.as_deref(), Some("Alice Example"));

    let mut renamed = profile(Some("alice@example.com"));
    renamed.name = Some("Alice E.".into());
    let second = users::upsert_google_user(&conn, &renamed).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.google_name.as_deref(), Some("Alice E."));

    // Google accounts have no password to log in with.
    assert_eq!(users::password_hash(&conn, "alice@example.com").unwrap(), None);
}

#[test]
fn test_google_user_never_takes_over_password_account() {
    let pool = pool();
    let conn = pool.get().unwrap();
    let squatter = users::create_user(&conn, "alice@example.com", None, "$argon2id$hash").unwrap();

    let user = users::upsert_google_user(&conn, &profile(Some("alice@example.com"))).unwrap();
    assert_ne!(user.id, squatter);
    assert_eq!(user.username, "google_google-123");
    assert_eq!(user.email.as_deref(), Some("alice@example.com"));

    let untouched = users::find_by_username(&conn, "alice@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(untouched.id, squatter);
    assert_eq!(untouched.google_id, None);
}

#[test]
fn test_second_google_account_with_same_email() {
    let pool = pool();
    let conn = pool.get().unwrap();

    let first = users::upsert_google_user(&conn, &profile(Some("shared@example.com"))).unwrap();
    let mut other = profile(Some("shared@example.com"));
    other.google_id = "google-456".into();
    let second = users::upsert_google_user(&conn, &other).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.username, "shared@example.com");
    assert_eq!(second.username, "google_google-456");
}

#[test]
fn test_google_fallback_name_taken_is_a_constraint_error() {
    let pool = pool();
    let conn = pool.get().unwrap();
    users::create_user(&conn, "alice@example.com", None, "$argon2id$hash").unwrap();
    users::create_user(&conn, "google_google-123", None, "$argon2id$hash").unwrap();

    let err = users::upsert_google_user(&conn, &profile(Some("alice@example.com"))).unwrap_err();
    assert!(queries::is_constraint_violation(&err));
}

#[test]
fn test_google_user_without_email() {
    let pool = pool();
    let conn = pool.get().unwrap();

    let user = users::upsert_google_user(&conn, &profile(None)).unwrap();
    assert_eq!(user.username, "google_google-123");
    assert_eq!(user.email, None);
}

#[test]
fn test_deleting_user_removes_records() {
    let pool = pool();
    let conn = pool.get().unwrap();
    let user_id = users::create_user(&conn, "bob", None, "$argon2id$hash").unwrap();

    let income = Income {
        id: "i1".into(),
        source: "Shop".into(),
        category: IncomeCategory::Business,
        amount: 900.0,
        income_type: IncomeType::Active,
        frequency: Frequency::BiWeekly,
        notes: None,
        user_id: Some(user_id),
    };
    incomes::create_income(&conn, user_id, &income).unwrap();

    let goal = Goal {
        id: "g1".into(),
        description: "House deposit".into(),
        target_amount: 40_000.0,
        current_amount: 10_000.0,
        target_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        user_id: Some(user_id),
    };
    goals::create_goal(&conn, user_id, &goal).unwrap();
    assert_eq!(goals::get_goal(&conn, user_id, "g1").unwrap(), Some(goal));
    assert_eq!(incomes::list_incomes(&conn, user_id).unwrap(), vec![income]);

    conn.execute("DELETE FROM users WHERE id = ?", [user_id]).unwrap();
    assert!(incomes::list_incomes(&conn, user_id).unwrap().is_empty());
    assert!(goals::list_goals(&conn, user_id).unwrap().is_empty());
}

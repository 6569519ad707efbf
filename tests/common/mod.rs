#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tempfile::TempDir;
use vitalcoach::core::auth;
use vitalcoach::db::Database;
use vitalcoach::models::health::{HealthRecord, Vitals};
use vitalcoach::models::user::{Registration, User};

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

/// Register a user with a valid password.
pub fn add_user(db: &Database, email: &str) -> User {
    let reg = Registration {
        email: email.to_string(),
        name: "Anna Beispiel".to_string(),
        password: "geheim123".to_string(),
    };
    auth::register(db, &reg).unwrap()
}

/// Noon UTC on `date`.
pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    let dt = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    Utc.from_utc_datetime(&dt)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A record for `user_id` at noon of `date`.
pub fn make_record(user_id: &str, vitals: Vitals, date: NaiveDate) -> HealthRecord {
    let mut r = HealthRecord::new(user_id, vitals);
    r.recorded_at = noon(date);
    r
}

/// Insert one record per day, starting at `start`, with `f(value)` as vitals.
pub fn insert_series(
    db: &Database,
    user_id: &str,
    start: NaiveDate,
    values: &[f64],
    f: impl Fn(f64) -> Vitals,
) {
    for (i, v) in values.iter().enumerate() {
        let date = start + chrono::Duration::days(i as i64);
        db.insert_record(&make_record(user_id, f(*v), date)).unwrap();
    }
}

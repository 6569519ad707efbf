mod common;

use chrono::{Duration, Utc};
use vitalcoach::core::auth::{self, RegisterError};
use vitalcoach::models::user::Registration;

#[test]
fn test_password_hash_roundtrip() {
    let phc = auth::hash_password("geheim123").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(auth::verify_password("geheim123", &phc));
    assert!(!auth::verify_password("falsch", &phc));
    assert!(!auth::verify_password("geheim123", "not-a-hash"));
}

#[test]
fn test_register_normalizes_and_rejects_duplicates() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "Anna@Example.DE");
    assert_eq!(user.email, "anna@example.de");
    assert_ne!(user.password_hash, "geheim123");

    let again = Registration {
        email: "anna@example.de".to_string(),
        name: "Anna".to_string(),
        password: "anderes123".to_string(),
    };
    assert!(matches!(
        auth::register(&db, &again),
        Err(RegisterError::Duplicate)
    ));
}

#[test]
fn test_insert_registered_uses_given_hash() {
    let (_dir, db) = common::setup_db();
    let reg = Registration {
        email: "Ben@Example.de".to_string(),
        name: "Ben".to_string(),
        password: "geheim123".to_string(),
    };
    let phc = auth::hash_password(&reg.password).unwrap();
    let user = auth::insert_registered(&db, &reg, phc.clone()).unwrap();
    assert_eq!(user.password_hash, phc);

    let stored = db.get_user_by_email("ben@example.de").unwrap().unwrap();
    assert_eq!(stored.id, user.id);
    assert!(auth::verify_password("geheim123", &stored.password_hash));
    assert!(!auth::verify_password("falsch12", &stored.password_hash));

    assert!(matches!(
        auth::insert_registered(&db, &reg, phc),
        Err(RegisterError::Duplicate)
    ));
}

#[test]
fn test_session_expires() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let now = Utc::now();
    let session = auth::start_session(&db, &user.id, 24, now).unwrap();

    let u = auth::user_for_token(&db, &session.token, now + Duration::hours(23)).unwrap();
    assert_eq!(u.unwrap().id, user.id);
    let expired = auth::user_for_token(&db, &session.token, now + Duration::hours(25)).unwrap();
    assert!(expired.is_none());
    assert!(auth::user_for_token(&db, "unbekannt", now).unwrap().is_none());

    assert_eq!(db.purge_expired_sessions(now + Duration::hours(25)).unwrap(), 1);
}

#[test]
fn test_logout_invalidates_token() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let now = Utc::now();
    let session = auth::start_session(&db, &user.id, 24, now).unwrap();
    assert!(db.delete_session(&session.token).unwrap());
    assert!(auth::user_for_token(&db, &session.token, now).unwrap().is_none());
}

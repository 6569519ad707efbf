use anyhow::{Result, anyhow};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use password_hash::rand_core::OsRng;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::core::validation::{self, ValidationError};
use crate::db::Database;
use crate::models::user::{Registration, Session, User};

/// Argon2id PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("email already registered")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub fn register(db: &Database, reg: &Registration) -> Result<User, RegisterError> {
    validation::validate_registration(reg)?;
    let password_hash = hash_password(&reg.password)?;
    insert_registered(db, reg, password_hash)
}

/// Store a registration whose password has already been hashed.
///
/// Callers validate `reg` first. Hashing is slow, so the HTTP handlers do it
/// without holding the database lock and only call this for the insert.
pub fn insert_registered(
    db: &Database,
    reg: &Registration,
    password_hash: String,
) -> Result<User, RegisterError> {
    if db.get_user_by_email(&reg.email)?.is_some() {
        return Err(RegisterError::Duplicate);
    }
    let user = User::new(&reg.email, &reg.name, password_hash);
    db.insert_user(&user)?;
    Ok(user)
}

pub fn start_session(
    db: &Database,
    user_id: &str,
    ttl_hours: i64,
    now: DateTime<Utc>,
) -> Result<Session> {
    let session = Session {
        token: Uuid::new_v4().simple().to_string(),
        user_id: user_id.to_string(),
        expires_at: now + Duration::hours(ttl_hours),
    };
    db.insert_session(&session)?;
    Ok(session)
}

/// Resolve a bearer token to its user while the session is valid.
pub fn user_for_token(db: &Database, token: &str, now: DateTime<Utc>) -> Result<Option<User>> {
    match db.get_session(token, now)? {
        Some(session) => db.get_user(&session.user_id),
        None => Ok(None),
    }
}

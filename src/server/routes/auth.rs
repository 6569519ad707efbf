use anyhow::anyhow;
use axum::body::Bytes;
use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{Reply, created, ok, to_value};
use crate::core::auth::{self, RegisterError};
use crate::core::validation;
use crate::db;
use crate::models::user::{Credentials, Registration, Session, User};
use crate::server::extract::ApiJson;
use crate::server::{ApiError, AppState, AuthUser};

fn session_body(user: &User, session: &Session) -> Result<serde_json::Value, ApiError> {
    Ok(json!({
        "token": session.token,
        "expires_at": session.expires_at,
        "user": to_value(user)?,
    }))
}

/// Argon2 work runs on the blocking pool, never under the database lock.
async fn hash_off_thread(password: String) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| anyhow!("password hashing task failed: {}", e))??;
    Ok(hash)
}

async fn verify_off_thread(password: String, phc: String) -> Result<bool, ApiError> {
    let valid = tokio::task::spawn_blocking(move || auth::verify_password(&password, &phc))
        .await
        .map_err(|e| anyhow!("password verification task failed: {}", e))?;
    Ok(valid)
}

fn open_session(state: &AppState, user: &User) -> Result<Session, ApiError> {
    let db = db::lock(&state.db)?;
    let ttl = state.config.auth.session_ttl_hours;
    Ok(auth::start_session(&db, &user.id, ttl, Utc::now())?)
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(reg): ApiJson<Registration>,
) -> Result<Reply, ApiError> {
    validation::validate_registration(&reg)?;
    let password_hash = hash_off_thread(reg.password.clone()).await?;
    let user = {
        let db = db::lock(&state.db)?;
        auth::insert_registered(&db, &reg, password_hash)?
    };
    let session = open_session(&state, &user)?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(created("register", session_body(&user, &session)?))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(creds): ApiJson<Credentials>,
) -> Result<Reply, ApiError> {
    let found = db::lock(&state.db)?.get_user_by_email(&creds.email)?;
    let verified = match found {
        Some(user) => {
            let phc = user.password_hash.clone();
            verify_off_thread(creds.password, phc).await?.then_some(user)
        }
        None => None,
    };
    let Some(user) = verified else {
        tracing::info!("failed login attempt");
        return Err(ApiError::InvalidCredentials);
    };
    let session = open_session(&state, &user)?;
    Ok(ok("login", session_body(&user, &session)?))
}

#[derive(Debug, Deserialize)]
pub struct TestLogin {
    #[serde(default = "default_test_email")]
    email: String,
    #[serde(default)]
    name: Option<String>,
}

fn default_test_email() -> String {
    "test@example.com".to_string()
}

/// Passwordless login for local development. The user is created on first use.
pub async fn test_login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    if !state.config.auth.allow_test_login {
        return Err(ApiError::not_found("route"));
    }
    let req: TestLogin = if body.iter().all(u8::is_ascii_whitespace) {
        TestLogin {
            email: default_test_email(),
            name: None,
        }
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let existing = db::lock(&state.db)?.get_user_by_email(&req.email)?;
    let user = match existing {
        Some(user) => user,
        None => {
            let reg = Registration {
                email: req.email.clone(),
                name: req.name.clone().unwrap_or_else(|| "Testnutzer".to_string()),
                password: uuid::Uuid::new_v4().to_string(),
            };
            validation::validate_registration(&reg)?;
            let password_hash = hash_off_thread(reg.password.clone()).await?;
            let db = db::lock(&state.db)?;
            match auth::insert_registered(&db, &reg, password_hash) {
                Ok(user) => user,
                // created by a concurrent test login in the meantime
                Err(RegisterError::Duplicate) => db
                    .get_user_by_email(&reg.email)?
                    .ok_or_else(|| ApiError::not_found("user"))?,
                Err(e) => return Err(e.into()),
            }
        }
    };
    let session = open_session(&state, &user)?;
    tracing::warn!(user_id = %user.id, "test login used");
    Ok(ok("test-login", session_body(&user, &session)?))
}

pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<Reply, ApiError> {
    db::lock(&state.db)?.delete_session(&auth.token)?;
    Ok(ok("logout", json!({ "logged_out": true })))
}

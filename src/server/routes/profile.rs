use axum::extract::State;
use serde_json::json;

use super::{Reply, ok, to_value};
use crate::core::alerts::Thresholds;
use crate::core::profile;
use crate::db::{self, RecordQuery};
use crate::models::user::{ProfileUpdate, User};
use crate::server::extract::ApiJson;
use crate::server::{ApiError, AppState, AuthUser};

fn profile_body(db: &db::Database, user: &User) -> Result<serde_json::Value, ApiError> {
    let latest = db.query_records(
        &user.id,
        &RecordQuery {
            limit: Some(30),
            ..Default::default()
        },
    )?;
    let weight = latest.iter().rev().find_map(|r| r.vitals.weight);
    let bmi = profile::bmi(user.height_cm, weight);
    Ok(json!({
        "user": to_value(user)?,
        "thresholds": to_value(&Thresholds::for_user(user))?,
        "bmi": bmi,
        "bmi_category": bmi.map(profile::bmi_category),
    }))
}

pub async fn show(State(state): State<AppState>, auth: AuthUser) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    Ok(ok("profile", profile_body(&db, &auth.user)?))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(changes): ApiJson<ProfileUpdate>,
) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    let user = profile::update(&db, auth.user, changes)?;
    Ok(ok("profile", profile_body(&db, &user)?))
}

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::{Reply, ok, to_value};
use crate::core::alerts;
use crate::db;
use crate::models::alert::{Alert, AlertRecord};
use crate::server::extract::{ApiPath, ApiQuery};
use crate::server::{ApiError, AppState, AuthUser};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    unacknowledged: bool,
    limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateParams {
    #[serde(default)]
    explain: bool,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    let history = db.list_alerts(&auth.user.id, params.unacknowledged, params.limit)?;
    Ok(ok("alerts", json!({ "alerts": to_value(&history)? })))
}

/// Evaluate rule alerts. With `explain=true` the language model adds a
/// plain-language explanation. A failing model call or an exhausted rate
/// limit leaves it `null`; the rule alerts are returned either way.
pub async fn generate(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<GenerateParams>,
) -> Result<Reply, ApiError> {
    let report = {
        let db = db::lock(&state.db)?;
        alerts::generate(&db, &auth.user, Utc::now())?
    };
    tracing::info!(user_id = %auth.user.id, count = report.alerts.len(), "alerts generated");

    let mut explanation = None;
    if params.explain && !report.alerts.is_empty() {
        explanation = explain(&state, &auth, &report.alerts).await;
    }

    let mut data = to_value(&report)?;
    data["explanation"] = json!(explanation);
    Ok(ok("alerts", data))
}

async fn explain(state: &AppState, auth: &AuthUser, hits: &[AlertRecord]) -> Option<String> {
    if let Err(e) = state.enforce_limit(&auth.user.id, "alerts/explain") {
        tracing::warn!(error = %e, "alert explanation skipped");
        return None;
    }
    let hits: Vec<Alert> = hits
        .iter()
        .map(|a| Alert {
            alert_type: a.alert_type.clone(),
            severity: a.severity,
            message: a.message.clone(),
        })
        .collect();
    match state.coach.explain_alerts(&auth.user.id, &hits).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "alert explanation unavailable");
            None
        }
    }
}

pub async fn acknowledge(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    if !db.acknowledge_alert(&auth.user.id, &id)? {
        return Err(ApiError::not_found("alert"));
    }
    Ok(ok("alerts", json!({ "acknowledged": id })))
}

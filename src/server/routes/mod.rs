pub mod ai;
pub mod alerts;
pub mod auth;
pub mod health;
pub mod insights;
pub mod profile;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::output;

type Reply = (StatusCode, Json<Value>);

fn ok(command: &str, data: Value) -> Reply {
    (StatusCode::OK, Json(output::success(command, data)))
}

fn created(command: &str, data: Value) -> Reply {
    (StatusCode::CREATED, Json(output::success(command, data)))
}

fn to_value<T: serde::Serialize>(data: &T) -> Result<Value, super::ApiError> {
    serde_json::to_value(data).map_err(|e| super::ApiError::Internal(e.into()))
}

pub async fn healthz() -> Reply {
    ok("healthz", json!({ "alive": true }))
}

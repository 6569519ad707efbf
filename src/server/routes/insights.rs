use axum::extract::State;
use serde_json::json;

use super::{Reply, ok, to_value};
use crate::core::trend;
use crate::db;
use crate::server::{ApiError, AppState, AuthUser};

pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    let insights = trend::compute_insights(&db, &auth.user.id)?;
    Ok(ok(
        "insights",
        json!({ "window": trend::WINDOW, "insights": to_value(&insights)? }),
    ))
}

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use super::{Reply, ok, to_value};
use crate::ai::service::ImageRequest;
use crate::core::cache;
use crate::db;
use crate::server::extract::{ApiJson, ApiQuery};
use crate::server::{ApiError, AppState, AuthUser};

#[derive(Debug, Default, Deserialize)]
pub struct PlanParams {
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct CoachRequest {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

pub async fn plan(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<PlanParams>,
) -> Result<Reply, ApiError> {
    state.enforce_limit(&auth.user.id, "ai/plan")?;
    let plan = state.coach.plan(&auth.user.id, params.refresh).await?;
    Ok(ok("plan", to_value(&plan)?))
}

pub async fn coach(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CoachRequest>,
) -> Result<Reply, ApiError> {
    state.enforce_limit(&auth.user.id, "ai/coach")?;
    let reply = state.coach.coach(&auth.user.id, &req.message).await?;
    Ok(ok("coach", to_value(&reply)?))
}

pub async fn analyze_image(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ImageRequest>,
) -> Result<Reply, ApiError> {
    state.enforce_limit(&auth.user.id, "ai/analyze-image")?;
    let analysis = state.coach.analyze_image(&req).await?;
    Ok(ok("analyze-image", to_value(&analysis)?))
}

pub async fn clear_cache(State(state): State<AppState>, auth: AuthUser) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    let removed = cache::clear(&db, &auth.user.id)?;
    Ok(ok("cache", json!({ "removed": removed })))
}

pub async fn refresh_embedding(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Reply, ApiError> {
    state.enforce_limit(&auth.user.id, "embeddings/refresh")?;
    let status = state.coach.refresh_embedding(&auth.user.id).await?;
    Ok(ok("embeddings", to_value(&status)?))
}

pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Reply, ApiError> {
    state.enforce_limit(&auth.user.id, "search")?;
    let hits = state.coach.search(&auth.user.id, &params.q, params.limit).await?;
    Ok(ok("search", json!({ "results": to_value(&hits)? })))
}

//! JSON HTTP API.

pub mod error;
mod extract;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::ai::{CoachService, LanguageModel, OpenAiClient};
use crate::core::rate_limit::RateLimiter;
use crate::db::{self, Database, SharedDb};
use crate::models::config::Config;

pub use error::ApiError;
pub use extract::AuthUser;

/// Request bodies may carry a base64 meal photo.
const BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: SharedDb,
    pub config: Arc<Config>,
    pub coach: CoachService,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, db: Database, model: Arc<dyn LanguageModel>) -> Self {
        let db = db::shared(db);
        let coach = CoachService::new(
            db.clone(),
            model,
            config.cache.clone(),
            config.openai.embedding_dimensions,
        );
        let limiter = RateLimiter::new(
            config.limits.ai_requests,
            Duration::from_secs(config.limits.window_secs),
        );
        Self {
            db,
            config: Arc::new(config),
            coach,
            limiter: Arc::new(limiter),
        }
    }

    /// Count one request against the (user, endpoint) window.
    pub fn enforce_limit(&self, user_id: &str, endpoint: &str) -> Result<(), ApiError> {
        let decision = self.limiter.check(user_id, endpoint);
        if decision.allowed {
            Ok(())
        } else {
            tracing::info!(user_id, endpoint, "rate limit hit");
            Err(ApiError::RateLimited {
                retry_after: decision.retry_after,
            })
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/healthz", get(routes::healthz))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/test-login", post(routes::auth::test_login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route(
            "/api/profile",
            get(routes::profile::show).put(routes::profile::update),
        )
        .route(
            "/api/health",
            post(routes::health::create).get(routes::health::list),
        )
        .route(
            "/api/health/{id}",
            get(routes::health::show).delete(routes::health::remove),
        )
        .route("/api/insights", get(routes::insights::list))
        .route("/api/alerts", get(routes::alerts::list))
        .route("/api/alerts/generate", post(routes::alerts::generate))
        .route("/api/alerts/{id}/ack", post(routes::alerts::acknowledge))
        .route("/api/ai/plan", post(routes::ai::plan))
        .route("/api/ai/coach", post(routes::ai::coach))
        .route("/api/ai/analyze-image", post(routes::ai::analyze_image))
        .route("/api/ai/cache", delete(routes::ai::clear_cache))
        .route("/api/embeddings/refresh", post(routes::ai::refresh_embedding))
        .route("/api/search", get(routes::ai::search))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, db: Database) -> Result<()> {
    let model: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::new(&config.openai)?);
    if config.openai.api_key.is_none() {
        tracing::warn!("no OpenAI API key configured; AI endpoints will answer 503");
    }
    if config.auth.allow_test_login {
        tracing::warn!("test login endpoint is enabled");
    }

    let addr: SocketAddr = config.server.bind.parse()?;
    let state = AppState::new(config, db, model);
    let app = router(state);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

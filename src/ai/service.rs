use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{AiError, LanguageModel, prompts};
use crate::core::alerts::Averages;
use crate::core::{cache, search, summary, trend};
use crate::db::{self, SharedDb};
use crate::models::alert::Alert;
use crate::models::config::Cache;
use crate::models::embedding::{HealthEmbedding, SearchHit};
use crate::models::user::User;

const MAX_MESSAGE_LEN: usize = 2000;
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const IMAGE_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Upstream(#[from] AiError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Generated text, possibly served from the response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiText {
    pub text: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub cached: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequest {
    /// Base64 payload, optionally as a `data:` URL.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageAnalysis {
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingStatus {
    pub summary: String,
    pub dimensions: usize,
    pub updated_at: DateTime<Utc>,
}

struct Context {
    summary: String,
}

/// LLM-backed features on top of the store. Database guards are taken in
/// short scopes and released before any model call.
#[derive(Clone)]
pub struct CoachService {
    db: SharedDb,
    model: Arc<dyn LanguageModel>,
    ttl: Cache,
    embedding_dimensions: usize,
}

impl CoachService {
    pub fn new(
        db: SharedDb,
        model: Arc<dyn LanguageModel>,
        ttl: Cache,
        embedding_dimensions: usize,
    ) -> Self {
        Self {
            db,
            model,
            ttl,
            embedding_dimensions,
        }
    }

    fn context(&self, user_id: &str) -> Result<Context, ServiceError> {
        let db = db::lock(&self.db)?;
        let user: User = db
            .get_user(user_id)?
            .ok_or_else(|| ServiceError::NotFound("user not found".to_string()))?;
        let averages = Averages::recent(&db, user_id, Utc::now())?;
        let insights = trend::compute_insights(&db, user_id)?;
        Ok(Context {
            summary: summary::health_summary(&user, &averages, &insights),
        })
    }

    fn cached(&self, user_id: &str, key: &str) -> Result<Option<AiText>, ServiceError> {
        let db = db::lock(&self.db)?;
        match cache::get(&db, user_id, key, Utc::now())? {
            Some(value) => {
                let mut text: AiText =
                    serde_json::from_value(value).map_err(anyhow::Error::from)?;
                text.cached = true;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn store(&self, user_id: &str, key: &str, text: &AiText, ttl: i64) -> Result<(), ServiceError> {
        let db = db::lock(&self.db)?;
        let value = serde_json::to_value(text).map_err(anyhow::Error::from)?;
        cache::put(&db, user_id, key, &value, ttl, Utc::now())?;
        Ok(())
    }

    /// Weekly plan, cached per user until the plan TTL runs out.
    pub async fn plan(&self, user_id: &str, refresh: bool) -> Result<AiText, ServiceError> {
        if !refresh && let Some(hit) = self.cached(user_id, cache::PLAN_KEY)? {
            return Ok(hit);
        }
        let ctx = self.context(user_id)?;
        let text = self.model.chat(&prompts::plan(&ctx.summary)).await?;
        let out = AiText {
            text,
            generated_at: Utc::now(),
            cached: false,
        };
        self.store(user_id, cache::PLAN_KEY, &out, self.ttl.plan_ttl_secs)?;
        info!(user_id, "generated health plan");
        Ok(out)
    }

    pub async fn coach(&self, user_id: &str, message: &str) -> Result<AiText, ServiceError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ServiceError::Invalid("message is required".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ServiceError::Invalid(format!(
                "message must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }

        let key = cache::coach_key(message);
        if let Some(hit) = self.cached(user_id, &key)? {
            return Ok(hit);
        }
        let ctx = self.context(user_id)?;
        let text = self.model.chat(&prompts::coach(&ctx.summary, message)).await?;
        let out = AiText {
            text,
            generated_at: Utc::now(),
            cached: false,
        };
        self.store(user_id, &key, &out, self.ttl.coach_ttl_secs)?;
        Ok(out)
    }

    /// Plain-language explanation of rule alerts. Nothing to explain, no call.
    pub async fn explain_alerts(
        &self,
        user_id: &str,
        alerts: &[Alert],
    ) -> Result<Option<String>, ServiceError> {
        if alerts.is_empty() {
            return Ok(None);
        }
        let ctx = self.context(user_id)?;
        let text = self
            .model
            .chat(&prompts::explain_alerts(&ctx.summary, alerts))
            .await?;
        Ok(Some(text))
    }

    pub async fn analyze_image(&self, req: &ImageRequest) -> Result<ImageAnalysis, ServiceError> {
        let data_url = image_data_url(req).map_err(ServiceError::Invalid)?;
        let analysis = self.model.vision(prompts::IMAGE_ANALYSIS, &data_url).await?;
        let estimate = extract_json_object(&analysis);
        Ok(ImageAnalysis { analysis, estimate })
    }

    /// Rebuild the user's summary embedding (one row per user).
    pub async fn refresh_embedding(&self, user_id: &str) -> Result<EmbeddingStatus, ServiceError> {
        let ctx = self.context(user_id)?;
        let vector = self.model.embed(&ctx.summary).await?;
        if vector.len() != self.embedding_dimensions {
            return Err(AiError::Decode(format!(
                "embedding has {} dimensions, expected {}",
                vector.len(),
                self.embedding_dimensions
            ))
            .into());
        }
        let embedding = HealthEmbedding {
            user_id: user_id.to_string(),
            summary: ctx.summary,
            vector,
            updated_at: Utc::now(),
        };
        db::lock(&self.db)?.upsert_embedding(&embedding)?;
        Ok(EmbeddingStatus {
            dimensions: embedding.vector.len(),
            summary: embedding.summary,
            updated_at: embedding.updated_at,
        })
    }

    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchHit>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::Invalid("query is required".to_string()));
        }
        let vector = self.model.embed(query).await?;
        let candidates = db::lock(&self.db)?.all_embeddings()?;
        Ok(search::rank(
            &vector,
            &candidates,
            user_id,
            limit.unwrap_or(search::DEFAULT_LIMIT),
        ))
    }
}

/// Validate an uploaded image and return it as a `data:` URL.
pub fn image_data_url(req: &ImageRequest) -> Result<String, String> {
    let raw = req.image.trim();
    if raw.is_empty() {
        return Err("image is required".to_string());
    }
    let (mime, payload) = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| "malformed data URL".to_string())?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| "data URL must be base64 encoded".to_string())?;
            (mime.to_string(), payload)
        }
        None => (
            req.mime_type
                .clone()
                .unwrap_or_else(|| "image/jpeg".to_string()),
            raw,
        ),
    };
    if !IMAGE_MIME_TYPES.contains(&mime.as_str()) {
        return Err(format!(
            "unsupported image type '{}' (expected jpeg, png or webp)",
            mime
        ));
    }
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| "image is not valid base64".to_string())?;
    if bytes.is_empty() {
        return Err("image is empty".to_string());
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(format!(
            "image exceeds {} MiB",
            MAX_IMAGE_BYTES / (1024 * 1024)
        ));
    }
    Ok(format!("data:{};base64,{}", mime, payload))
}

/// First JSON object embedded in `text`. Nested objects are kept whole and
/// anything after the closing brace is ignored.
fn extract_json_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(Value::Object(map))) => Some(Value::Object(map)),
            _ => None,
        }
    })
}

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct HealthEmbedding {
    pub user_id: String,
    pub summary: String,
    pub vector: Vec<f32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub is_self: bool,
    pub score: f64,
    pub summary: String,
}

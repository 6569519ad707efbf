use crate::models::embedding::{HealthEmbedding, SearchHit};

pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 20;

/// Cosine similarity of two vectors; `None` for mismatched lengths or a
/// zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some(dot / denom)
}

/// Rank stored summaries against `query`, best first. Rows of other users
/// are returned without their id.
pub fn rank(
    query: &[f32],
    candidates: &[HealthEmbedding],
    requester: &str,
    limit: usize,
) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = candidates
        .iter()
        .filter_map(|c| {
            cosine_similarity(query, &c.vector).map(|score| SearchHit {
                is_self: c.user_id == requester,
                score: (score * 1000.0).round() / 1000.0,
                summary: c.summary.clone(),
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits.truncate(limit.clamp(1, MAX_LIMIT));
    hits
}

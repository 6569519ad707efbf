mod common;

use chrono::Utc;
use vitalcoach::core::search::{self, MAX_LIMIT};
use vitalcoach::models::embedding::HealthEmbedding;

fn emb(user_id: &str, vector: Vec<f32>) -> HealthEmbedding {
    HealthEmbedding {
        user_id: user_id.to_string(),
        summary: format!("Zusammenfassung {}", user_id),
        vector,
        updated_at: Utc::now(),
    }
}

#[test]
fn test_cosine_similarity() {
    assert_eq!(search::cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]), Some(1.0));
    assert_eq!(search::cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
    assert!(search::cosine_similarity(&[1.0], &[1.0, 0.0]).is_none());
    assert!(search::cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_none());
}

#[test]
fn test_rank_orders_by_score_and_marks_self() {
    let candidates = vec![
        emb("far", vec![0.0, 1.0]),
        emb("me", vec![1.0, 0.1]),
        emb("close", vec![1.0, 0.0]),
    ];
    let hits = search::rank(&[1.0, 0.0], &candidates, "me", 5);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].summary, "Zusammenfassung close");
    assert!(!hits[0].is_self);
    assert!(hits[1].is_self);
    assert!(hits[0].score >= hits[1].score && hits[1].score >= hits[2].score);
}

#[test]
fn test_rank_respects_limit_bounds() {
    let candidates: Vec<_> = (0..30).map(|i| emb(&i.to_string(), vec![1.0, i as f32])).collect();
    assert_eq!(search::rank(&[1.0, 0.0], &candidates, "x", 2).len(), 2);
    assert_eq!(search::rank(&[1.0, 0.0], &candidates, "x", 100).len(), MAX_LIMIT);
}

#[test]
fn test_embedding_storage_roundtrip() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let mut e = emb(&user.id, vec![0.25, -1.5, 3.0]);
    db.upsert_embedding(&e).unwrap();

    e.vector = vec![1.0, 2.0, 3.0];
    db.upsert_embedding(&e).unwrap();

    let stored = db.get_embedding(&user.id).unwrap().unwrap();
    assert_eq!(stored.vector, vec![1.0, 2.0, 3.0]);
    assert_eq!(db.all_embeddings().unwrap().len(), 1);
}

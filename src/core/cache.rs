use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::db::Database;

pub const PLAN_KEY: &str = "plan";

/// Cache key for a coaching question. Whitespace and case differences map
/// to the same entry.
pub fn coach_key(message: &str) -> String {
    let normalized = message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("coach:{}", &hex::encode(digest)[..16])
}

/// Look up a live entry.
pub fn get(db: &Database, user_id: &str, key: &str, now: DateTime<Utc>) -> Result<Option<Value>> {
    db.cache_get(user_id, key, now)
}

/// Store `value` for `ttl_secs` seconds, replacing any previous entry.
pub fn put(
    db: &Database,
    user_id: &str,
    key: &str,
    value: &Value,
    ttl_secs: i64,
    now: DateTime<Utc>,
) -> Result<()> {
    db.cache_put(user_id, key, value, now + Duration::seconds(ttl_secs), now)
}

pub fn clear(db: &Database, user_id: &str) -> Result<usize> {
    db.cache_clear_user(user_id)
}

pub fn purge_expired(db: &Database, now: DateTime<Utc>) -> Result<usize> {
    db.cache_purge_expired(now)
}

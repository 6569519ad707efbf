use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use serde_json::Value;

use super::{Database, fmt_ts};

impl Database {
    /// Cached response for (user, key) if it has not expired at `now`.
    pub fn cache_get(&self, user_id: &str, key: &str, now: DateTime<Utc>) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT response FROM ai_response_cache
                 WHERE user_id = ?1 AND cache_key = ?2 AND expires_at > ?3",
                params![user_id, key, fmt_ts(&now)],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    /// Replace the entry for (user, key). Delete then insert, matching the
    /// overwrite semantics callers rely on.
    pub fn cache_put(
        &self,
        user_id: &str,
        key: &str,
        response: &Value,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "DELETE FROM ai_response_cache WHERE user_id = ?1 AND cache_key = ?2",
            params![user_id, key],
        )?;
        self.conn.execute(
            "INSERT INTO ai_response_cache (user_id, cache_key, response, expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                key,
                serde_json::to_string(response)?,
                fmt_ts(&expires_at),
                fmt_ts(&now),
            ],
        )?;
        Ok(())
    }

    pub fn cache_clear_user(&self, user_id: &str) -> Result<usize> {
        let count = self.conn.execute(
            "DELETE FROM ai_response_cache WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(count)
    }

    pub fn cache_purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let count = self.conn.execute(
            "DELETE FROM ai_response_cache WHERE expires_at <= ?1",
            params![fmt_ts(&now)],
        )?;
        Ok(count)
    }
}

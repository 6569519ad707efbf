use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

use crate::models::user::Session;

use super::{Database, fmt_ts, parse_ts};

impl Database {
    pub fn insert_session(&self, s: &Session) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![s.token, s.user_id, fmt_ts(&s.expires_at)],
        )?;
        Ok(())
    }

    /// Returns the session only while it is still valid at `now`.
    pub fn get_session(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT token, user_id, expires_at FROM sessions
                 WHERE token = ?1 AND expires_at > ?2",
                params![token, fmt_ts(&now)],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        match row {
            Some((token, user_id, expires_at)) => Ok(Some(Session {
                token,
                user_id,
                expires_at: parse_ts(&expires_at)?,
            })),
            None => Ok(None),
        }
    }

    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(count > 0)
    }

    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let count = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![fmt_ts(&now)],
        )?;
        Ok(count)
    }
}

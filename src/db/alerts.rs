use anyhow::Result;
use rusqlite::params;

use crate::models::alert::AlertRecord;

use super::{Database, fmt_ts, parse_ts};

struct AlertRow {
    id: String,
    user_id: String,
    alert_type: String,
    severity: String,
    message: String,
    acknowledged: bool,
    created_at: String,
}

fn row_to_alert(r: AlertRow) -> Result<AlertRecord> {
    Ok(AlertRecord {
        id: r.id,
        user_id: r.user_id,
        alert_type: r.alert_type,
        severity: r.severity.parse()?,
        message: r.message,
        acknowledged: r.acknowledged,
        created_at: parse_ts(&r.created_at)?,
    })
}

impl Database {
    pub fn insert_alert(&self, a: &AlertRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO alert_history
                 (id, user_id, alert_type, severity, message, acknowledged, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                a.id,
                a.user_id,
                a.alert_type,
                a.severity.to_string(),
                a.message,
                a.acknowledged,
                fmt_ts(&a.created_at),
            ],
        )?;
        Ok(())
    }

    /// Alert history of one user, newest first.
    pub fn list_alerts(
        &self,
        user_id: &str,
        unacknowledged_only: bool,
        limit: Option<u32>,
    ) -> Result<Vec<AlertRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, alert_type, severity, message, acknowledged, created_at
             FROM alert_history
             WHERE user_id = ?1 AND (?2 = 0 OR acknowledged = 0)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?3",
        )?;
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = stmt.query_map(params![user_id, unacknowledged_only, limit], |row| {
            Ok(AlertRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                alert_type: row.get(2)?,
                severity: row.get(3)?,
                message: row.get(4)?,
                acknowledged: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut alerts = Vec::new();
        for row in rows {
            alerts.push(row_to_alert(row?)?);
        }
        Ok(alerts)
    }

    pub fn acknowledge_alert(&self, user_id: &str, id: &str) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE alert_history SET acknowledged = 1 WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(count > 0)
    }
}

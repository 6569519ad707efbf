use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};

use crate::models::health::{HealthRecord, Vitals};

use super::{Database, fmt_ts, parse_ts};

const RECORD_COLUMNS: &str = "id, user_id, recorded_at, steps, heart_rate, sleep_hours,
     sleep_quality, weight, calories, bp_systolic, bp_diastolic, spo2, body_fat, muscle_mass,
     water_intake,
     exercise_minutes, blood_glucose, body_temperature, mood, stress_level, medications,
     meal_type, notes";

struct RecordRow {
    id: String,
    user_id: String,
    recorded_at: String,
    vitals: Vitals,
    medications: Option<String>,
    meal_type: Option<String>,
    notes: Option<String>,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecordRow> {
    Ok(RecordRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        recorded_at: row.get(2)?,
        vitals: Vitals {
            steps: row.get(3)?,
            heart_rate: row.get(4)?,
            sleep_hours: row.get(5)?,
            sleep_quality: row.get(6)?,
            weight: row.get(7)?,
            calories: row.get(8)?,
            bp_systolic: row.get(9)?,
            bp_diastolic: row.get(10)?,
            spo2: row.get(11)?,
            body_fat: row.get(12)?,
            muscle_mass: row.get(13)?,
            water_intake: row.get(14)?,
            exercise_minutes: row.get(15)?,
            blood_glucose: row.get(16)?,
            body_temperature: row.get(17)?,
            mood: row.get(18)?,
            stress_level: row.get(19)?,
        },
        medications: row.get(20)?,
        meal_type: row.get(21)?,
        notes: row.get(22)?,
    })
}

fn row_to_record(r: RecordRow) -> Result<HealthRecord> {
    let meal_type = match r.meal_type {
        Some(ref m) => Some(m.parse()?),
        None => None,
    };
    Ok(HealthRecord {
        id: r.id,
        user_id: r.user_id,
        recorded_at: parse_ts(&r.recorded_at)?,
        vitals: r.vitals,
        medications: r.medications,
        meal_type,
        notes: r.notes,
    })
}

/// Filter for listing a user's records. Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl Database {
    pub fn insert_record(&self, r: &HealthRecord) -> Result<()> {
        let v = &r.vitals;
        self.conn.execute(
            &format!(
                "INSERT INTO health_data ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                 ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
                RECORD_COLUMNS
            ),
            params![
                r.id,
                r.user_id,
                fmt_ts(&r.recorded_at),
                v.steps,
                v.heart_rate,
                v.sleep_hours,
                v.sleep_quality,
                v.weight,
                v.calories,
                v.bp_systolic,
                v.bp_diastolic,
                v.spo2,
                v.body_fat,
                v.muscle_mass,
                v.water_intake,
                v.exercise_minutes,
                v.blood_glucose,
                v.body_temperature,
                v.mood,
                v.stress_level,
                r.medications,
                r.meal_type.map(|m| m.to_string()),
                r.notes,
            ],
        )?;
        Ok(())
    }

    /// Records of one user in chronological order. With a limit, the most
    /// recent `limit` records are returned, still oldest first.
    pub fn query_records(&self, user_id: &str, q: &RecordQuery) -> Result<Vec<HealthRecord>> {
        let from = q.from.as_ref().map(fmt_ts);
        let to = q.to.as_ref().map(fmt_ts);
        let limit = q.limit.map(|l| l as i64).unwrap_or(-1);
        let sql = format!(
            "SELECT * FROM (
                SELECT {} FROM health_data
                WHERE user_id = ?1
                  AND (?2 IS NULL OR recorded_at >= ?2)
                  AND (?3 IS NULL OR recorded_at <= ?3)
                ORDER BY recorded_at DESC, rowid DESC
                LIMIT ?4
             ) ORDER BY recorded_at ASC",
            RECORD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, from, to, limit], read_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row_to_record(row?)?);
        }
        Ok(records)
    }

    /// Records of one user since `since`, chronological.
    pub fn records_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<Vec<HealthRecord>> {
        self.query_records(
            user_id,
            &RecordQuery {
                from: Some(since),
                ..Default::default()
            },
        )
    }

    pub fn get_record(&self, user_id: &str, id: &str) -> Result<Option<HealthRecord>> {
        let sql = format!(
            "SELECT {} FROM health_data WHERE id = ?1 AND user_id = ?2",
            RECORD_COLUMNS
        );
        let row = self
            .conn
            .query_row(&sql, params![id, user_id], read_row)
            .optional()?;
        row.map(row_to_record).transpose()
    }

    pub fn delete_record(&self, user_id: &str, id: &str) -> Result<bool> {
        let count = self.conn.execute(
            "DELETE FROM health_data WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(count > 0)
    }

    pub fn count_records(&self, user_id: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM health_data WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

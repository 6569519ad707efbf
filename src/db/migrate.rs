use anyhow::Result;
use rusqlite::Connection;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id               TEXT PRIMARY KEY,
            email            TEXT NOT NULL UNIQUE,
            name             TEXT NOT NULL,
            password_hash    TEXT NOT NULL,
            height_cm        REAL,
            birth_year       INTEGER,
            activity_level   TEXT NOT NULL DEFAULT 'moderate',
            goal             TEXT NOT NULL DEFAULT 'maintain',
            alert_thresholds TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token      TEXT PRIMARY KEY,
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS health_data (
            id               TEXT PRIMARY KEY,
            user_id          TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            recorded_at      TEXT NOT NULL,
            steps            REAL,
            heart_rate       REAL,
            sleep_hours      REAL,
            sleep_quality    REAL,
            weight           REAL,
            calories         REAL,
            bp_systolic      REAL,
            bp_diastolic     REAL,
            spo2             REAL,
            body_fat         REAL,
            muscle_mass      REAL,
            water_intake     REAL,
            exercise_minutes REAL,
            blood_glucose    REAL,
            body_temperature REAL,
            mood             REAL,
            stress_level     REAL,
            medications      TEXT,
            meal_type        TEXT,
            notes            TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_health_user_ts ON health_data(user_id, recorded_at);

        CREATE TABLE IF NOT EXISTS health_embeddings (
            user_id    TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            summary    TEXT NOT NULL,
            embedding  BLOB NOT NULL,
            dimensions INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ai_response_cache (
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            cache_key  TEXT NOT NULL,
            response   TEXT NOT NULL,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (user_id, cache_key)
        );

        CREATE TABLE IF NOT EXISTS alert_history (
            id           TEXT PRIMARY KEY,
            user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            alert_type   TEXT NOT NULL,
            severity     TEXT NOT NULL,
            message      TEXT NOT NULL,
            acknowledged INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_alerts_user_ts ON alert_history(user_id, created_at);",
    )?;
    Ok(())
}

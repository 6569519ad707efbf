use anyhow::Result;
use rusqlite::{OptionalExtension, params};

use crate::models::user::User;

use super::{Database, fmt_ts, parse_ts};

const USER_COLUMNS: &str = "id, email, name, password_hash, height_cm, birth_year, \
    activity_level, goal, alert_thresholds, created_at";

struct UserRow {
    id: String,
    email: String,
    name: String,
    password_hash: String,
    height_cm: Option<f64>,
    birth_year: Option<u16>,
    activity_level: String,
    goal: String,
    alert_thresholds: Option<String>,
    created_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        height_cm: row.get(4)?,
        birth_year: row.get(5)?,
        activity_level: row.get(6)?,
        goal: row.get(7)?,
        alert_thresholds: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn row_to_user(r: UserRow) -> Result<User> {
    let alert_thresholds = match r.alert_thresholds {
        Some(ref t) => Some(serde_json::from_str(t)?),
        None => None,
    };
    Ok(User {
        id: r.id,
        email: r.email,
        name: r.name,
        password_hash: r.password_hash,
        height_cm: r.height_cm,
        birth_year: r.birth_year,
        activity_level: r.activity_level.parse()?,
        goal: r.goal.parse()?,
        alert_thresholds,
        created_at: parse_ts(&r.created_at)?,
    })
}

impl Database {
    pub fn insert_user(&self, u: &User) -> Result<()> {
        let thresholds = match u.alert_thresholds {
            Some(ref t) => Some(serde_json::to_string(t)?),
            None => None,
        };
        self.conn.execute(
            "INSERT INTO users (id, email, name, password_hash, height_cm, birth_year,
                                activity_level, goal, alert_thresholds, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                u.id,
                u.email,
                u.name,
                u.password_hash,
                u.height_cm,
                u.birth_year,
                u.activity_level.to_string(),
                u.goal.to_string(),
                thresholds,
                fmt_ts(&u.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn update_user(&self, u: &User) -> Result<bool> {
        let thresholds = match u.alert_thresholds {
            Some(ref t) => Some(serde_json::to_string(t)?),
            None => None,
        };
        let count = self.conn.execute(
            "UPDATE users SET name = ?2, height_cm = ?3, birth_year = ?4, activity_level = ?5,
                              goal = ?6, alert_thresholds = ?7
             WHERE id = ?1",
            params![
                u.id,
                u.name,
                u.height_cm,
                u.birth_year,
                u.activity_level.to_string(),
                u.goal.to_string(),
                thresholds,
            ],
        )?;
        Ok(count > 0)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![id], read_row)
            .optional()?;
        row.map(row_to_user).transpose()
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![email.trim().to_lowercase()], read_row)
            .optional()?;
        row.map(row_to_user).transpose()
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], read_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row_to_user(row?)?);
        }
        Ok(users)
    }
}

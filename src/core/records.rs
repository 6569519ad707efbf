use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::core::validation::{self, ValidationError};
use crate::db::{Database, RecordQuery};
use crate::models::health::{HealthRecord, NewHealthRecord};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Validate and persist one observation. Text fields are trimmed and
/// blank ones dropped.
pub fn log_record(
    db: &Database,
    user_id: &str,
    mut input: NewHealthRecord,
    now: DateTime<Utc>,
) -> Result<HealthRecord, RecordError> {
    input.medications = clean(input.medications);
    input.notes = clean(input.notes);
    validation::validate_record(&input, now)?;

    let record = HealthRecord::from_input(user_id, input);
    db.insert_record(&record)?;
    Ok(record)
}

fn clean(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn list_records(db: &Database, user_id: &str, q: &RecordQuery) -> Result<Vec<HealthRecord>> {
    if let (Some(from), Some(to)) = (q.from, q.to)
        && from > to
    {
        anyhow::bail!("'from' must not be after 'to'");
    }
    db.query_records(user_id, q)
}

use axum::extract::State;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{Reply, created, ok, to_value};
use crate::core::records;
use crate::db::{self, RecordQuery};
use crate::models::health::NewHealthRecord;
use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::{ApiError, AppState, AuthUser};

const MAX_LIST_LIMIT: u32 = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    from: Option<String>,
    to: Option<String>,
    limit: Option<u32>,
}

/// RFC 3339 timestamp or a bare `YYYY-MM-DD`. A bare date used as an upper
/// bound covers the whole day.
pub fn parse_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD or RFC 3339)", raw))?;
    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        Some(NaiveTime::MIN)
    };
    let time = time.ok_or_else(|| "invalid time of day".to_string())?;
    Ok(date.and_time(time).and_utc())
}

impl ListParams {
    fn to_query(&self) -> Result<RecordQuery, ApiError> {
        let from = self
            .from
            .as_deref()
            .map(|s| parse_bound(s, false))
            .transpose()
            .map_err(ApiError::BadRequest)?;
        let to = self
            .to
            .as_deref()
            .map(|s| parse_bound(s, true))
            .transpose()
            .map_err(ApiError::BadRequest)?;
        if let (Some(f), Some(t)) = (from, to)
            && f > t
        {
            return Err(ApiError::BadRequest("'from' must not be after 'to'".to_string()));
        }
        Ok(RecordQuery {
            from,
            to,
            limit: self.limit.map(|l| l.clamp(1, MAX_LIST_LIMIT)),
        })
    }
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<NewHealthRecord>,
) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    let record = records::log_record(&db, &auth.user.id, input, Utc::now())?;
    Ok(created("health", to_value(&record)?))
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Reply, ApiError> {
    let query = params.to_query()?;
    let db = db::lock(&state.db)?;
    let records = records::list_records(&db, &auth.user.id, &query)?;
    Ok(ok(
        "health",
        json!({ "count": records.len(), "records": to_value(&records)? }),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    let record = db
        .get_record(&auth.user.id, &id)?
        .ok_or_else(|| ApiError::not_found("record"))?;
    Ok(ok("health", to_value(&record)?))
}

pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Reply, ApiError> {
    let db = db::lock(&state.db)?;
    if !db.delete_record(&auth.user.id, &id)? {
        return Err(ApiError::not_found("record"));
    }
    Ok(ok("health", json!({ "deleted": id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_dates_cover_whole_day() {
        let from = parse_bound("2026-03-01", false).unwrap();
        let to = parse_bound("2026-03-01", true).unwrap();
        assert_eq!(from.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert!(to > from);
        assert_eq!(to.date_naive(), from.date_naive());
    }

    #[test]
    fn rfc3339_and_garbage() {
        let ts = parse_bound("2026-03-01T10:00:00+02:00", false).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T08:00:00+00:00");
        assert!(parse_bound("gestern", false).is_err());
    }
}

use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use vitalcoach::core::cache;
use vitalcoach::output;

pub fn run_purge(human: bool) -> Result<()> {
    let db = super::open_db()?;
    let now = Utc::now();
    let entries = cache::purge_expired(&db, now)?;
    let sessions = db.purge_expired_sessions(now)?;

    if human {
        println!(
            "Removed {} expired cache entries and {} expired sessions",
            entries, sessions
        );
    } else {
        super::print_json(&output::success(
            "cache",
            json!({ "cache_entries": entries, "sessions": sessions }),
        ))?;
    }
    Ok(())
}

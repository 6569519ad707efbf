use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;

use vitalcoach::core::records;
use vitalcoach::db::RecordQuery;
use vitalcoach::output;
use vitalcoach::output::human;

pub fn run(
    email: &str,
    last: Option<u32>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    human_flag: bool,
) -> Result<()> {
    let db = super::open_db()?;
    let user = super::find_user(&db, email)?;
    let query = RecordQuery {
        from: from.map(|d| d.and_time(NaiveTime::MIN).and_utc()),
        to: to
            .and_then(|d| d.and_hms_micro_opt(23, 59, 59, 999_999))
            .map(|dt| dt.and_utc()),
        limit: last,
    };
    let entries = records::list_records(&db, &user.id, &query)?;

    if human_flag {
        if entries.is_empty() {
            println!("No records found for {}", user.email);
        } else {
            println!("{}", human::records_table(&entries));
        }
    } else {
        super::print_json(&output::success(
            "show",
            json!({ "user": user.email, "count": entries.len(), "records": entries }),
        ))?;
    }
    Ok(())
}

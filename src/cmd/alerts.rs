use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use vitalcoach::core::alerts;
use vitalcoach::output;
use vitalcoach::output::human;

pub fn run(email: &str, generate: bool, unacknowledged: bool, human_flag: bool) -> Result<()> {
    let db = super::open_db()?;
    let user = super::find_user(&db, email)?;

    if generate {
        let report = alerts::generate(&db, &user, Utc::now())?;
        if human_flag {
            if report.alerts.is_empty() {
                println!("Keine Auffälligkeiten in den letzten {} Tagen.", alerts::AVERAGE_DAYS);
            }
            for a in &report.alerts {
                println!("{}", human::format_alert(a));
            }
        } else {
            super::print_json(&output::success("alerts", serde_json::to_value(&report)?))?;
        }
        return Ok(());
    }

    let history = db.list_alerts(&user.id, unacknowledged, None)?;
    if human_flag {
        if history.is_empty() {
            println!("No alerts");
        }
        for a in &history {
            println!("{}", human::format_alert(a));
        }
    } else {
        super::print_json(&output::success("alerts", json!({ "alerts": history })))?;
    }
    Ok(())
}

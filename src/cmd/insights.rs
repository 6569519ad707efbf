use anyhow::Result;
use serde_json::json;

use vitalcoach::core::trend;
use vitalcoach::output;
use vitalcoach::output::human;

pub fn run(email: &str, human_flag: bool) -> Result<()> {
    let db = super::open_db()?;
    let user = super::find_user(&db, email)?;
    let insights = trend::compute_insights(&db, &user.id)?;

    if human_flag {
        if insights.is_empty() {
            println!(
                "Noch nicht genug Daten (mindestens {} Messwerte pro Kennzahl).",
                2 * trend::WINDOW
            );
        }
        for i in &insights {
            println!("{}", human::format_insight(i));
        }
    } else {
        super::print_json(&output::success(
            "insights",
            json!({ "window": trend::WINDOW, "insights": insights }),
        ))?;
    }
    Ok(())
}

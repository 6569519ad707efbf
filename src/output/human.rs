use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::models::alert::{AlertRecord, Severity};
use crate::models::health::HealthRecord;
use crate::models::insight::{Insight, TrendDirection};

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Measured fields of a record as `name=value` pairs.
fn measured(r: &HealthRecord) -> Vec<String> {
    let v = &r.vitals;
    let mut parts = Vec::new();
    if let (Some(sys), Some(dia)) = (v.bp_systolic, v.bp_diastolic) {
        parts.push(format!("bp={}/{}", fmt_value(sys), fmt_value(dia)));
    }
    for (name, value) in v.fields() {
        if name.starts_with("bp_") {
            continue;
        }
        if let Some(value) = value {
            parts.push(format!("{}={}", name, fmt_value(value)));
        }
    }
    parts
}

/// Pretty-print a single record on one line.
pub fn format_record(r: &HealthRecord) -> String {
    let ts = r.recorded_at.format("%Y-%m-%d %H:%M");
    let mut line = format!("{} | {}", ts, measured(r).join(" "));
    if let Some(meal) = r.meal_type {
        line.push_str(&format!("  [{}]", meal));
    }
    if let Some(ref meds) = r.medications {
        line.push_str(&format!("  Rx: {}", meds));
    }
    if let Some(ref note) = r.notes {
        line.push_str(&format!("  # {}", note));
    }
    line
}

pub fn records_table(records: &[HealthRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Zeit", "Werte", "Mahlzeit", "Notiz"]);
    for r in records {
        table.add_row(vec![
            r.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
            measured(r).join("\n"),
            r.meal_type.map(|m| m.to_string()).unwrap_or_default(),
            r.notes.clone().unwrap_or_default(),
        ]);
    }
    table
}

pub fn format_insight(i: &Insight) -> String {
    let arrow = match i.trend {
        TrendDirection::Rising => "↑".yellow(),
        TrendDirection::Falling => "↓".cyan(),
        TrendDirection::Stable => "→".green(),
    };
    format!(
        "{} {:<20} {} -> {} {} ({:+.1}%, {})\n    {}",
        arrow,
        i.metric.label(),
        fmt_value(i.previous_avg),
        fmt_value(i.recent_avg),
        i.unit,
        i.change_pct,
        i.trend,
        i.recommendation
    )
}

pub fn format_alert(a: &AlertRecord) -> String {
    let tag = match a.severity {
        Severity::Critical => "CRITICAL".red().bold(),
        Severity::Warning => "WARNING".yellow(),
        Severity::Info => "INFO".normal(),
    };
    let ack = if a.acknowledged { " (quittiert)" } else { "" };
    format!(
        "{} [{}] {}: {}{}",
        a.created_at.format("%Y-%m-%d %H:%M"),
        tag,
        a.alert_type,
        a.message,
        ack
    )
}

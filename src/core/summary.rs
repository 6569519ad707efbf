use std::fmt::Write;

use crate::core::alerts::Averages;
use crate::core::profile;
use crate::models::insight::Insight;
use crate::models::user::User;

/// Plain-text description of a user's current health picture. Used as the
/// embedding input and as context in LLM prompts. No name or email.
pub fn health_summary(user: &User, averages: &Averages, insights: &[Insight]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Profil: Aktivität {}, Ziel {}.",
        user.activity_level, user.goal
    );
    if let Some(h) = user.height_cm {
        let _ = writeln!(out, "Größe: {:.0} cm.", h);
    }
    if let Some(bmi) = profile::bmi(user.height_cm, averages.weight) {
        let _ = writeln!(out, "BMI: {:.1} ({}).", bmi, profile::bmi_category(bmi));
    }

    let _ = writeln!(
        out,
        "Durchschnitt der letzten 7 Tage ({} Einträge):",
        averages.record_count
    );
    let lines = [
        ("Schritte", averages.steps, "", 0usize),
        ("Herzfrequenz", averages.heart_rate, " bpm", 0),
        ("Schlaf", averages.sleep_hours, " h", 1),
        ("Gewicht", averages.weight, " kg", 1),
        ("Kalorien", averages.calories, " kcal", 0),
        ("SpO2", averages.spo2, " %", 0),
    ];
    let mut any = false;
    for (label, value, unit, precision) in lines {
        if let Some(v) = value {
            any = true;
            let _ = writeln!(out, "- {}: {:.*}{}", label, precision, v, unit);
        }
    }
    if let (Some(sys), Some(dia)) = (averages.bp_systolic, averages.bp_diastolic) {
        any = true;
        let _ = writeln!(out, "- Blutdruck: {:.0}/{:.0} mmHg", sys, dia);
    }
    if !any {
        let _ = writeln!(out, "- keine Messwerte");
    }

    if !insights.is_empty() {
        let _ = writeln!(out, "Trends:");
        for i in insights {
            let _ = writeln!(
                out,
                "- {}: {} ({:+.1}%)",
                i.metric.label(),
                i.trend,
                i.change_pct
            );
        }
    }
    out
}

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::json;

use vitalcoach::core::records::{self, RecordError};
use vitalcoach::models::health::{NewHealthRecord, Vitals};
use vitalcoach::output;
use vitalcoach::output::human;

use crate::cli::LogArgs;

/// Parse `SYSTOLIC/DIASTOLIC`.
fn parse_bp(value: &str) -> Result<(f64, f64)> {
    let (sys, dia) = value.split_once('/').ok_or_else(|| {
        anyhow::anyhow!("blood pressure format must be SYSTOLIC/DIASTOLIC (e.g., 120/80)")
    })?;
    let systolic: f64 = sys
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid systolic value"))?;
    let diastolic: f64 = dia
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid diastolic value"))?;
    Ok((systolic, diastolic))
}

fn input_from_flags(args: &LogArgs) -> Result<NewHealthRecord> {
    let (bp_systolic, bp_diastolic) = match args.bp.as_deref() {
        Some(bp) => {
            let (s, d) = parse_bp(bp)?;
            (Some(s), Some(d))
        }
        None => (None, None),
    };
    Ok(NewHealthRecord {
        recorded_at: None,
        vitals: Vitals {
            steps: args.steps,
            heart_rate: args.heart_rate,
            sleep_hours: args.sleep_hours,
            sleep_quality: args.sleep_quality,
            weight: args.weight,
            calories: args.calories,
            bp_systolic,
            bp_diastolic,
            spo2: args.spo2,
            body_fat: args.body_fat,
            muscle_mass: args.muscle_mass,
            water_intake: args.water,
            exercise_minutes: args.exercise_minutes,
            blood_glucose: args.glucose,
            body_temperature: args.temperature,
            mood: args.mood,
            stress_level: args.stress,
        },
        medications: args.medications.clone(),
        meal_type: args.meal.as_deref().map(str::parse).transpose()?,
        notes: args.notes.clone(),
    })
}

pub fn run(args: LogArgs, date: Option<NaiveDate>, human_flag: bool) -> Result<()> {
    let db = super::open_db()?;
    let user = super::find_user(&db, &args.user)?;

    let mut input = match args.json.as_deref() {
        Some(raw) => serde_json::from_str::<NewHealthRecord>(raw).context("invalid record JSON")?,
        None => input_from_flags(&args)?,
    };
    if input.recorded_at.is_none()
        && let Some(d) = date
    {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
        input.recorded_at = Some(d.and_time(noon).and_utc());
    }

    let record = records::log_record(&db, &user.id, input, Utc::now()).map_err(|e| match e {
        RecordError::Other(e) => e,
        invalid => anyhow::anyhow!(invalid.to_string()),
    })?;

    if human_flag {
        println!("Logged: {}", human::format_record(&record));
    } else {
        super::print_json(&output::success("log", json!({ "record": record })))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bp_flag_parsing() {
        assert_eq!(parse_bp("120/80").unwrap(), (120.0, 80.0));
        assert_eq!(parse_bp(" 135 / 85 ").unwrap(), (135.0, 85.0));
        assert!(parse_bp("120").is_err());
        assert!(parse_bp("hoch/80").is_err());
    }
}

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::db::Database;
use crate::models::alert::{Alert, AlertRecord, Severity};
use crate::models::health::{HealthRecord, MetricKind};
use crate::models::user::{ActivityLevel, HealthGoal, User};

/// Days of history averaged before thresholds are applied.
pub const AVERAGE_DAYS: i64 = 7;

const CRISIS_SYSTOLIC: f64 = 180.0;
const CRISIS_DIASTOLIC: f64 = 120.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Thresholds {
    pub bp_systolic_max: f64,
    pub bp_diastolic_max: f64,
    pub heart_rate_max: f64,
    pub heart_rate_min: f64,
    pub steps_min: f64,
    pub sleep_min: f64,
    pub sleep_max: f64,
    pub calories_max: f64,
    pub calories_min: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bp_systolic_max: 140.0,
            bp_diastolic_max: 90.0,
            heart_rate_max: 100.0,
            heart_rate_min: 50.0,
            steps_min: 5000.0,
            sleep_min: 6.0,
            sleep_max: 10.0,
            calories_max: 2500.0,
            calories_min: 1200.0,
        }
    }
}

/// User-supplied partial thresholds, stored as a JSON object on the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub bp_systolic_max: Option<f64>,
    pub bp_diastolic_max: Option<f64>,
    pub heart_rate_max: Option<f64>,
    pub heart_rate_min: Option<f64>,
    pub steps_min: Option<f64>,
    pub sleep_min: Option<f64>,
    pub sleep_max: Option<f64>,
    pub calories_max: Option<f64>,
    pub calories_min: Option<f64>,
}

impl ThresholdOverrides {
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            anyhow::bail!("alert thresholds must be a JSON object");
        }
        let parsed: Self = serde_json::from_value(value.clone())?;
        let all = [
            parsed.bp_systolic_max,
            parsed.bp_diastolic_max,
            parsed.heart_rate_max,
            parsed.heart_rate_min,
            parsed.steps_min,
            parsed.sleep_min,
            parsed.sleep_max,
            parsed.calories_max,
            parsed.calories_min,
        ];
        if all.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
            anyhow::bail!("alert thresholds must be non-negative numbers");
        }
        Ok(parsed)
    }
}

impl Thresholds {
    /// Defaults adjusted by the profile's activity level and goal.
    pub fn for_profile(activity: ActivityLevel, goal: HealthGoal) -> Self {
        let mut t = Self::default();
        match activity {
            ActivityLevel::Sedentary => t.steps_min = 3000.0,
            ActivityLevel::Light | ActivityLevel::Moderate => {}
            ActivityLevel::Active => {
                t.steps_min = 8000.0;
                t.heart_rate_min = 45.0;
            }
            ActivityLevel::VeryActive => {
                t.steps_min = 10_000.0;
                t.heart_rate_min = 40.0;
            }
        }
        match goal {
            HealthGoal::LoseWeight => t.calories_max = 2000.0,
            HealthGoal::Maintain => {}
            HealthGoal::GainMuscle => {
                t.calories_min = 1800.0;
                t.calories_max = 3200.0;
            }
            HealthGoal::ImproveFitness => t.steps_min += 2000.0,
        }
        t
    }

    /// Merge overrides key by key over `self`.
    pub fn merged(mut self, o: &ThresholdOverrides) -> Self {
        fn set(slot: &mut f64, v: Option<f64>) {
            if let Some(v) = v {
                *slot = v;
            }
        }
        set(&mut self.bp_systolic_max, o.bp_systolic_max);
        set(&mut self.bp_diastolic_max, o.bp_diastolic_max);
        set(&mut self.heart_rate_max, o.heart_rate_max);
        set(&mut self.heart_rate_min, o.heart_rate_min);
        set(&mut self.steps_min, o.steps_min);
        set(&mut self.sleep_min, o.sleep_min);
        set(&mut self.sleep_max, o.sleep_max);
        set(&mut self.calories_max, o.calories_max);
        set(&mut self.calories_min, o.calories_min);
        self
    }

    /// Effective thresholds for a user. A stored blob that no longer parses
    /// is ignored rather than blocking alert generation.
    pub fn for_user(user: &User) -> Self {
        let base = Self::for_profile(user.activity_level, user.goal);
        match user.alert_thresholds.as_ref() {
            Some(blob) => match ThresholdOverrides::from_json(blob) {
                Ok(o) => base.merged(&o),
                Err(e) => {
                    tracing::warn!(
                        user_id = %user.id,
                        error = %e,
                        "ignoring invalid alert thresholds"
                    );
                    base
                }
            },
            None => base,
        }
    }
}

/// Mean of each alert-relevant metric over a period; `None` when unmeasured.
/// Means are kept unrounded for threshold checks and rounded to one decimal
/// only when serialized.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Averages {
    #[serde(serialize_with = "tenths")]
    pub bp_systolic: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub bp_diastolic: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub heart_rate: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub steps: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub sleep_hours: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub calories: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub weight: Option<f64>,
    #[serde(serialize_with = "tenths")]
    pub spo2: Option<f64>,
    pub record_count: usize,
}

fn tenths<S: Serializer>(value: &Option<f64>, s: S) -> std::result::Result<S::Ok, S::Error> {
    value.map(|v| (v * 10.0).round() / 10.0).serialize(s)
}

fn average_of(records: &[HealthRecord], metric: MetricKind) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|r| metric.value(r)).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

impl Averages {
    pub fn from_records(records: &[HealthRecord]) -> Self {
        Self {
            bp_systolic: average_of(records, MetricKind::BpSystolic),
            bp_diastolic: average_of(records, MetricKind::BpDiastolic),
            heart_rate: average_of(records, MetricKind::HeartRate),
            steps: average_of(records, MetricKind::Steps),
            sleep_hours: average_of(records, MetricKind::SleepHours),
            calories: average_of(records, MetricKind::Calories),
            weight: average_of(records, MetricKind::Weight),
            spo2: average_of(records, MetricKind::Spo2),
            record_count: records.len(),
        }
    }

    /// Averages over the last `AVERAGE_DAYS` days before `now`.
    pub fn recent(db: &Database, user_id: &str, now: DateTime<Utc>) -> Result<Self> {
        let records = db.records_since(user_id, now - Duration::days(AVERAGE_DAYS))?;
        Ok(Self::from_records(&records))
    }
}

fn alert(alert_type: &str, severity: Severity, message: String) -> Alert {
    Alert {
        alert_type: alert_type.to_string(),
        severity,
        message,
    }
}

/// Compare averages with thresholds and collect every rule that fires.
pub fn evaluate(avg: &Averages, t: &Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let (Some(sys), Some(dia)) = (avg.bp_systolic, avg.bp_diastolic)
        && (sys > t.bp_systolic_max || dia > t.bp_diastolic_max)
    {
        let crisis = sys >= CRISIS_SYSTOLIC || dia >= CRISIS_DIASTOLIC;
        let (severity, advice) = if crisis {
            (
                Severity::Critical,
                "Bitte suchen Sie umgehend ärztliche Hilfe auf.",
            )
        } else {
            (
                Severity::Warning,
                "Bitte lassen Sie Ihren Blutdruck ärztlich abklären.",
            )
        };
        alerts.push(alert(
            "high_blood_pressure",
            severity,
            format!(
                "Ihr Blutdruck ist erhöht (Ø {:.0}/{:.0} mmHg, Grenzwert {:.0}/{:.0}). {}",
                sys, dia, t.bp_systolic_max, t.bp_diastolic_max, advice
            ),
        ));
    }

    if let Some(hr) = avg.heart_rate {
        if hr > t.heart_rate_max {
            alerts.push(alert(
                "high_heart_rate",
                Severity::Warning,
                format!(
                    "Ihre Ruheherzfrequenz ist erhöht (Ø {:.0} bpm, Grenzwert {:.0}).",
                    hr, t.heart_rate_max
                ),
            ));
        } else if hr < t.heart_rate_min {
            alerts.push(alert(
                "low_heart_rate",
                Severity::Warning,
                format!(
                    "Ihre Herzfrequenz ist niedrig (Ø {:.0} bpm, Grenzwert {:.0}).",
                    hr, t.heart_rate_min
                ),
            ));
        }
    }

    if let Some(steps) = avg.steps
        && steps < t.steps_min
    {
        alerts.push(alert(
            "low_activity",
            Severity::Info,
            format!(
                "Sie bewegen sich wenig (Ø {:.0} Schritte, Ziel mindestens {:.0}).",
                steps, t.steps_min
            ),
        ));
    }

    if let Some(sleep) = avg.sleep_hours {
        if sleep < t.sleep_min {
            alerts.push(alert(
                "insufficient_sleep",
                Severity::Warning,
                format!(
                    "Sie schlafen zu wenig (Ø {:.1} h, empfohlen mindestens {:.1} h).",
                    sleep, t.sleep_min
                ),
            ));
        } else if sleep > t.sleep_max {
            alerts.push(alert(
                "excessive_sleep",
                Severity::Info,
                format!(
                    "Sie schlafen ungewöhnlich lange (Ø {:.1} h, Grenzwert {:.1} h).",
                    sleep, t.sleep_max
                ),
            ));
        }
    }

    if let Some(kcal) = avg.calories {
        if kcal > t.calories_max {
            alerts.push(alert(
                "high_calorie_intake",
                Severity::Info,
                format!(
                    "Ihre Kalorienaufnahme liegt über Ihrem Ziel (Ø {:.0} kcal, Grenzwert {:.0}).",
                    kcal, t.calories_max
                ),
            ));
        } else if kcal < t.calories_min {
            alerts.push(alert(
                "low_calorie_intake",
                Severity::Warning,
                format!(
                    "Ihre Kalorienaufnahme ist sehr niedrig (Ø {:.0} kcal, Minimum {:.0}).",
                    kcal, t.calories_min
                ),
            ));
        }
    }

    alerts
}

#[derive(Debug, Serialize)]
pub struct AlertReport {
    pub thresholds: Thresholds,
    pub averages: Averages,
    pub alerts: Vec<AlertRecord>,
}

/// Evaluate the user's recent averages and append every hit to the history.
pub fn generate(db: &Database, user: &User, now: DateTime<Utc>) -> Result<AlertReport> {
    let thresholds = Thresholds::for_user(user);
    let averages = Averages::recent(db, &user.id, now)?;
    let hits = evaluate(&averages, &thresholds);

    let mut stored = Vec::with_capacity(hits.len());
    for hit in &hits {
        let record = AlertRecord::from_alert(&user.id, hit);
        db.insert_alert(&record)?;
        stored.push(record);
    }

    Ok(AlertReport {
        thresholds,
        averages,
        alerts: stored,
    })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl FromStr for MealType {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            "snack" => Ok(Self::Snack),
            _ => anyhow::bail!(
                "invalid meal type: {} (expected breakfast/lunch/dinner/snack)",
                s
            ),
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakfast => write!(f, "breakfast"),
            Self::Lunch => write!(f, "lunch"),
            Self::Dinner => write!(f, "dinner"),
            Self::Snack => write!(f, "snack"),
        }
    }
}

/// The numeric measurements of one observation. Every field is optional;
/// a record carries whatever the user measured at that moment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vitals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_systolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp_diastolic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spo2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f64>,
}

impl Vitals {
    /// Field name and value of every numeric column, in storage order.
    pub fn fields(&self) -> [(&'static str, Option<f64>); 17] {
        [
            ("steps", self.steps),
            ("heart_rate", self.heart_rate),
            ("sleep_hours", self.sleep_hours),
            ("sleep_quality", self.sleep_quality),
            ("weight", self.weight),
            ("calories", self.calories),
            ("bp_systolic", self.bp_systolic),
            ("bp_diastolic", self.bp_diastolic),
            ("spo2", self.spo2),
            ("body_fat", self.body_fat),
            ("muscle_mass", self.muscle_mass),
            ("water_intake", self.water_intake),
            ("exercise_minutes", self.exercise_minutes),
            ("blood_glucose", self.blood_glucose),
            ("body_temperature", self.body_temperature),
            ("mood", self.mood),
            ("stress_level", self.stress_level),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_none())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub vitals: Vitals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HealthRecord {
    pub fn new(user_id: &str, vitals: Vitals) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            recorded_at: Utc::now(),
            vitals,
            medications: None,
            meal_type: None,
            notes: None,
        }
    }

    /// Build a record from validated input.
    pub fn from_input(user_id: &str, input: NewHealthRecord) -> Self {
        let mut record = Self::new(user_id, input.vitals);
        if let Some(ts) = input.recorded_at {
            record.recorded_at = ts;
        }
        record.medications = input.medications;
        record.meal_type = input.meal_type;
        record.notes = input.notes;
        record
    }
}

/// Request body for creating a record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHealthRecord {
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub vitals: Vitals,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Metrics that take part in trend analysis and averaging.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Steps,
    HeartRate,
    SleepHours,
    Weight,
    Calories,
    BpSystolic,
    BpDiastolic,
    Spo2,
}

impl MetricKind {
    pub const ALL: [MetricKind; 8] = [
        Self::Steps,
        Self::HeartRate,
        Self::SleepHours,
        Self::Weight,
        Self::Calories,
        Self::BpSystolic,
        Self::BpDiastolic,
        Self::Spo2,
    ];

    pub fn value(self, record: &HealthRecord) -> Option<f64> {
        let v = &record.vitals;
        match self {
            Self::Steps => v.steps,
            Self::HeartRate => v.heart_rate,
            Self::SleepHours => v.sleep_hours,
            Self::Weight => v.weight,
            Self::Calories => v.calories,
            Self::BpSystolic => v.bp_systolic,
            Self::BpDiastolic => v.bp_diastolic,
            Self::Spo2 => v.spo2,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::HeartRate => "bpm",
            Self::SleepHours => "hours",
            Self::Weight => "kg",
            Self::Calories => "kcal",
            Self::BpSystolic | Self::BpDiastolic => "mmHg",
            Self::Spo2 => "%",
        }
    }

    /// German display label used in generated texts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Steps => "Schritte",
            Self::HeartRate => "Herzfrequenz",
            Self::SleepHours => "Schlafdauer",
            Self::Weight => "Gewicht",
            Self::Calories => "Kalorienaufnahme",
            Self::BpSystolic => "Blutdruck (systolisch)",
            Self::BpDiastolic => "Blutdruck (diastolisch)",
            Self::Spo2 => "Sauerstoffsättigung",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Steps => "steps",
            Self::HeartRate => "heart_rate",
            Self::SleepHours => "sleep_hours",
            Self::Weight => "weight",
            Self::Calories => "calories",
            Self::BpSystolic => "bp_systolic",
            Self::BpDiastolic => "bp_diastolic",
            Self::Spo2 => "spo2",
        };
        write!(f, "{}", s)
    }
}

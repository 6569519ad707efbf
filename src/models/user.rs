use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl FromStr for ActivityLevel {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "sedentary" => Ok(Self::Sedentary),
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "active" => Ok(Self::Active),
            "very_active" => Ok(Self::VeryActive),
            _ => anyhow::bail!(
                "invalid activity level: {} (expected sedentary/light/moderate/active/very_active)",
                s
            ),
        }
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sedentary => write!(f, "sedentary"),
            Self::Light => write!(f, "light"),
            Self::Moderate => write!(f, "moderate"),
            Self::Active => write!(f, "active"),
            Self::VeryActive => write!(f, "very_active"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthGoal {
    LoseWeight,
    #[default]
    Maintain,
    GainMuscle,
    ImproveFitness,
}

impl FromStr for HealthGoal {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "lose_weight" => Ok(Self::LoseWeight),
            "maintain" => Ok(Self::Maintain),
            "gain_muscle" => Ok(Self::GainMuscle),
            "improve_fitness" => Ok(Self::ImproveFitness),
            _ => anyhow::bail!(
                "invalid goal: {} (expected lose_weight/maintain/gain_muscle/improve_fitness)",
                s
            ),
        }
    }
}

impl std::fmt::Display for HealthGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoseWeight => write!(f, "lose_weight"),
            Self::Maintain => write!(f, "maintain"),
            Self::GainMuscle => write!(f, "gain_muscle"),
            Self::ImproveFitness => write!(f, "improve_fitness"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<u16>,
    pub activity_level: ActivityLevel,
    pub goal: HealthGoal,
    /// Raw JSON object merged over the computed alert thresholds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_thresholds: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, name: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            password_hash,
            height_cm: None,
            birth_year: None,
            activity_level: ActivityLevel::default(),
            goal: HealthGoal::default(),
            alert_thresholds: None,
            created_at: Utc::now(),
        }
    }
}

/// Profile fields a user may change after registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub height_cm: Option<f64>,
    pub birth_year: Option<u16>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<HealthGoal>,
    /// Present-but-null clears the overrides, absent leaves them alone.
    #[serde(default, deserialize_with = "present")]
    pub alert_thresholds: Option<serde_json::Value>,
}

fn present<'de, D>(d: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(d).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

use serde::Serialize;

use crate::models::health::MetricKind;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TrendDirection {
    #[serde(rename = "steigend")]
    Rising,
    #[serde(rename = "fallend")]
    Falling,
    #[serde(rename = "stabil")]
    Stable,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rising => "steigend",
            Self::Falling => "fallend",
            Self::Stable => "stabil",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Window comparison for one numeric series.
#[derive(Debug, Clone, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub previous_avg: f64,
    pub recent_avg: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub metric: MetricKind,
    pub trend: TrendDirection,
    pub previous_avg: f64,
    pub recent_avg: f64,
    pub change_pct: f64,
    pub unit: &'static str,
    pub recommendation: &'static str,
}

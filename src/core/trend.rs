use anyhow::Result;

use crate::db::{Database, RecordQuery};
use crate::models::health::{HealthRecord, MetricKind};
use crate::models::insight::{Insight, Trend, TrendDirection};

/// Samples per comparison window.
pub const WINDOW: usize = 7;

/// Relative change (percent) that still counts as stable, inclusive.
pub const STABLE_BAND_PCT: f64 = 5.0;

/// Compare the two most recent adjacent windows of `values` (oldest first).
/// Returns `None` when fewer than `2 * window` samples exist.
pub fn compute_trend(values: &[f64], window: usize) -> Option<Trend> {
    if window == 0 || values.len() < 2 * window {
        return None;
    }
    let tail = &values[values.len() - 2 * window..];
    let (previous, recent) = tail.split_at(window);
    let previous_avg = mean(previous);
    let recent_avg = mean(recent);

    let change_pct = if previous_avg == 0.0 {
        if recent_avg == 0.0 { 0.0 } else { 100.0 * recent_avg.signum() }
    } else {
        (recent_avg - previous_avg) / previous_avg.abs() * 100.0
    };

    let direction = if change_pct > STABLE_BAND_PCT {
        TrendDirection::Rising
    } else if change_pct < -STABLE_BAND_PCT {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };

    Some(Trend {
        direction,
        previous_avg: round1(previous_avg),
        recent_avg: round1(recent_avg),
        change_pct: round1(change_pct),
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Canned advice per metric and direction.
pub fn recommendation(metric: MetricKind, direction: TrendDirection) -> &'static str {
    use MetricKind::*;
    use TrendDirection::*;
    match (metric, direction) {
        (Steps, Rising) => "Sehr gut, Sie bewegen sich mehr. Halten Sie dieses Aktivitätsniveau.",
        (Steps, Falling) => {
            "Ihre Schrittzahl sinkt. Planen Sie kurze Spaziergänge in Ihren Alltag ein."
        }
        (Steps, Stable) => {
            "Ihre Aktivität ist konstant. Ein kleines Tagesziel kann helfen, weiter zu steigern."
        }
        (HeartRate, Rising) => {
            "Ihre Herzfrequenz steigt. Achten Sie auf Erholung, Stress \
             und ausreichend Flüssigkeit."
        }
        (HeartRate, Falling) => "Ihre Herzfrequenz sinkt, oft ein Zeichen verbesserter Fitness.",
        (HeartRate, Stable) => "Ihre Herzfrequenz ist stabil.",
        (SleepHours, Rising) => {
            "Sie schlafen mehr. Regelmäßige Schlafzeiten unterstützen die Erholung."
        }
        (SleepHours, Falling) => {
            "Ihre Schlafdauer nimmt ab. Versuchen Sie, feste Schlafenszeiten einzuhalten."
        }
        (SleepHours, Stable) => "Ihr Schlafrhythmus ist gleichmäßig.",
        (Weight, Rising) => {
            "Ihr Gewicht steigt. Prüfen Sie Ernährung und Bewegung im Hinblick auf Ihr Ziel."
        }
        (Weight, Falling) => "Ihr Gewicht sinkt. Achten Sie auf eine ausgewogene Ernährung.",
        (Weight, Stable) => "Ihr Gewicht ist stabil.",
        (Calories, Rising) => "Ihre Kalorienaufnahme steigt. Achten Sie auf Portionsgrößen.",
        (Calories, Falling) => {
            "Ihre Kalorienaufnahme sinkt. Essen Sie dennoch ausreichend und nährstoffreich."
        }
        (Calories, Stable) => "Ihre Kalorienaufnahme ist gleichmäßig.",
        (BpSystolic | BpDiastolic, Rising) => {
            "Ihr Blutdruck steigt. Reduzieren Sie Salz, bewegen Sie sich regelmäßig \
             und sprechen Sie mit Ihrem Arzt."
        }
        (BpSystolic | BpDiastolic, Falling) => "Ihr Blutdruck sinkt. Weiter so.",
        (BpSystolic | BpDiastolic, Stable) => "Ihr Blutdruck ist stabil.",
        (Spo2, Rising) => "Ihre Sauerstoffsättigung verbessert sich.",
        (Spo2, Falling) => {
            "Ihre Sauerstoffsättigung sinkt. Bei Beschwerden lassen Sie dies ärztlich abklären."
        }
        (Spo2, Stable) => "Ihre Sauerstoffsättigung ist stabil.",
    }
}

/// Build one insight per metric that has enough history.
pub fn insights_from_records(records: &[HealthRecord]) -> Vec<Insight> {
    let mut out = Vec::new();
    for metric in MetricKind::ALL {
        let series: Vec<f64> = records.iter().filter_map(|r| metric.value(r)).collect();
        let Some(trend) = compute_trend(&series, WINDOW) else {
            continue;
        };
        out.push(Insight {
            metric,
            trend: trend.direction,
            previous_avg: trend.previous_avg,
            recent_avg: trend.recent_avg,
            change_pct: trend.change_pct,
            unit: metric.unit(),
            recommendation: recommendation(metric, trend.direction),
        });
    }
    out
}

/// Records scanned for insights per user; enough for every metric to fill
/// two windows when logged at least once a day.
const HISTORY_LIMIT: u32 = 365;

pub fn compute_insights(db: &Database, user_id: &str) -> Result<Vec<Insight>> {
    let records = db.query_records(
        user_id,
        &RecordQuery {
            limit: Some(HISTORY_LIMIT),
            ..Default::default()
        },
    )?;
    Ok(insights_from_records(&records))
}

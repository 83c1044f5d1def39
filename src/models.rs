use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SquadPulseError};

/// Squad member as supplied by the roster service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: String,
    pub jersey_number: u16,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// GPS-derived movement figures for one snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementMetrics {
    /// Total distance covered in meters
    pub total_distance: f64,

    /// Distance covered above sprint threshold in meters
    pub sprint_distance: f64,

    /// Maximum speed in km/h
    pub max_speed: f64,

    /// Average speed in km/h
    pub average_speed: f64,

    /// Number of sprint efforts
    pub sprint_count: u32,
}

/// Heart-rate and intensity figures for one snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Maximum heart rate in bpm
    pub max_heart_rate: u16,

    /// Average heart rate in bpm
    pub average_heart_rate: u16,

    /// Session intensity on a 0-10 scale
    pub intensity_score: f64,

    /// Work rate as a percentage (0-100)
    pub work_rate: f64,
}

/// Workload figures used by the load/readiness classifier
///
/// Both values are optional on the wire. An absent value is reported as a
/// missing metric by the classifier instead of being compared as NaN.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMetrics {
    /// Acute:chronic workload ratio
    #[serde(default)]
    pub acute_chronic_ratio: Option<f64>,

    /// Readiness on a 0-10 scale
    #[serde(default)]
    pub readiness_score: Option<f64>,
}

/// Point-in-time metrics snapshot for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMetrics {
    pub player_id: String,

    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub movement: MovementMetrics,

    #[serde(default)]
    pub performance: PerformanceMetrics,

    #[serde(default)]
    pub load: LoadMetrics,
}

impl PlayerMetrics {
    /// Check the snapshot invariants
    ///
    /// Averages may not exceed their maxima, sprint distance may not exceed
    /// total distance, and movement figures must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let m = &self.movement;
        for (name, value) in [
            ("totalDistance", m.total_distance),
            ("sprintDistance", m.sprint_distance),
            ("maxSpeed", m.max_speed),
            ("averageSpeed", m.average_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SquadPulseError::Validation(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if m.sprint_distance > m.total_distance {
            return Err(SquadPulseError::Validation(format!(
                "sprintDistance {} exceeds totalDistance {}",
                m.sprint_distance, m.total_distance
            )));
        }

        if m.average_speed > m.max_speed {
            return Err(SquadPulseError::Validation(format!(
                "averageSpeed {} exceeds maxSpeed {}",
                m.average_speed, m.max_speed
            )));
        }

        let p = &self.performance;
        if p.average_heart_rate > p.max_heart_rate {
            return Err(SquadPulseError::Validation(format!(
                "averageHeartRate {} exceeds maxHeartRate {}",
                p.average_heart_rate, p.max_heart_rate
            )));
        }

        Ok(())
    }
}

/// Most recent snapshot of a chronologically ordered sequence
pub fn latest_snapshot(history: &[PlayerMetrics]) -> Option<&PlayerMetrics> {
    history.last()
}

/// Display-agnostic severity class shared by every tier in the crate
///
/// Variants are ordered from least to most severe, with `Info` used for
/// advisory blocks that carry no risk judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    Info,
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
}

impl SeverityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityClass::Info => "info",
            SeverityClass::Green => "green",
            SeverityClass::Blue => "blue",
            SeverityClass::Yellow => "yellow",
            SeverityClass::Orange => "orange",
            SeverityClass::Red => "red",
        }
    }
}

impl fmt::Display for SeverityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::snapshot;
    use super::*;

    #[test]
    fn test_valid_snapshot() {
        assert!(snapshot(Some(1.1), Some(8.0)).validate().is_ok());
    }

    #[test]
    fn test_sprint_distance_exceeds_total() {
        let mut metrics = snapshot(Some(1.1), Some(8.0));
        metrics.movement.sprint_distance = 10_000.0;
        let err = metrics.validate().unwrap_err();
        assert!(err.to_string().contains("sprintDistance"));
    }

    #[test]
    fn test_average_heart_rate_exceeds_max() {
        let mut metrics = snapshot(Some(1.1), Some(8.0));
        metrics.performance.average_heart_rate = 200;
        assert!(matches!(
            metrics.validate(),
            Err(SquadPulseError::Validation(_))
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let mut metrics = snapshot(Some(1.1), Some(8.0));
        metrics.movement.average_speed = -1.0;
        assert!(metrics.validate().is_err());
    }

    #[test]
    fn test_latest_snapshot_is_last_element() {
        let mut first = snapshot(Some(1.0), Some(7.0));
        first.session_id = Some("s1".to_string());
        let mut second = snapshot(Some(1.4), Some(5.0));
        second.session_id = Some("s2".to_string());

        let history = vec![first, second];
        let latest = latest_snapshot(&history).unwrap();
        assert_eq!(latest.session_id.as_deref(), Some("s2"));
        assert!(latest_snapshot(&[]).is_none());
    }

    #[test]
    fn test_deserialize_camel_case_with_missing_load() {
        let json = r#"{
            "playerId": "p7",
            "movement": {"totalDistance": 950, "sprintDistance": 50, "maxSpeed": 28.0,
                         "averageSpeed": 7.0, "sprintCount": 4},
            "performance": {"maxHeartRate": 180, "averageHeartRate": 150,
                            "intensityScore": 6.0, "workRate": 70.0},
            "load": {"readinessScore": 7.5}
        }"#;
        let metrics: PlayerMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.player_id, "p7");
        assert_eq!(metrics.load.acute_chronic_ratio, None);
        assert_eq!(metrics.load.readiness_score, Some(7.5));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(SeverityClass::Red > SeverityClass::Orange);
        assert!(SeverityClass::Yellow > SeverityClass::Green);
        assert_eq!(SeverityClass::Blue.to_string(), "blue");
    }
}

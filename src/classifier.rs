//! Load and readiness classification
//!
//! Maps the workload figures of a single metrics snapshot into severity
//! classes, an optional alert banner and recovery recommendations.
//!
//! # Sports Science Background
//!
//! The acute:chronic workload ratio compares the most recent training load
//! with the longer-term average. Ratios between roughly 0.8 and 1.3 are
//! usually considered the "sweet spot"; higher ratios correlate with
//! elevated soft-tissue injury risk.
//!
//! Two independent banding schemes are applied to the same ratio:
//!
//! - **Severity colour**: `<= 1.2` normal, `(1.2, 1.5]` elevated, `> 1.5` severe
//! - **Recommendation**: `<= 1.2` low risk, `(1.2, 1.3]` moderate risk, `> 1.3` high risk
//!
//! The alert banner follows the recommendation threshold (`> 1.3`), not the
//! colour bands. A ratio of 1.4 is therefore shown in yellow while the banner
//! and a "High Risk" recommendation are raised at the same time.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{Result, SquadPulseError};
use crate::format::format_ratio;
use crate::models::{PlayerMetrics, SeverityClass};

/// Upper bound (inclusive) of the normal injury-risk colour band
pub const RISK_NORMAL_MAX: f64 = 1.2;
/// Upper bound (inclusive) of the elevated injury-risk colour band
pub const RISK_ELEVATED_MAX: f64 = 1.5;
/// Ratio above which the alert banner and the high-risk recommendation fire
pub const RISK_ALERT_THRESHOLD: f64 = 1.3;
/// Upper bound (inclusive) of the low-risk recommendation band
pub const RECOMMENDATION_LOW_MAX: f64 = 1.2;

/// Readiness at or above this score is green
pub const READINESS_READY_MIN: f64 = 8.0;
/// Readiness at or above this score (and below ready) is yellow
pub const READINESS_MODERATE_MIN: f64 = 6.0;

pub const ACUTE_CHRONIC_RATIO: &str = "acuteChronicRatio";
pub const READINESS_SCORE: &str = "readinessScore";

/// Injury-risk severity derived from the acute:chronic ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjuryRiskSeverity {
    /// Ratio <= 1.2
    Normal,
    /// 1.2 < ratio <= 1.5
    Elevated,
    /// Ratio > 1.5
    Severe,
}

impl InjuryRiskSeverity {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > RISK_ELEVATED_MAX {
            InjuryRiskSeverity::Severe
        } else if ratio > RISK_NORMAL_MAX {
            InjuryRiskSeverity::Elevated
        } else {
            InjuryRiskSeverity::Normal
        }
    }

    pub fn class(&self) -> SeverityClass {
        match self {
            InjuryRiskSeverity::Normal => SeverityClass::Green,
            InjuryRiskSeverity::Elevated => SeverityClass::Yellow,
            InjuryRiskSeverity::Severe => SeverityClass::Red,
        }
    }
}

impl fmt::Display for InjuryRiskSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjuryRiskSeverity::Normal => write!(f, "NORMAL"),
            InjuryRiskSeverity::Elevated => write!(f, "ELEVATED"),
            InjuryRiskSeverity::Severe => write!(f, "SEVERE"),
        }
    }
}

/// Readiness tier derived from the 0-10 readiness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    /// Score >= 8
    Ready,
    /// 6 <= score < 8
    Moderate,
    /// Score < 6
    Low,
}

impl ReadinessLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= READINESS_READY_MIN {
            ReadinessLevel::Ready
        } else if score >= READINESS_MODERATE_MIN {
            ReadinessLevel::Moderate
        } else {
            ReadinessLevel::Low
        }
    }

    pub fn class(&self) -> SeverityClass {
        match self {
            ReadinessLevel::Ready => SeverityClass::Green,
            ReadinessLevel::Moderate => SeverityClass::Yellow,
            ReadinessLevel::Low => SeverityClass::Red,
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessLevel::Ready => write!(f, "Ready"),
            ReadinessLevel::Moderate => write!(f, "Moderate"),
            ReadinessLevel::Low => write!(f, "Low"),
        }
    }
}

/// Load-management recommendation band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRecommendation {
    LowRisk,
    ModerateRisk,
    HighRisk,
}

impl RiskRecommendation {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > RISK_ALERT_THRESHOLD {
            RiskRecommendation::HighRisk
        } else if ratio > RECOMMENDATION_LOW_MAX {
            RiskRecommendation::ModerateRisk
        } else {
            RiskRecommendation::LowRisk
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RiskRecommendation::LowRisk => "Low Risk",
            RiskRecommendation::ModerateRisk => "Moderate Risk",
            RiskRecommendation::HighRisk => "High Risk",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            RiskRecommendation::LowRisk => "Training load is well managed",
            RiskRecommendation::ModerateRisk => "Monitor closely, consider light training",
            RiskRecommendation::HighRisk => "Reduce training load by 20-30%",
        }
    }

    pub fn class(&self) -> SeverityClass {
        match self {
            RiskRecommendation::LowRisk => SeverityClass::Green,
            RiskRecommendation::ModerateRisk => SeverityClass::Yellow,
            RiskRecommendation::HighRisk => SeverityClass::Red,
        }
    }

    pub fn advisory(&self) -> Advisory {
        Advisory::new(self.title(), self.detail(), self.class())
    }
}

/// A titled block of advisory text with its severity class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub title: String,
    pub detail: String,
    pub severity: SeverityClass,
}

impl Advisory {
    pub fn new(title: impl Into<String>, detail: impl Into<String>, severity: SeverityClass) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            severity,
        }
    }
}

/// Classification of one metrics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAssessment {
    pub player_id: String,
    pub acute_chronic_ratio: f64,
    pub readiness_score: f64,
    pub injury_risk: InjuryRiskSeverity,
    pub readiness: ReadinessLevel,

    /// Injury-risk banner, present only when the ratio exceeds 1.3
    pub alert: Option<Advisory>,

    /// Ratio-band recommendation; always present
    pub recommendation: RiskRecommendation,

    /// Recovery-focus advisory, present only when readiness is below 6
    pub recovery_focus: Option<Advisory>,
}

impl LoadAssessment {
    /// All recommendation blocks in display order
    ///
    /// The ratio-band block comes first, followed by the recovery-focus
    /// block when it applies. Both may be present at once.
    pub fn recommendations(&self) -> Vec<Advisory> {
        let mut blocks = vec![self.recommendation.advisory()];
        if let Some(focus) = &self.recovery_focus {
            blocks.push(focus.clone());
        }
        blocks
    }
}

/// Load and readiness classifier
pub struct LoadClassifier;

impl LoadClassifier {
    /// Classify a metrics snapshot
    ///
    /// Fails with [`SquadPulseError::MissingMetric`] when the acute:chronic
    /// ratio or the readiness score is absent or non-finite. No tier is
    /// guessed in that case.
    pub fn classify(metrics: &PlayerMetrics) -> Result<LoadAssessment> {
        let ratio = Self::require(ACUTE_CHRONIC_RATIO, metrics.load.acute_chronic_ratio)?;
        let readiness = Self::require(READINESS_SCORE, metrics.load.readiness_score)?;

        let assessment = LoadAssessment {
            player_id: metrics.player_id.clone(),
            acute_chronic_ratio: ratio,
            readiness_score: readiness,
            injury_risk: InjuryRiskSeverity::from_ratio(ratio),
            readiness: ReadinessLevel::from_score(readiness),
            alert: Self::alert_banner(ratio),
            recommendation: RiskRecommendation::from_ratio(ratio),
            recovery_focus: Self::recovery_focus(readiness),
        };

        debug!(
            player_id = %assessment.player_id,
            ratio,
            readiness,
            injury_risk = %assessment.injury_risk,
            readiness_level = %assessment.readiness,
            alert = assessment.alert.is_some(),
            "Classified load snapshot"
        );

        Ok(assessment)
    }

    /// Injury-risk alert banner, raised when the ratio exceeds 1.3
    pub fn alert_banner(ratio: f64) -> Option<Advisory> {
        if ratio > RISK_ALERT_THRESHOLD {
            Some(Advisory::new(
                "Injury Risk Alert",
                format!(
                    "Acute:Chronic workload ratio is {}, indicating elevated injury risk. Consider load management.",
                    format_ratio(ratio)
                ),
                SeverityClass::Yellow,
            ))
        } else {
            None
        }
    }

    /// Recovery-focus advisory, raised when readiness is below 6
    pub fn recovery_focus(readiness: f64) -> Option<Advisory> {
        if readiness < READINESS_MODERATE_MIN {
            Some(Advisory::new(
                "Recovery Focus",
                "Prioritize sleep, nutrition, and active recovery",
                SeverityClass::Info,
            ))
        } else {
            None
        }
    }

    fn require(metric: &str, value: Option<f64>) -> Result<f64> {
        match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(SquadPulseError::missing_metric(metric)),
        }
    }
}

//! Prediction interpretation
//!
//! Turns ML prediction records into a display-agnostic [`InterpretationResult`]:
//! tier label, severity class, confidence percentage and ordered advisory
//! sections. Interpretation is total. Unknown type tags and malformed payloads
//! degrade to generic or defaulted results instead of failing.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::format::{
    clamp_progress, confidence_percent, format_fraction_percent, format_target_value,
    humanize_metric_key,
};
use crate::models::SeverityClass;
use crate::prediction::{
    FatigueCategory, FatigueOutput, InjuryRiskOutput, MlPrediction, PerformanceOutput,
    PredictionPayload, Priority, RiskLevel,
};

impl RiskLevel {
    pub fn class(&self) -> SeverityClass {
        match self {
            RiskLevel::High => SeverityClass::Red,
            RiskLevel::Moderate => SeverityClass::Yellow,
            RiskLevel::Low => SeverityClass::Blue,
            RiskLevel::Minimal => SeverityClass::Green,
        }
    }
}

impl Priority {
    pub fn class(&self) -> SeverityClass {
        match self {
            Priority::High => SeverityClass::Red,
            Priority::Medium => SeverityClass::Yellow,
            Priority::Low => SeverityClass::Green,
        }
    }
}

impl FatigueCategory {
    pub fn class(&self) -> SeverityClass {
        match self {
            FatigueCategory::Severe => SeverityClass::Red,
            FatigueCategory::High => SeverityClass::Orange,
            FatigueCategory::Moderate => SeverityClass::Yellow,
            FatigueCategory::Low => SeverityClass::Green,
        }
    }
}

/// Which interpretation produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultKind {
    InjuryRisk,
    PerformanceOptimization,
    Fatigue,
    /// Carries the raw type tag that had no interpretation
    Unrecognized(String),
}

/// Ordered list of advisory lines under a heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorySection {
    pub heading: String,
    pub items: Vec<String>,
}

/// Humanized performance target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMetric {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Display-ready interpretation of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationResult {
    pub prediction_id: String,
    pub kind: ResultKind,
    pub title: String,

    /// Tier label such as `HIGH` or `MODERATE`; `None` for unrecognized types
    pub tier: Option<String>,

    pub severity: SeverityClass,

    /// `round(confidence * 100)` after clamping to [0,1]
    pub confidence_percent: u8,

    /// Tier with its percentage, e.g. `HIGH (72.0%)`
    pub headline: Option<String>,

    /// Bounded progress indicator in [0,100]
    pub progress: Option<f64>,

    /// Advisory sections in payload order; lists keep their input order
    pub sections: Vec<AdvisorySection>,

    pub targets: Vec<TargetMetric>,

    pub estimated_recovery_time: Option<String>,
}

impl InterpretationResult {
    pub fn confidence_label(&self) -> String {
        format!("{}% confidence", self.confidence_percent)
    }

    pub fn section(&self, heading: &str) -> Option<&AdvisorySection> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    fn base(prediction: &MlPrediction, kind: ResultKind, title: impl Into<String>) -> Self {
        Self {
            prediction_id: prediction.id.clone(),
            kind,
            title: title.into(),
            tier: None,
            severity: SeverityClass::Info,
            confidence_percent: confidence_percent(prediction.confidence),
            headline: None,
            progress: None,
            sections: Vec::new(),
            targets: Vec::new(),
            estimated_recovery_time: None,
        }
    }

    fn push_section(&mut self, heading: &str, items: &[String]) {
        self.sections.push(AdvisorySection {
            heading: heading.to_string(),
            items: items.to_vec(),
        });
    }
}

pub const KEY_RISK_FACTORS: &str = "Key Risk Factors";
pub const RECOMMENDATIONS: &str = "Recommendations";
pub const TRAINING_FOCUS: &str = "Training Focus";
pub const IMMEDIATE_ACTIONS: &str = "Immediate Actions";
pub const RECOVERY_PROTOCOLS: &str = "Recovery Protocols";
pub const KEY_INDICATORS: &str = "Key Indicators";

/// ML prediction interpreter
pub struct PredictionInterpreter;

impl PredictionInterpreter {
    /// Interpret a single prediction
    pub fn interpret(prediction: &MlPrediction) -> InterpretationResult {
        if !(0.0..=1.0).contains(&prediction.confidence) {
            warn!(
                prediction_id = %prediction.id,
                confidence = prediction.confidence,
                "Confidence outside [0,1], clamping"
            );
        }

        let result = match prediction.payload() {
            PredictionPayload::InjuryRisk(output) => Self::injury_risk(prediction, &output),
            PredictionPayload::PerformanceOptimization(output) => {
                Self::performance(prediction, &output)
            }
            PredictionPayload::Fatigue(output) => Self::fatigue(prediction, &output),
            PredictionPayload::Unrecognized { type_tag } => {
                debug!(prediction_id = %prediction.id, type_tag = %type_tag, "Unrecognized prediction type");
                InterpretationResult::base(
                    prediction,
                    ResultKind::Unrecognized(type_tag.clone()),
                    format!("Unknown prediction type: {}", type_tag),
                )
            }
        };

        debug!(
            prediction_id = %result.prediction_id,
            kind = ?result.kind,
            tier = ?result.tier,
            severity = %result.severity,
            "Interpreted prediction"
        );

        result
    }

    /// Interpret a sequence of predictions, preserving its order
    pub fn interpret_all(predictions: &[MlPrediction]) -> Vec<InterpretationResult> {
        predictions.iter().map(Self::interpret).collect()
    }

    fn injury_risk(prediction: &MlPrediction, output: &InjuryRiskOutput) -> InterpretationResult {
        let level = output.risk_level.unwrap_or_default();
        let risk = output.injury_risk.unwrap_or(0.0);

        let mut result =
            InterpretationResult::base(prediction, ResultKind::InjuryRisk, "Injury Risk Assessment");
        result.tier = Some(level.to_string());
        result.severity = level.class();
        result.headline = Some(format!("{} ({})", level, format_fraction_percent(risk)));
        result.push_section(KEY_RISK_FACTORS, &output.key_factors);
        result.push_section(RECOMMENDATIONS, &output.recommendations);
        result
    }

    fn performance(prediction: &MlPrediction, output: &PerformanceOutput) -> InterpretationResult {
        let priority = output.priority.unwrap_or_default();

        let mut result = InterpretationResult::base(
            prediction,
            ResultKind::PerformanceOptimization,
            "Performance Optimization",
        );
        result.tier = Some(priority.to_string());
        result.severity = priority.class();
        result.headline = Some(priority.to_string());
        result.push_section(TRAINING_FOCUS, &output.training_focus);
        result.push_section(RECOMMENDATIONS, &output.recommendations);

        if let Some(targets) = &output.target_metrics {
            result.targets = targets
                .iter()
                .map(|(key, value)| TargetMetric {
                    key: key.clone(),
                    label: humanize_metric_key(key),
                    value: format_target_value(value),
                })
                .collect();
        }

        result
    }

    fn fatigue(prediction: &MlPrediction, output: &FatigueOutput) -> InterpretationResult {
        let category = output.fatigue_category.unwrap_or_default();
        let level = output.fatigue_level.unwrap_or(0.0);

        let mut result =
            InterpretationResult::base(prediction, ResultKind::Fatigue, "Fatigue Detection");
        result.tier = Some(category.to_string());
        result.severity = category.class();
        result.headline = Some(format!("{} ({})", category, format_fraction_percent(level)));
        result.progress = Some(clamp_progress(level * 100.0));
        result.push_section(IMMEDIATE_ACTIONS, &output.immediate_actions);
        result.push_section(RECOVERY_PROTOCOLS, &output.recovery_protocols);
        if !output.key_indicators.is_empty() {
            result.push_section(KEY_INDICATORS, &output.key_indicators);
        }
        result.estimated_recovery_time = output.estimated_recovery_time.clone();
        result
    }
}

//! ML prediction records and their typed payloads
//!
//! The prediction service delivers an untyped `output` object whose shape
//! depends on the `type` tag. [`PredictionPayload::decode`] turns that pair
//! into a closed sum type with one strongly-typed variant per known
//! prediction type and a fallback variant that keeps the raw tag.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

pub const INJURY_RISK_TAG: &str = "INJURY_RISK";
pub const PERFORMANCE_DECLINE_TAG: &str = "PERFORMANCE_DECLINE";
pub const FATIGUE_LEVEL_TAG: &str = "FATIGUE_LEVEL";

/// Prediction record as produced by the ML prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlPrediction {
    pub id: String,
    pub player_id: String,

    #[serde(default)]
    pub session_id: Option<String>,

    /// Model that produced the prediction
    #[serde(default)]
    pub model_id: Option<String>,

    /// Raw type tag, e.g. `INJURY_RISK`
    #[serde(rename = "type")]
    pub prediction_type: String,

    /// Untyped payload, shape determined by `prediction_type`
    #[serde(default)]
    pub output: Value,

    /// Model confidence in [0,1]
    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub predicted_at: Option<NaiveDateTime>,

    /// Marks records stored for model validation
    #[serde(default)]
    pub is_actual: bool,
}

impl MlPrediction {
    pub fn kind(&self) -> PredictionType {
        PredictionType::from_tag(&self.prediction_type)
    }

    pub fn payload(&self) -> PredictionPayload {
        PredictionPayload::decode(&self.prediction_type, &self.output)
    }
}

/// Prediction types with an interpretation
///
/// Tags outside this set (including the upstream `OPTIMAL_POSITION`,
/// `RECOVERY_TIME` and `TACTICAL_RECOMMENDATION` types) are kept verbatim in
/// `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredictionType {
    InjuryRisk,
    PerformanceDecline,
    FatigueLevel,
    Other(String),
}

impl PredictionType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            INJURY_RISK_TAG => PredictionType::InjuryRisk,
            PERFORMANCE_DECLINE_TAG => PredictionType::PerformanceDecline,
            FATIGUE_LEVEL_TAG => PredictionType::FatigueLevel,
            other => PredictionType::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            PredictionType::InjuryRisk => INJURY_RISK_TAG,
            PredictionType::PerformanceDecline => PERFORMANCE_DECLINE_TAG,
            PredictionType::FatigueLevel => FATIGUE_LEVEL_TAG,
            PredictionType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for PredictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Injury risk tier reported by the model; unknown tags collapse to `Minimal`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
    #[default]
    #[serde(other)]
    Minimal,
}

/// Performance optimization priority; unknown tags collapse to `Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    #[default]
    #[serde(other)]
    Low,
}

/// Fatigue tier; unknown tags collapse to `Low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FatigueCategory {
    Severe,
    High,
    Moderate,
    #[default]
    #[serde(other)]
    Low,
}

macro_rules! impl_tag_display {
    ($ty:ty { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($label),)+
                }
            }
        }
    };
}

impl_tag_display!(RiskLevel { High => "HIGH", Moderate => "MODERATE", Low => "LOW", Minimal => "MINIMAL" });
impl_tag_display!(Priority { High => "HIGH", Medium => "MEDIUM", Low => "LOW" });
impl_tag_display!(FatigueCategory { Severe => "SEVERE", High => "HIGH", Moderate => "MODERATE", Low => "LOW" });

/// `INJURY_RISK` payload
///
/// Every field decodes on its own, so one mistyped field never hides its
/// siblings. A field of the wrong type is dropped with a warning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InjuryRiskOutput {
    #[serde(deserialize_with = "lenient")]
    pub risk_level: Option<RiskLevel>,

    /// Injury probability in [0,1]
    #[serde(deserialize_with = "lenient")]
    pub injury_risk: Option<f64>,

    #[serde(deserialize_with = "lenient_list")]
    pub key_factors: Vec<String>,

    #[serde(deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,
}

/// `PERFORMANCE_DECLINE` payload (performance optimization)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceOutput {
    #[serde(deserialize_with = "lenient")]
    pub priority: Option<Priority>,

    #[serde(deserialize_with = "lenient_list")]
    pub training_focus: Vec<String>,

    #[serde(deserialize_with = "lenient_list")]
    pub recommendations: Vec<String>,

    /// Target name to target value, in the order supplied
    #[serde(deserialize_with = "lenient")]
    pub target_metrics: Option<Map<String, Value>>,
}

/// `FATIGUE_LEVEL` payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FatigueOutput {
    #[serde(deserialize_with = "lenient")]
    pub fatigue_category: Option<FatigueCategory>,

    /// Fatigue level in [0,1]
    #[serde(deserialize_with = "lenient")]
    pub fatigue_level: Option<f64>,

    #[serde(deserialize_with = "lenient_list")]
    pub immediate_actions: Vec<String>,

    #[serde(deserialize_with = "lenient_list")]
    pub recovery_protocols: Vec<String>,

    #[serde(deserialize_with = "lenient")]
    pub estimated_recovery_time: Option<String>,

    #[serde(deserialize_with = "lenient_list")]
    pub key_indicators: Vec<String>,
}

/// Decode one optional field; null and wrongly typed values become `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }

    match T::deserialize(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(value = %raw, error = %e, "Ignoring malformed prediction field");
            Ok(None)
        }
    }
}

/// Decode a list of strings; null becomes empty and non-string items are skipped
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                other => {
                    warn!(item = %other, "Skipping non-text prediction list item");
                    None
                }
            })
            .collect()),
        other => {
            warn!(value = %other, "Ignoring malformed prediction list");
            Ok(Vec::new())
        }
    }
}

/// Typed prediction payload
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionPayload {
    InjuryRisk(InjuryRiskOutput),
    PerformanceOptimization(PerformanceOutput),
    Fatigue(FatigueOutput),
    /// Tag outside the interpreted set, kept verbatim
    Unrecognized { type_tag: String },
}

impl PredictionPayload {
    /// Decode an untyped output object according to its type tag
    ///
    /// Fields are decoded independently. An output that is not an object at
    /// all decodes to that type's defaults and logs a warning. Decoding never
    /// fails.
    pub fn decode(type_tag: &str, output: &Value) -> Self {
        match PredictionType::from_tag(type_tag) {
            PredictionType::InjuryRisk => {
                PredictionPayload::InjuryRisk(decode_or_default(type_tag, output))
            }
            PredictionType::PerformanceDecline => {
                PredictionPayload::PerformanceOptimization(decode_or_default(type_tag, output))
            }
            PredictionType::FatigueLevel => {
                PredictionPayload::Fatigue(decode_or_default(type_tag, output))
            }
            PredictionType::Other(tag) => PredictionPayload::Unrecognized { type_tag: tag },
        }
    }
}

fn decode_or_default<T>(type_tag: &str, output: &Value) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    if output.is_null() {
        return T::default();
    }

    match T::deserialize(output) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(
                prediction_type = type_tag,
                error = %e,
                "Malformed prediction output, using defaults"
            );
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prediction_type_tags() {
        assert_eq!(PredictionType::from_tag("INJURY_RISK"), PredictionType::InjuryRisk);
        assert_eq!(
            PredictionType::from_tag("PERFORMANCE_DECLINE"),
            PredictionType::PerformanceDecline
        );
        assert_eq!(PredictionType::from_tag("FATIGUE_LEVEL"), PredictionType::FatigueLevel);
        assert_eq!(
            PredictionType::from_tag("TACTICAL_RECOMMENDATION"),
            PredictionType::Other("TACTICAL_RECOMMENDATION".to_string())
        );
        assert_eq!(PredictionType::from_tag("FOO").to_string(), "FOO");
    }

    #[test]
    fn test_decode_injury_risk() {
        let output = json!({
            "riskLevel": "HIGH",
            "injuryRisk": 0.78,
            "keyFactors": ["High acute:chronic ratio", "Reduced recovery days"],
            "recommendations": ["Reduce sprint volume"]
        });

        match PredictionPayload::decode("INJURY_RISK", &output) {
            PredictionPayload::InjuryRisk(out) => {
                assert_eq!(out.risk_level, Some(RiskLevel::High));
                assert_eq!(out.injury_risk, Some(0.78));
                assert_eq!(out.key_factors.len(), 2);
                assert_eq!(out.recommendations, vec!["Reduce sprint volume"]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_level_tags_fall_back_to_least_severe() {
        let out: InjuryRiskOutput = serde_json::from_value(json!({"riskLevel": "EXTREME"})).unwrap();
        assert_eq!(out.risk_level, Some(RiskLevel::Minimal));

        let out: PerformanceOutput = serde_json::from_value(json!({"priority": "URGENT"})).unwrap();
        assert_eq!(out.priority, Some(Priority::Low));

        let out: FatigueOutput =
            serde_json::from_value(json!({"fatigueCategory": "EXHAUSTED"})).unwrap();
        assert_eq!(out.fatigue_category, Some(FatigueCategory::Low));
    }

    #[test]
    fn test_null_and_missing_lists_are_empty() {
        let out: FatigueOutput = serde_json::from_value(json!({
            "fatigueLevel": 0.4,
            "immediateActions": null
        }))
        .unwrap();
        assert!(out.immediate_actions.is_empty());
        assert!(out.recovery_protocols.is_empty());
        assert!(out.estimated_recovery_time.is_none());
    }

    #[test]
    fn test_target_metrics_keep_input_order() {
        let output = json!({
            "targetMetrics": {"targetWorkRate": 88.0, "targetMaxSpeed": 32.5, "targetIntensity": 8.1}
        });
        let out: PerformanceOutput = serde_json::from_value(output).unwrap();
        let keys: Vec<&String> = out.target_metrics.as_ref().unwrap().keys().collect();
        assert_eq!(keys, vec!["targetWorkRate", "targetMaxSpeed", "targetIntensity"]);
    }

    #[test]
    fn test_non_object_payload_uses_defaults() {
        assert_eq!(
            PredictionPayload::decode("FATIGUE_LEVEL", &json!("very tired")),
            PredictionPayload::Fatigue(FatigueOutput::default())
        );

        assert_eq!(
            PredictionPayload::decode("INJURY_RISK", &Value::Null),
            PredictionPayload::InjuryRisk(InjuryRiskOutput::default())
        );
    }

    #[test]
    fn test_mistyped_field_keeps_valid_siblings() {
        let output = json!({
            "riskLevel": "HIGH",
            "injuryRisk": 0.82,
            "keyFactors": ["Load spike", 3],
            "recommendations": ["Rest"]
        });
        match PredictionPayload::decode("INJURY_RISK", &output) {
            PredictionPayload::InjuryRisk(out) => {
                assert_eq!(out.risk_level, Some(RiskLevel::High));
                assert_eq!(out.injury_risk, Some(0.82));
                assert_eq!(out.key_factors, vec!["Load spike"]);
                assert_eq!(out.recommendations, vec!["Rest"]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let output = json!({
            "fatigueCategory": "SEVERE",
            "fatigueLevel": "very tired",
            "immediateActions": "rest",
            "estimatedRecoveryTime": 48
        });
        match PredictionPayload::decode("FATIGUE_LEVEL", &output) {
            PredictionPayload::Fatigue(out) => {
                assert_eq!(out.fatigue_category, Some(FatigueCategory::Severe));
                assert!(out.fatigue_level.is_none());
                assert!(out.immediate_actions.is_empty());
                assert!(out.estimated_recovery_time.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }

        let output = json!({"priority": 7, "trainingFocus": ["Speed"], "targetMetrics": [1, 2]});
        match PredictionPayload::decode("PERFORMANCE_DECLINE", &output) {
            PredictionPayload::PerformanceOptimization(out) => {
                assert!(out.priority.is_none());
                assert_eq!(out.training_focus, vec!["Speed"]);
                assert!(out.target_metrics.is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_payload_keeps_tag() {
        assert_eq!(
            PredictionPayload::decode("FOO", &json!({"anything": 1})),
            PredictionPayload::Unrecognized {
                type_tag: "FOO".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize_prediction_record() {
        let json = r#"{
            "id": "pred-1",
            "playerId": "p1",
            "sessionId": "session_001",
            "modelId": "injury-v2",
            "type": "FATIGUE_LEVEL",
            "output": {"fatigueCategory": "HIGH", "fatigueLevel": 0.65},
            "confidence": 0.81,
            "predictedAt": "2024-05-01T10:15:30",
            "isActual": false
        }"#;
        let prediction: MlPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(prediction.kind(), PredictionType::FatigueLevel);
        assert_eq!(prediction.model_id.as_deref(), Some("injury-v2"));
        assert!(prediction.predicted_at.is_some());
        assert!(matches!(prediction.payload(), PredictionPayload::Fatigue(_)));
    }
}

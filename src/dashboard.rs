//! Dashboard operations wiring upstream data into the classifier and the
//! interpreter.
//!
//! Upstream failures propagate unchanged. The view state (selected player,
//! prediction history) is passed in and handed back explicitly.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::{LoadAssessment, LoadClassifier};
use crate::error::Result;
use crate::history::PredictionHistory;
use crate::interpreter::{InterpretationResult, PredictionInterpreter};
use crate::models::{latest_snapshot, PlayerMetrics};
use crate::prediction::MlPrediction;
use crate::services::{MetricsService, PredictionService, PredictionSource};

/// Latest snapshot for a player together with its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadView {
    pub metrics: PlayerMetrics,
    pub assessment: LoadAssessment,
}

/// One of the analyses the prediction service can run for a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    InjuryRisk,
    PerformanceOptimization,
    /// Fatigue detection is scoped to a training session
    FatigueDetection { session_id: String },
}

impl AnalysisRequest {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisRequest::InjuryRisk => "injury risk assessment",
            AnalysisRequest::PerformanceOptimization => "performance optimization",
            AnalysisRequest::FatigueDetection { .. } => "fatigue detection",
        }
    }
}

/// Classify the most recent snapshot of a player
///
/// Returns `Ok(None)` when the metrics service has no snapshot for the player.
pub fn load_view<M>(metrics: &M, player_id: &str) -> Result<Option<LoadView>>
where
    M: MetricsService + ?Sized,
{
    let snapshots = metrics.player_metrics(player_id)?;
    let Some(latest) = latest_snapshot(&snapshots) else {
        debug!(player_id, "No metrics snapshots available");
        return Ok(None);
    };

    let assessment = LoadClassifier::classify(latest)?;
    Ok(Some(LoadView {
        metrics: latest.clone(),
        assessment,
    }))
}

/// Fetch the stored prediction history for a player
pub fn prediction_history<P>(source: &P, player_id: &str) -> Result<PredictionHistory>
where
    P: PredictionSource + ?Sized,
{
    let predictions = source.player_predictions(player_id)?;
    Ok(PredictionHistory::from_predictions(player_id, predictions))
}

/// Run one analysis and prepend its prediction to the displayed history
///
/// On failure the caller keeps its current history untouched.
pub fn run_analysis<S>(
    service: &S,
    history: &PredictionHistory,
    request: &AnalysisRequest,
) -> Result<(PredictionHistory, InterpretationResult)>
where
    S: PredictionService + ?Sized,
{
    let player_id = history.player_id();
    info!(player_id, analysis = request.name(), "Running analysis");

    let prediction: MlPrediction = match request {
        AnalysisRequest::InjuryRisk => service.assess_injury_risk(player_id)?,
        AnalysisRequest::PerformanceOptimization => service.optimize_performance(player_id)?,
        AnalysisRequest::FatigueDetection { session_id } => {
            service.detect_fatigue(player_id, session_id)?
        }
    };

    let interpretation = PredictionInterpreter::interpret(&prediction);
    let updated = history.clone().with_prediction(prediction);
    Ok((updated, interpretation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SquadPulseError, UpstreamError};
    use crate::models::test_support::snapshot;
    use crate::prediction::FATIGUE_LEVEL_TAG;
    use serde_json::json;
    use std::cell::Cell;

    struct FixedMetrics(Vec<PlayerMetrics>);

    impl MetricsService for FixedMetrics {
        fn player_metrics(&self, _player_id: &str) -> Result<Vec<PlayerMetrics>> {
            Ok(self.0.clone())
        }
    }

    struct CountingService {
        calls: Cell<u32>,
        fail: bool,
    }

    impl CountingService {
        fn next(&self, player_id: &str, kind: &str, session: Option<&str>) -> Result<MlPrediction> {
            if self.fail {
                return Err(UpstreamError::Unavailable {
                    service: "prediction service".to_string(),
                    reason: "timeout".to_string(),
                }
                .into());
            }
            self.calls.set(self.calls.get() + 1);
            Ok(MlPrediction {
                id: format!("pred-{}", self.calls.get()),
                player_id: player_id.to_string(),
                session_id: session.map(str::to_string),
                model_id: None,
                prediction_type: kind.to_string(),
                output: json!({"riskLevel": "MODERATE", "injuryRisk": 0.45}),
                confidence: 0.7,
                predicted_at: None,
                is_actual: false,
            })
        }
    }

    impl PredictionService for CountingService {
        fn assess_injury_risk(&self, player_id: &str) -> Result<MlPrediction> {
            self.next(player_id, "INJURY_RISK", None)
        }

        fn optimize_performance(&self, player_id: &str) -> Result<MlPrediction> {
            self.next(player_id, "PERFORMANCE_DECLINE", None)
        }

        fn detect_fatigue(&self, player_id: &str, session_id: &str) -> Result<MlPrediction> {
            self.next(player_id, FATIGUE_LEVEL_TAG, Some(session_id))
        }
    }

    #[test]
    fn test_load_view_uses_latest_snapshot() {
        let service = FixedMetrics(vec![
            snapshot(Some(1.0), Some(9.0)),
            snapshot(Some(1.6), Some(5.0)),
        ]);
        let view = load_view(&service, "p1").unwrap().unwrap();
        assert_eq!(view.assessment.acute_chronic_ratio, 1.6);
        assert!(view.assessment.recovery_focus.is_some());
    }

    #[test]
    fn test_load_view_without_snapshots() {
        let service = FixedMetrics(Vec::new());
        assert!(load_view(&service, "p1").unwrap().is_none());
    }

    #[test]
    fn test_load_view_propagates_missing_metric() {
        let service = FixedMetrics(vec![snapshot(None, Some(7.0))]);
        assert!(matches!(
            load_view(&service, "p1"),
            Err(SquadPulseError::MissingMetric { .. })
        ));
    }

    #[test]
    fn test_run_analysis_prepends() {
        let service = CountingService {
            calls: Cell::new(0),
            fail: false,
        };
        let history = PredictionHistory::new("p1");

        let (history, first) = run_analysis(&service, &history, &AnalysisRequest::InjuryRisk).unwrap();
        assert_eq!(first.tier.as_deref(), Some("MODERATE"));

        let request = AnalysisRequest::FatigueDetection {
            session_id: "session_001".to_string(),
        };
        let (history, _) = run_analysis(&service, &history, &request).unwrap();

        assert_eq!(history.len(), 2);
        let latest = history.latest().unwrap();
        assert_eq!(latest.id, "pred-2");
        assert_eq!(latest.session_id.as_deref(), Some("session_001"));
    }

    #[test]
    fn test_run_analysis_failure_keeps_history() {
        let service = CountingService {
            calls: Cell::new(0),
            fail: true,
        };
        let history = PredictionHistory::new("p1");
        let err = run_analysis(&service, &history, &AnalysisRequest::PerformanceOptimization)
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(history.is_empty());
    }
}

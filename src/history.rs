//! Displayed prediction history for one player
//!
//! The authoritative log lives in the prediction service. This is the view
//! state a display surface keeps: most recent first, with each new analysis
//! result prepended. It is a plain value passed into and returned from the
//! dashboard operations, never shared mutable state.

use std::collections::VecDeque;
use tracing::warn;

use crate::interpreter::{InterpretationResult, PredictionInterpreter};
use crate::prediction::MlPrediction;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionHistory {
    player_id: String,
    entries: VecDeque<MlPrediction>,
}

impl PredictionHistory {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            entries: VecDeque::new(),
        }
    }

    /// Seed the history with the service's list, kept in the order supplied
    pub fn from_predictions(player_id: impl Into<String>, predictions: Vec<MlPrediction>) -> Self {
        let mut history = Self::new(player_id);
        for prediction in predictions {
            if prediction.player_id == history.player_id {
                history.entries.push_back(prediction);
            } else {
                warn!(
                    expected = %history.player_id,
                    found = %prediction.player_id,
                    prediction_id = %prediction.id,
                    "Dropping prediction for another player"
                );
            }
        }
        history
    }

    /// Return a history with `prediction` as the most recent entry
    ///
    /// Issuing the same analysis twice simply yields two independent entries.
    pub fn with_prediction(mut self, prediction: MlPrediction) -> Self {
        if prediction.player_id != self.player_id {
            warn!(
                expected = %self.player_id,
                found = %prediction.player_id,
                prediction_id = %prediction.id,
                "Ignoring prediction for another player"
            );
            return self;
        }
        self.entries.push_front(prediction);
        self
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Entries, most recent first
    pub fn entries(&self) -> impl Iterator<Item = &MlPrediction> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&MlPrediction> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interpret every entry, most recent first
    pub fn interpretations(&self) -> Vec<InterpretationResult> {
        self.entries.iter().map(PredictionInterpreter::interpret).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prediction(id: &str, player_id: &str, kind: &str) -> MlPrediction {
        MlPrediction {
            id: id.to_string(),
            player_id: player_id.to_string(),
            session_id: None,
            model_id: None,
            prediction_type: kind.to_string(),
            output: json!({}),
            confidence: 0.8,
            predicted_at: None,
            is_actual: false,
        }
    }

    #[test]
    fn test_new_predictions_are_prepended() {
        let history = PredictionHistory::from_predictions(
            "p1",
            vec![prediction("b", "p1", "INJURY_RISK"), prediction("a", "p1", "FATIGUE_LEVEL")],
        );
        let history = history.with_prediction(prediction("c", "p1", "PERFORMANCE_DECLINE"));

        let ids: Vec<&str> = history.entries().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(history.latest().unwrap().id, "c");
    }

    #[test]
    fn test_repeated_analysis_appends_independent_entries() {
        let history = PredictionHistory::new("p1")
            .with_prediction(prediction("x1", "p1", "INJURY_RISK"))
            .with_prediction(prediction("x2", "p1", "INJURY_RISK"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.interpretations().len(), 2);
    }

    #[test]
    fn test_other_players_are_ignored() {
        let history = PredictionHistory::from_predictions(
            "p1",
            vec![prediction("a", "p2", "INJURY_RISK")],
        );
        assert!(history.is_empty());

        let history = history.with_prediction(prediction("b", "p3", "INJURY_RISK"));
        assert!(history.is_empty());
        assert_eq!(history.player_id(), "p1");
    }
}

//! Contracts of the upstream collaborators and a JSON-file implementation
//!
//! The core never performs network I/O or retries. Implementations surface
//! their failures as [`UpstreamError`] and callers decide what to show.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{Result, UpstreamError};
use crate::models::{Player, PlayerMetrics};
use crate::prediction::{MlPrediction, PredictionType};

pub const PLAYERS_FILE: &str = "players.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const PREDICTIONS_FILE: &str = "predictions.json";
pub const ANALYSES_FILE: &str = "analyses.json";

/// Supplies the active roster
pub trait RosterService {
    fn active_players(&self) -> Result<Vec<Player>>;
}

/// Supplies metrics snapshots, ordered oldest to newest
pub trait MetricsService {
    fn player_metrics(&self, player_id: &str) -> Result<Vec<PlayerMetrics>>;
}

/// Supplies the stored prediction history for a player
pub trait PredictionSource {
    fn player_predictions(&self, player_id: &str) -> Result<Vec<MlPrediction>>;
}

/// Runs ML analyses; each call yields one new prediction
pub trait PredictionService {
    fn assess_injury_risk(&self, player_id: &str) -> Result<MlPrediction>;
    fn optimize_performance(&self, player_id: &str) -> Result<MlPrediction>;
    fn detect_fatigue(&self, player_id: &str, session_id: &str) -> Result<MlPrediction>;
}

/// Data source backed by JSON files in one directory
///
/// `players.json` holds the roster, `metrics.json` the snapshots in
/// chronological order and `predictions.json` the prediction log, most
/// recent first. `analyses.json` holds the results the ML service delivered
/// for on-demand analyses, most recent first.
///
/// `metrics.json` is parsed once per store and shared by every lookup.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    metrics: OnceLock<Vec<PlayerMetrics>>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            metrics: OnceLock::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_json<T>(&self, service: &str, file: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let path = self.data_dir.join(file);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(UpstreamError::SourceMissing {
                    service: service.to_string(),
                    path,
                }
                .into());
            }
            Err(e) => {
                return Err(UpstreamError::Unavailable {
                    service: service.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let records: Vec<T> =
            serde_json::from_str(&content).map_err(|e| UpstreamError::Malformed {
                service: service.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;

        debug!(service, path = %path.display(), count = records.len(), "Loaded records");
        Ok(records)
    }

    fn all_metrics(&self) -> Result<&[PlayerMetrics]> {
        if let Some(cached) = self.metrics.get() {
            return Ok(cached.as_slice());
        }

        let loaded: Vec<PlayerMetrics> = self.read_json("metrics service", METRICS_FILE)?;
        // another thread may have filled the cache first
        Ok(self.metrics.get_or_init(|| loaded).as_slice())
    }

    fn latest_analysis(
        &self,
        player_id: &str,
        kind: PredictionType,
        session_id: Option<&str>,
    ) -> Result<MlPrediction> {
        const SERVICE: &str = "prediction service";
        let analyses: Vec<MlPrediction> = self.read_json(SERVICE, ANALYSES_FILE)?;

        analyses
            .into_iter()
            .find(|p| {
                p.player_id == player_id
                    && p.kind() == kind
                    && session_id.map_or(true, |s| p.session_id.as_deref() == Some(s))
            })
            .ok_or_else(|| {
                let mut id = format!("{} {}", kind, player_id);
                if let Some(session) = session_id {
                    id.push_str(&format!(" ({})", session));
                }
                UpstreamError::NotFound {
                    service: SERVICE.to_string(),
                    id,
                }
                .into()
            })
    }
}

impl RosterService for JsonFileStore {
    fn active_players(&self) -> Result<Vec<Player>> {
        let players: Vec<Player> = self.read_json("roster service", PLAYERS_FILE)?;
        Ok(players.into_iter().filter(|p| p.active).collect())
    }
}

impl MetricsService for JsonFileStore {
    fn player_metrics(&self, player_id: &str) -> Result<Vec<PlayerMetrics>> {
        Ok(self
            .all_metrics()?
            .iter()
            .filter(|m| m.player_id == player_id)
            .cloned()
            .collect())
    }
}

impl PredictionSource for JsonFileStore {
    fn player_predictions(&self, player_id: &str) -> Result<Vec<MlPrediction>> {
        let predictions: Vec<MlPrediction> =
            self.read_json("prediction service", PREDICTIONS_FILE)?;
        Ok(predictions
            .into_iter()
            .filter(|p| p.player_id == player_id)
            .collect())
    }
}

impl PredictionService for JsonFileStore {
    fn assess_injury_risk(&self, player_id: &str) -> Result<MlPrediction> {
        self.latest_analysis(player_id, PredictionType::InjuryRisk, None)
    }

    fn optimize_performance(&self, player_id: &str) -> Result<MlPrediction> {
        self.latest_analysis(player_id, PredictionType::PerformanceDecline, None)
    }

    fn detect_fatigue(&self, player_id: &str, session_id: &str) -> Result<MlPrediction> {
        self.latest_analysis(player_id, PredictionType::FatigueLevel, Some(session_id))
    }
}

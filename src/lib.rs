// Library interface for SquadPulse modules
// Classification and interpretation are pure; the remaining modules wire them
// to upstream data, configuration and the terminal.

pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod format;
pub mod history;
pub mod interpreter;
pub mod logging;
pub mod models;
pub mod prediction;
pub mod services;
pub mod squad;

// Re-export commonly used types for convenience
pub use models::*;
pub use classifier::{LoadAssessment, LoadClassifier};
pub use interpreter::{InterpretationResult, PredictionInterpreter};
pub use prediction::{MlPrediction, PredictionPayload, PredictionType};
pub use history::PredictionHistory;
pub use error::{Result, SquadPulseError, UpstreamError};
pub use logging::{LogConfig, LogFormat, LogLevel};

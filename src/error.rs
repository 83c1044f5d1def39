//! Unified error hierarchy for SquadPulse
//!
//! Classification failures are typed so callers can decide how to surface
//! them. Upstream failures (roster, metrics, ML services) are carried through
//! unchanged; the core never retries or swallows them.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all SquadPulse operations
#[derive(Debug, Error)]
pub enum SquadPulseError {
    /// A numeric field required for classification is absent or non-finite
    #[error("Missing metric: {metric}")]
    MissingMetric { metric: String },

    /// Snapshot violates a data-model invariant
    #[error("Validation error: {0}")]
    Validation(String),

    /// External collaborator failure
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Failures raised by the roster, metrics, or prediction services
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Service could not be reached or timed out
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    /// Requested record does not exist
    #[error("{service} has no record for {id}")]
    NotFound { service: String, id: String },

    /// Service answered with data that could not be decoded
    #[error("{service} returned malformed data: {reason}")]
    Malformed { service: String, reason: String },

    /// Backing file is missing
    #[error("{service} source not found: {path}")]
    SourceMissing { service: String, path: PathBuf },
}

/// Result type alias for SquadPulse operations
pub type Result<T> = std::result::Result<T, SquadPulseError>;

impl SquadPulseError {
    pub fn missing_metric(metric: impl Into<String>) -> Self {
        SquadPulseError::MissingMetric {
            metric: metric.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SquadPulseError::Upstream(UpstreamError::Unavailable { .. }) | SquadPulseError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SquadPulseError::MissingMetric { .. } => ErrorSeverity::Warning,
            SquadPulseError::Validation(_) => ErrorSeverity::Warning,
            SquadPulseError::Upstream(UpstreamError::NotFound { .. }) => ErrorSeverity::Warning,
            SquadPulseError::Upstream(_) => ErrorSeverity::Error,
            SquadPulseError::Configuration(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SquadPulseError::MissingMetric { metric } => {
                format!(
                    "No usable {} in the latest snapshot; risk tiers are not shown.",
                    metric
                )
            }
            SquadPulseError::Upstream(UpstreamError::Unavailable { service, .. }) => {
                format!("Failed to reach the {}. Please try again.", service)
            }
            SquadPulseError::Upstream(UpstreamError::NotFound { id, .. }) => {
                format!("No data available for {}", id)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = SquadPulseError::missing_metric("acuteChronicRatio");
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = SquadPulseError::Configuration("bad".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_error_retryable() {
        let err = SquadPulseError::from(UpstreamError::Unavailable {
            service: "metrics service".to_string(),
            reason: "timeout".to_string(),
        });
        assert!(err.is_retryable());

        let err = SquadPulseError::missing_metric("readinessScore");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = SquadPulseError::missing_metric("readinessScore");
        assert!(err.user_message().contains("readinessScore"));

        let err = SquadPulseError::from(UpstreamError::Unavailable {
            service: "roster service".to_string(),
            reason: "connection refused".to_string(),
        });
        assert!(err.user_message().contains("roster service"));
    }
}

//! Error types for the optimizer.

/// Result type for fallible optimizer operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Errors surfaced to the caller.
///
/// Shortfalls and infeasible constraint sets are not errors; they are
/// reported on the `OptimizationResult` itself.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Scenario severity {0} is outside the accepted range 0.5-3.0")]
    InvalidSeverity(f64),

    #[error("Demographic dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::Dataset(e.to_string())
    }
}

impl From<toml::de::Error> for PlannerError {
    fn from(e: toml::de::Error) -> Self {
        PlannerError::Config(e.to_string())
    }
}

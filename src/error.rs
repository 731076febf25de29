use thiserror::Error;

/// Failures of a single analysis call. None of them are fatal; the caller
/// turns them into an error-shaped response.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("insufficient landmarks visibility")]
    InsufficientVisibility,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("analysis.point_window must be at least 1")]
    ZeroWindow,

    #[error("consecutive frame requirements must be at least 1")]
    ZeroStreak,

    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidThreshold { name: &'static str, value: f64 },
}

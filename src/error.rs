//! Error types for vlansweep.
//!
//! Uses `thiserror` for ergonomic error definitions.

use thiserror::Error;

/// Main error type for sweep operations.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("invalid range '{input}': {reason}")]
    InvalidRange { input: String, reason: String },

    #[error("range too large: {hosts} addresses (max: {max})")]
    RangeTooLarge { hosts: u128, max: u128 },

    #[error("failed to set up ICMP probing: {0}")]
    ProbeSetup(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    /// Build an `InvalidRange` error for the given input string.
    pub fn invalid_range(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Error type for the command-line binary.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error("failed to write report to '{path}': {source}")]
    ReportWrite {
        path: String,
        source: std::io::Error,
    },
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Invalid input gets a distinct code so scripts can tell a bad
    /// range apart from a runtime failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Sweep(SweepError::InvalidRange { .. })
            | Self::Sweep(SweepError::RangeTooLarge { .. }) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

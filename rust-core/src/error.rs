//! Error types shared by every stage of the diagnostics pipeline
//!
//! All failures are deterministic input or configuration errors, so nothing
//! here is ever retried.

use crate::series::Axis;
use std::fmt;
use thiserror::Error;

/// Pipeline stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Filter,
    Envelope,
    Spectrum,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Filter => "band-pass filter",
            Stage::Envelope => "envelope extraction",
            Stage::Spectrum => "spectral analysis",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("invalid band [{low} Hz, {high} Hz] at {sample_rate} Hz: {reason}")]
    InvalidBand {
        low: f64,
        high: f64,
        sample_rate: f64,
        reason: &'static str,
    },

    #[error("filter order must be a positive integer (got {0})")]
    InvalidOrder(usize),

    #[error("sample rate must be positive and finite (got {0})")]
    InvalidSampleRate(f64),

    #[error("signal has {len} samples but at least {required} are needed")]
    InsufficientSamples { len: usize, required: usize },

    #[error("{0} received an empty series")]
    EmptyInput(Stage),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    #[error("axis {axis} failed during {stage}: {source}")]
    Axis {
        axis: Axis,
        stage: Stage,
        #[source]
        source: Box<DiagnosticsError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl DiagnosticsError {
    /// Attach axis and stage context to a stage failure
    pub fn in_axis(self, axis: Axis, stage: Stage) -> Self {
        DiagnosticsError::Axis {
            axis,
            stage,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any axis context
    pub fn root(&self) -> &DiagnosticsError {
        match self {
            DiagnosticsError::Axis { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagnosticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_context_message() {
        let err = DiagnosticsError::InsufficientSamples { len: 3, required: 28 }
            .in_axis(Axis::Y, Stage::Filter);
        let msg = err.to_string();
        assert!(msg.contains("axis Y"), "{}", msg);
        assert!(msg.contains("band-pass filter"), "{}", msg);
        assert!(msg.contains("3 samples"), "{}", msg);
        assert!(matches!(
            err.root(),
            DiagnosticsError::InsufficientSamples { len: 3, required: 28 }
        ));
    }
}

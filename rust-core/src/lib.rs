//! Vibration Envelope - tri-axial envelope demodulation core
//!
//! Band-pass filtering, analytic-signal envelope extraction and envelope
//! spectra for offline bearing and gear diagnostics, with optional Python
//! bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod config;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod io;
pub mod pipeline;
pub mod series;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use config::{DiagnosticsConfig, PipelineConfig};
pub use error::{DiagnosticsError, Result, Stage};
pub use filters::{design, FilterSpec};
pub use pipeline::{run, AxisResult, EnvelopePipeline};
pub use series::{Axis, EnvelopeSeries, SampleSeries, SpectrumSeries, TriAxial};
pub use spectrum::SpectrumAnalyzer;

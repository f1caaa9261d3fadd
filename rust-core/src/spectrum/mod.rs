//! Spectral analysis of envelope signals

pub mod fft;
pub mod analysis;

pub use fft::FftEngine;
pub use analysis::{analyze, SpectrumAnalyzer};

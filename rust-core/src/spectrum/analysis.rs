//! Envelope spectrum analysis
//!
//! Raw magnitude of the full-length transform: no window, no 1/N scaling.
//! Callers comparing absolute amplitudes across record lengths must
//! normalize themselves.

use super::fft::FftEngine;
use crate::error::{DiagnosticsError, Result, Stage};
use crate::series::{EnvelopeSeries, SpectrumSeries};

/// Spectrum analyzer that keeps its FFT plan between equal-length inputs
#[derive(Default)]
pub struct SpectrumAnalyzer {
    engine: Option<FftEngine>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Magnitude spectrum of `envelope` over bins k = 0..N/2 (exclusive)
    ///
    /// Bin k sits at `k * sample_rate / N` Hz.
    pub fn analyze(&mut self, envelope: &EnvelopeSeries) -> Result<SpectrumSeries> {
        let n = envelope.len();
        if n == 0 {
            return Err(DiagnosticsError::EmptyInput(Stage::Spectrum));
        }
        let sample_rate = envelope.sample_rate();
        let half = n / 2;
        if half == 0 {
            return Ok(SpectrumSeries::from_parts(Vec::new(), Vec::new(), sample_rate, n));
        }

        let engine = match self.engine.take() {
            Some(engine) if engine.fft_size() == n => engine,
            _ => FftEngine::new(n),
        };
        let engine = self.engine.insert(engine);

        let mut magnitudes = engine.compute_magnitude(envelope.values())?;
        magnitudes.truncate(half);

        let frequencies: Vec<f64> = (0..half).map(|k| engine.bin_to_hz(k, sample_rate)).collect();

        log::debug!(
            "envelope spectrum: {} bins, {:.4} Hz resolution",
            half,
            sample_rate / n as f64
        );
        Ok(SpectrumSeries::from_parts(frequencies, magnitudes, sample_rate, n))
    }

    /// Currently planned FFT size, if any
    pub fn planned_size(&self) -> Option<usize> {
        self.engine.as_ref().map(|e| e.fft_size())
    }
}

/// One-shot spectrum of an envelope (see [`SpectrumAnalyzer::analyze`])
pub fn analyze(envelope: &EnvelopeSeries) -> Result<SpectrumSeries> {
    SpectrumAnalyzer::new().analyze(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone_envelope(n: usize, fs: f64, freq: f64) -> EnvelopeSeries {
        let values = (0..n)
            .map(|i| 2.0 + (2.0 * PI * freq * i as f64 / fs).sin())
            .collect();
        EnvelopeSeries::new(values, fs).unwrap()
    }

    #[test]
    fn test_empty_envelope() {
        let env = EnvelopeSeries::new(Vec::new(), 1000.0).unwrap();
        assert!(matches!(
            analyze(&env),
            Err(DiagnosticsError::EmptyInput(Stage::Spectrum))
        ));
    }

    #[test]
    fn test_bin_count_and_range() {
        for n in [2000, 2001, 7, 2] {
            let spectrum = analyze(&tone_envelope(n, 1000.0, 10.0)).unwrap();
            assert_eq!(spectrum.len(), n / 2);
            assert_eq!(spectrum.frequencies()[0], 0.0);
            assert!(spectrum.frequencies().windows(2).all(|w| w[1] > w[0]));
            assert!(*spectrum.frequencies().last().unwrap() < 500.0);
        }
    }

    #[test]
    fn test_single_sample_has_no_bins() {
        let env = EnvelopeSeries::new(vec![1.0], 1000.0).unwrap();
        assert!(analyze(&env).unwrap().is_empty());
    }

    #[test]
    fn test_peak_frequency() {
        let spectrum = analyze(&tone_envelope(2000, 1000.0, 10.0)).unwrap();
        let (freq, mag) = spectrum.peak(true).unwrap();
        assert!((freq - 10.0).abs() < 1e-9);
        assert!((mag - 1000.0).abs() < 1e-6);

        // DC carries the mean times N
        assert!((spectrum.magnitudes()[0] - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn test_plan_reused_and_replaced() {
        let mut analyzer = SpectrumAnalyzer::new();
        assert_eq!(analyzer.planned_size(), None);
        analyzer.analyze(&tone_envelope(128, 100.0, 5.0)).unwrap();
        assert_eq!(analyzer.planned_size(), Some(128));
        analyzer.analyze(&tone_envelope(128, 100.0, 7.0)).unwrap();
        assert_eq!(analyzer.planned_size(), Some(128));
        analyzer.analyze(&tone_envelope(96, 100.0, 7.0)).unwrap();
        assert_eq!(analyzer.planned_size(), Some(96));
    }
}

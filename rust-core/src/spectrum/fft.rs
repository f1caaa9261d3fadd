//! FFT engine using realfft for real-valued signals
//!
//! Plans once per length and reuses its buffers across calls.

use crate::error::{DiagnosticsError, Result};
use realfft::{num_complex::Complex, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine for real-valued signals of one fixed length
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer (realfft uses it as scratch)
    input_buffer: Vec<f64>,

    /// Reusable output buffer, fft_size/2 + 1 bins
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, > 0)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Magnitude |X[k]| for every bin k = 0..=fft_size/2
    ///
    /// The signal must be exactly `fft_size` samples long; no padding or
    /// windowing is applied.
    pub fn compute_magnitude(&mut self, signal: &[f64]) -> Result<Vec<f64>> {
        if signal.len() != self.fft_size {
            return Err(DiagnosticsError::DimensionMismatch(format!(
                "FFT planned for {} samples, got {}",
                self.fft_size,
                signal.len()
            )));
        }
        self.input_buffer.copy_from_slice(signal);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| DiagnosticsError::NumericalFailure(format!("FFT failed: {}", e)))?;

        Ok(self.output_buffer.iter().map(|c| c.norm()).collect())
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins the real FFT produces (fft_size/2 + 1)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Bin index to frequency in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }
}

//! Forward-backward (zero-phase) filtering
//!
//! Edge policy: the signal is extended at both ends by an odd reflection of
//! `pad_len` samples about its endpoints, each pass starts from the
//! steady-state delay line scaled by its first sample, and the extension is
//! cut away at the end. The result has the squared magnitude response of the
//! filter and no phase shift.

use super::design::{BandpassCoefficients, FilterSpec};
use super::iir::{steady_state_initial, IirFilter};
use crate::error::{DiagnosticsError, Result};
use crate::series::SampleSeries;

/// Apply `spec` forward then backward to `signal`
///
/// # Errors
/// `InsufficientSamples` unless the signal is longer than `spec.pad_len()`,
/// `DimensionMismatch` when the signal and the filter disagree on sample rate.
pub fn apply(spec: &FilterSpec, signal: &SampleSeries) -> Result<SampleSeries> {
    if signal.sample_rate() != spec.sample_rate() {
        return Err(DiagnosticsError::DimensionMismatch(format!(
            "signal sampled at {} Hz but filter designed for {} Hz",
            signal.sample_rate(),
            spec.sample_rate()
        )));
    }

    let filtered = filtfilt(spec.coefficients(), signal.values(), spec.pad_len())?;
    log::debug!(
        "zero-phase filtered {} samples (pad {})",
        filtered.len(),
        spec.pad_len()
    );
    SampleSeries::new(filtered, signal.sample_rate())
}

/// Forward-backward filter raw samples with odd-reflection padding
pub fn filtfilt(coefficients: &BandpassCoefficients, x: &[f64], pad_len: usize) -> Result<Vec<f64>> {
    if x.len() <= pad_len {
        return Err(DiagnosticsError::InsufficientSamples {
            len: x.len(),
            required: pad_len + 1,
        });
    }

    let zi = steady_state_initial(coefficients)?;
    let mut buffer = odd_extend(x, pad_len);
    let mut filter = IirFilter::new(coefficients);

    run_pass(&mut filter, &zi, &mut buffer);
    buffer.reverse();
    run_pass(&mut filter, &zi, &mut buffer);
    buffer.reverse();

    buffer.truncate(buffer.len() - pad_len);
    buffer.drain(..pad_len);
    Ok(buffer)
}

fn run_pass(filter: &mut IirFilter, zi: &[f64], buffer: &mut [f64]) {
    let x0 = buffer[0];
    let scaled: Vec<f64> = zi.iter().map(|z| z * x0).collect();
    filter.set_state(&scaled);
    filter.process_block_inplace(buffer);
}

/// `2*x[0] - x[pad..0]`, `x`, `2*x[-1] - x[-2..-pad-2]`
fn odd_extend(x: &[f64], pad_len: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut out = Vec::with_capacity(n + 2 * pad_len);
    out.extend((1..=pad_len).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad_len).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}

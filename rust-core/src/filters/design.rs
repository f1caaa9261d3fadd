//! Butterworth band-pass design via the bilinear transform
//!
//! Analog low-pass prototype -> band-pass transform -> bilinear map to the
//! z-plane, carried out on zeros/poles and expanded into `(b, a)` polynomials
//! only at the end.

use crate::error::{DiagnosticsError, Result};
use crate::series::check_sample_rate;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Filter order used when the configuration does not name one
pub const DEFAULT_ORDER: usize = 4;

/// Twice the normalized sample rate (fs = 2 when frequencies are in units of Nyquist)
const BILINEAR_K: f64 = 4.0;

/// Transfer-function coefficients, highest power of z first, `a[0] == 1`
#[derive(Debug, Clone, PartialEq)]
pub struct BandpassCoefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl BandpassCoefficients {
    /// Number of taps of the longer polynomial
    pub fn ntaps(&self) -> usize {
        self.a.len().max(self.b.len())
    }
}

/// Validated band-pass description with its cached coefficients
///
/// Immutable once designed; share it by reference across axes and threads.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
    order: usize,
    coefficients: BandpassCoefficients,
}

impl FilterSpec {
    /// Design a Butterworth band-pass filter
    ///
    /// # Arguments
    /// * `low_hz` - Lower -3 dB edge in Hz
    /// * `high_hz` - Upper -3 dB edge in Hz
    /// * `sample_rate` - Sample rate in Hz
    /// * `order` - Prototype order; the band-pass result has order `2 * order`
    ///
    /// # Errors
    /// `InvalidBand` unless `0 < low_hz < high_hz < sample_rate / 2`,
    /// `InvalidOrder` for order 0, `InvalidSampleRate` for a non-positive rate.
    pub fn design(low_hz: f64, high_hz: f64, sample_rate: f64, order: usize) -> Result<Self> {
        let (low_n, high_n) = check_parameters(low_hz, high_hz, sample_rate, order)?;
        if high_n > 0.9 {
            log::warn!(
                "band upper edge {} Hz is above 90% of Nyquist ({} Hz)",
                high_hz,
                0.5 * sample_rate
            );
        }

        let coefficients = butterworth_bandpass(low_n, high_n, order);
        if coefficients
            .b
            .iter()
            .chain(coefficients.a.iter())
            .any(|c| !c.is_finite())
        {
            return Err(DiagnosticsError::NumericalFailure(format!(
                "order {} design for [{}, {}] Hz produced non-finite coefficients",
                order, low_hz, high_hz
            )));
        }

        log::debug!(
            "designed order-{} Butterworth band-pass [{} Hz, {} Hz] at {} Hz ({} taps)",
            order,
            low_hz,
            high_hz,
            sample_rate,
            coefficients.ntaps()
        );

        Ok(Self {
            low_hz,
            high_hz,
            sample_rate,
            order,
            coefficients,
        })
    }

    pub fn low_hz(&self) -> f64 {
        self.low_hz
    }

    pub fn high_hz(&self) -> f64 {
        self.high_hz
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn coefficients(&self) -> &BandpassCoefficients {
        &self.coefficients
    }

    /// Band edges as fractions of Nyquist
    pub fn normalized_band(&self) -> (f64, f64) {
        let nyq = 0.5 * self.sample_rate;
        (self.low_hz / nyq, self.high_hz / nyq)
    }

    /// Odd-extension length used at each end by forward-backward filtering
    pub fn pad_len(&self) -> usize {
        3 * self.coefficients.ntaps()
    }

    /// Shortest signal forward-backward filtering accepts
    pub fn min_signal_len(&self) -> usize {
        self.pad_len() + 1
    }

    /// Complex response H(e^jω) at the given frequencies in Hz
    pub fn frequency_response(&self, frequencies_hz: &[f64]) -> Vec<Complex64> {
        frequency_response(&self.coefficients, frequencies_hz, self.sample_rate)
    }

    /// Magnitude response in dB at the given frequencies in Hz
    pub fn magnitude_response_db(&self, frequencies_hz: &[f64]) -> Vec<f64> {
        self.frequency_response(frequencies_hz)
            .iter()
            .map(|h| 20.0 * h.norm().max(1e-300).log10())
            .collect()
    }
}

/// Validate design parameters, returning the band edges as fractions of Nyquist
pub(crate) fn check_parameters(
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
    order: usize,
) -> Result<(f64, f64)> {
    check_sample_rate(sample_rate)?;
    if order == 0 {
        return Err(DiagnosticsError::InvalidOrder(order));
    }

    let nyq = 0.5 * sample_rate;
    let low_n = low_hz / nyq;
    let high_n = high_hz / nyq;
    let invalid = |reason| DiagnosticsError::InvalidBand {
        low: low_hz,
        high: high_hz,
        sample_rate,
        reason,
    };

    if !low_n.is_finite() || !high_n.is_finite() {
        return Err(invalid("band edges must be finite"));
    }
    if low_n <= 0.0 {
        return Err(invalid("low cutoff must be above 0 Hz"));
    }
    if high_n >= 1.0 {
        return Err(invalid("high cutoff must be below the Nyquist frequency"));
    }
    if low_n >= high_n {
        return Err(invalid("low cutoff must be below high cutoff"));
    }
    Ok((low_n, high_n))
}

/// Design a Butterworth band-pass filter (see [`FilterSpec::design`])
pub fn design(low_hz: f64, high_hz: f64, sample_rate: f64, order: usize) -> Result<FilterSpec> {
    FilterSpec::design(low_hz, high_hz, sample_rate, order)
}

/// Digital band-pass coefficients for band edges normalized to Nyquist
fn butterworth_bandpass(low_n: f64, high_n: f64, order: usize) -> BandpassCoefficients {
    // Pre-warp so the -3 dB points land exactly on the requested edges
    let w1 = BILINEAR_K * (PI * low_n / 2.0).tan();
    let w2 = BILINEAR_K * (PI * high_n / 2.0).tan();
    let bw = w2 - w1;
    let wo2 = w1 * w2;

    // Low-pass prototype poles on the left half of the unit circle,
    // each split into a band-pass pair
    let n = order as f64;
    let mut analog_poles = Vec::with_capacity(2 * order);
    for k in 0..order {
        let m = (2 * k) as f64 - n + 1.0;
        let p = -Complex64::from_polar(1.0, PI * m / (2.0 * n));
        let p_lp = p * (bw / 2.0);
        let split = (p_lp * p_lp - wo2).sqrt();
        analog_poles.push(p_lp + split);
        analog_poles.push(p_lp - split);
    }
    // `order` analog zeros sit at the origin; the gain is bw^order
    let analog_gain = bw.powi(order as i32);

    // Bilinear transform: s-plane origin -> z = 1, infinity -> z = -1
    let k = Complex64::new(BILINEAR_K, 0.0);
    let digital_poles: Vec<Complex64> = analog_poles.iter().map(|&p| (k + p) / (k - p)).collect();
    let denom: Complex64 = analog_poles.iter().map(|&p| k - p).product();
    let gain = analog_gain * (Complex64::new(BILINEAR_K.powi(order as i32), 0.0) / denom).re;

    let mut digital_zeros = vec![Complex64::new(1.0, 0.0); order];
    digital_zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(order));

    let b = poly(&digital_zeros).iter().map(|c| gain * c.re).collect();
    let a = poly(&digital_poles).iter().map(|c| c.re).collect();

    BandpassCoefficients { b, a }
}

/// Monic polynomial with the given roots, highest power first
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = Vec::with_capacity(roots.len() + 1);
    coeffs.push(Complex64::new(1.0, 0.0));
    for &root in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= root * prev;
        }
    }
    coeffs
}

/// Evaluate H(e^jω) = B(e^jω) / A(e^jω) at frequencies in Hz
pub fn frequency_response(
    coefficients: &BandpassCoefficients,
    frequencies_hz: &[f64],
    sample_rate: f64,
) -> Vec<Complex64> {
    let eval = |coeffs: &[f64], omega: f64| -> Complex64 {
        coeffs
            .iter()
            .enumerate()
            .map(|(n, &c)| c * Complex64::from_polar(1.0, -omega * n as f64))
            .sum()
    };

    frequencies_hz
        .iter()
        .map(|&f| {
            let omega = 2.0 * PI * f / sample_rate;
            eval(&coefficients.b, omega) / eval(&coefficients.a, omega)
        })
        .collect()
}

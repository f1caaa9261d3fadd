//! Envelope extraction through the analytic signal
//!
//! The analytic signal is built in the frequency domain over the whole
//! record: keep DC (and Nyquist for even lengths), double the positive
//! frequencies, zero the negative ones, transform back. There is no
//! streaming variant; the first and last few samples carry boundary leakage
//! and are returned as-is.

use crate::error::{DiagnosticsError, Result, Stage};
use crate::series::{EnvelopeSeries, SampleSeries};
use rustfft::{num_complex::Complex, FftPlanner};

/// Complex analytic signal of `signal` (real part equals the input)
pub fn analytic_signal(signal: &[f64]) -> Result<Vec<Complex<f64>>> {
    let n = signal.len();
    if n == 0 {
        return Err(DiagnosticsError::EmptyInput(Stage::Envelope));
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    // Spectral weights h[k]: 1 at DC, 2 on positive bins, 1 at Nyquist (even n), 0 on negative bins
    let positive_end = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    for (k, bin) in buffer.iter_mut().enumerate() {
        let weight = if k == 0 || (n % 2 == 0 && k == n / 2) {
            1.0
        } else if k < positive_end {
            2.0
        } else {
            0.0
        };
        *bin *= weight;
    }

    ifft.process(&mut buffer);

    let scale = 1.0 / n as f64;
    for value in buffer.iter_mut() {
        *value *= scale;
    }
    Ok(buffer)
}

/// Instantaneous amplitude `|analytic(signal)|`, same length and sample rate
pub fn extract(signal: &SampleSeries) -> Result<EnvelopeSeries> {
    let analytic = analytic_signal(signal.values())?;
    let magnitudes: Vec<f64> = analytic.iter().map(|c| c.norm()).collect();
    log::debug!("extracted envelope of {} samples", magnitudes.len());
    Ok(EnvelopeSeries::from_magnitudes(magnitudes, signal.sample_rate()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_signal() {
        let signal = SampleSeries::new(Vec::new(), 100.0).unwrap();
        assert!(matches!(
            extract(&signal),
            Err(DiagnosticsError::EmptyInput(Stage::Envelope))
        ));
    }

    #[test]
    fn test_real_part_preserved() {
        for n in [64, 65] {
            let x: Vec<f64> = (0..n).map(|i| ((i * 7) % 11) as f64 - 5.0).collect();
            let analytic = analytic_signal(&x).unwrap();
            for (a, &orig) in analytic.iter().zip(x.iter()) {
                assert!((a.re - orig).abs() < 1e-9, "n = {}", n);
            }
        }
    }

    #[test]
    fn test_cosine_quadrature() {
        // Hilbert transform of cos is sin for a whole number of periods
        let n = 256;
        let x: Vec<f64> = (0..n).map(|i| (2.0 * PI * 8.0 * i as f64 / n as f64).cos()).collect();
        let analytic = analytic_signal(&x).unwrap();
        for (i, a) in analytic.iter().enumerate() {
            let expected = (2.0 * PI * 8.0 * i as f64 / n as f64).sin();
            assert!((a.im - expected).abs() < 1e-9, "sample {}", i);
        }
    }

    #[test]
    fn test_constant_amplitude_tone() {
        let fs = 1000.0;
        let x: Vec<f64> = (0..1000)
            .map(|i| 2.5 * (2.0 * PI * 50.0 * i as f64 / fs).sin())
            .collect();
        let env = extract(&SampleSeries::new(x, fs).unwrap()).unwrap();
        assert_eq!(env.len(), 1000);
        for v in env.values() {
            assert!((v - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tracks_amplitude_modulation() {
        let fs = 1000.0;
        let modulation = |t: f64| 1.0 + 0.5 * (2.0 * PI * 10.0 * t).sin();
        let x: Vec<f64> = (0..2000)
            .map(|i| {
                let t = i as f64 / fs;
                modulation(t) * (2.0 * PI * 100.0 * t).sin()
            })
            .collect();
        let env = extract(&SampleSeries::new(x, fs).unwrap()).unwrap();

        assert!(env.values().iter().all(|&v| v >= 0.0));
        for i in 200..1800 {
            let expected = modulation(i as f64 / fs);
            assert!((env.values()[i] - expected).abs() < 0.02, "sample {}", i);
        }
    }

    #[test]
    fn test_non_negative_for_arbitrary_input() {
        let x: Vec<f64> = (0..333).map(|i| ((i * 37) % 101) as f64 / 50.0 - 1.0).collect();
        let env = extract(&SampleSeries::new(x, 1.0).unwrap()).unwrap();
        assert!(env.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_single_sample() {
        let env = extract(&SampleSeries::new(vec![-3.0], 10.0).unwrap()).unwrap();
        assert_eq!(env.len(), 1);
        assert!((env.values()[0] - 3.0).abs() < 1e-12);
    }
}

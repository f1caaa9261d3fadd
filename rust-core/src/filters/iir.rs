//! Single-direction IIR filtering with explicit state
//!
//! Direct form II transposed: one delay line of `ntaps - 1` values, updated in
//! place for every sample.

use super::design::BandpassCoefficients;
use crate::error::{DiagnosticsError, Result};
use ndarray::{Array1, Array2};

/// IIR filter holding its coefficients and delay line
pub struct IirFilter {
    /// Numerator coefficients, padded to `ntaps`
    b: Vec<f64>,

    /// Denominator coefficients, normalized so `a[0] == 1`, padded to `ntaps`
    a: Vec<f64>,

    /// Delay line z[0..ntaps-1]
    state: Vec<f64>,
}

impl IirFilter {
    /// Create a filter with an all-zero delay line
    pub fn new(coefficients: &BandpassCoefficients) -> Self {
        let ntaps = coefficients.ntaps();
        let a0 = coefficients.a[0];

        let mut b: Vec<f64> = coefficients.b.iter().map(|c| c / a0).collect();
        let mut a: Vec<f64> = coefficients.a.iter().map(|c| c / a0).collect();
        b.resize(ntaps, 0.0);
        a.resize(ntaps, 0.0);

        Self {
            b,
            a,
            state: vec![0.0; ntaps.saturating_sub(1)],
        }
    }

    /// Replace the delay line (length must be `ntaps - 1`)
    pub fn set_state(&mut self, state: &[f64]) {
        debug_assert_eq!(state.len(), self.state.len());
        self.state.copy_from_slice(state);
    }

    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Process single sample
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let output = self.b[0] * input + self.state.first().copied().unwrap_or(0.0);

        let last = self.state.len();
        if last == 0 {
            return output;
        }
        for i in 0..last - 1 {
            self.state[i] = self.b[i + 1] * input + self.state[i + 1] - self.a[i + 1] * output;
        }
        self.state[last - 1] = self.b[last] * input - self.a[last] * output;

        output
    }

    /// Process a block of samples
    pub fn process_block(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Process a block in-place
    pub fn process_block_inplace(&mut self, buffer: &mut [f64]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clear the delay line
    pub fn reset(&mut self) {
        self.state.fill(0.0);
    }
}

/// Delay-line state that makes the filter's step response start in steady state
///
/// Solves `(I - Aᵀ) zi = b[1:] - a[1:] b[0]`, where `A` is the companion
/// matrix of the denominator. Scale the result by the first input sample to
/// suppress the start-up transient.
pub fn steady_state_initial(coefficients: &BandpassCoefficients) -> Result<Vec<f64>> {
    let ntaps = coefficients.ntaps();
    if ntaps < 2 {
        return Ok(Vec::new());
    }

    let a0 = coefficients.a[0];
    let coeff = |c: &[f64], i: usize| c.get(i).copied().unwrap_or(0.0) / a0;
    let n = ntaps - 1;

    let mut system = Array2::<f64>::eye(n);
    for j in 0..n {
        system[[j, 0]] += coeff(&coefficients.a, j + 1);
        if j + 1 < n {
            system[[j, j + 1]] -= 1.0;
        }
    }
    let b0 = coeff(&coefficients.b, 0);
    let rhs: Array1<f64> = (0..n)
        .map(|j| coeff(&coefficients.b, j + 1) - coeff(&coefficients.a, j + 1) * b0)
        .collect();

    solve(system, rhs).map(|zi| zi.to_vec())
}

/// Gaussian elimination with partial pivoting
fn solve(mut m: Array2<f64>, mut v: Array1<f64>) -> Result<Array1<f64>> {
    let n = v.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| m[[r1, col]].abs().total_cmp(&m[[r2, col]].abs()))
            .unwrap_or(col);
        if m[[pivot, col]].abs() < 1e-14 {
            return Err(DiagnosticsError::NumericalFailure(
                "singular system while computing filter initial conditions".to_string(),
            ));
        }
        if pivot != col {
            for k in 0..n {
                m.swap([pivot, k], [col, k]);
            }
            v.swap(pivot, col);
        }
        for row in col + 1..n {
            let factor = m[[row, col]] / m[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                m[[row, k]] -= factor * m[[col, k]];
            }
            v[row] -= factor * v[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| m[[row, k]] * x[k]).sum();
        x[row] = (v[row] - tail) / m[[row, row]];
    }
    Ok(x)
}

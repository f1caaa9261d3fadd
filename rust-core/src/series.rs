//! Immutable sample, envelope and spectrum containers
//!
//! Every series carries its own sample rate so that later stages can map
//! indices to seconds or hertz without outside bookkeeping.

use crate::error::{DiagnosticsError, Result};
use std::fmt;

/// Measurement axis of a tri-axial sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per axis
#[derive(Debug, Clone, PartialEq)]
pub struct TriAxial<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> TriAxial<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Iterate in X, Y, Z order
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &T)> {
        Axis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    pub fn each_ref(&self) -> TriAxial<&T> {
        TriAxial::new(&self.x, &self.y, &self.z)
    }

    pub fn map<U, F: FnMut(Axis, T) -> U>(self, mut f: F) -> TriAxial<U> {
        TriAxial {
            x: f(Axis::X, self.x),
            y: f(Axis::Y, self.y),
            z: f(Axis::Z, self.z),
        }
    }
}

impl<T, E> TriAxial<std::result::Result<T, E>> {
    /// Collapse per-axis results, returning the first error in X, Y, Z order
    pub fn transpose(self) -> std::result::Result<TriAxial<T>, E> {
        Ok(TriAxial {
            x: self.x?,
            y: self.y?,
            z: self.z?,
        })
    }
}

pub(crate) fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(DiagnosticsError::InvalidSampleRate(sample_rate))
    }
}

fn time_axis(len: usize, sample_rate: f64) -> Vec<f64> {
    (0..len).map(|i| i as f64 / sample_rate).collect()
}

/// Uniformly sampled real-valued signal
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries {
    values: Vec<f64>,
    sample_rate: f64,
}

impl SampleSeries {
    pub fn new(values: Vec<f64>, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        Ok(Self { values, sample_rate })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        self.values.len() as f64 / self.sample_rate
    }

    /// Sample timestamps in seconds, starting at zero
    pub fn time_axis(&self) -> Vec<f64> {
        time_axis(self.values.len(), self.sample_rate)
    }
}

/// Instantaneous amplitude of a band-passed signal (all values >= 0)
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSeries {
    values: Vec<f64>,
    sample_rate: f64,
}

impl EnvelopeSeries {
    /// Wrap precomputed envelope values
    ///
    /// Rejects negative or NaN samples, since an envelope is a magnitude.
    pub fn new(values: Vec<f64>, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        if let Some(i) = values.iter().position(|v| v.is_nan() || *v < 0.0) {
            return Err(DiagnosticsError::NumericalFailure(format!(
                "envelope sample {} is {}, expected a non-negative magnitude",
                i, values[i]
            )));
        }
        Ok(Self { values, sample_rate })
    }

    pub(crate) fn from_magnitudes(values: Vec<f64>, sample_rate: f64) -> Self {
        Self { values, sample_rate }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn time_axis(&self) -> Vec<f64> {
        time_axis(self.values.len(), self.sample_rate)
    }

    /// Samples whose timestamp lies in `[t_start, t_end]` seconds
    ///
    /// Used for zoomed views; returns an empty slice when the window misses
    /// the series entirely.
    pub fn segment(&self, t_start: f64, t_end: f64) -> &[f64] {
        if t_end.is_nan() || t_end < t_start || self.values.is_empty() {
            return &[];
        }
        let first = (t_start.max(0.0) * self.sample_rate).ceil() as usize;
        let last = (t_end * self.sample_rate).floor();
        if last < 0.0 || first >= self.values.len() {
            return &[];
        }
        let len = self.values.len();
        let end = if last >= (len - 1) as f64 {
            len
        } else {
            last as usize + 1
        };
        if first >= end {
            return &[];
        }
        &self.values[first..end]
    }

    /// Minimum and maximum over `[t_start, t_end]`, if any samples fall inside
    pub fn segment_range(&self, t_start: f64, t_end: f64) -> Option<(f64, f64)> {
        let seg = self.segment(t_start, t_end);
        if seg.is_empty() {
            return None;
        }
        let min = seg.iter().copied().fold(f64::INFINITY, f64::min);
        let max = seg.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Non-negative half of an envelope's magnitude spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSeries {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
    sample_rate: f64,
    source_len: usize,
}

impl SpectrumSeries {
    pub(crate) fn from_parts(
        frequencies: Vec<f64>,
        magnitudes: Vec<f64>,
        sample_rate: f64,
        source_len: usize,
    ) -> Self {
        debug_assert_eq!(frequencies.len(), magnitudes.len());
        Self {
            frequencies,
            magnitudes,
            sample_rate,
            source_len,
        }
    }

    /// Bin frequencies in Hz, ascending from 0
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Raw (unnormalized) transform magnitudes
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Length of the envelope this spectrum was computed from
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Frequency spacing between bins in Hz
    pub fn bin_width(&self) -> f64 {
        self.sample_rate / self.source_len as f64
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `(frequency, magnitude)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitudes.iter().copied())
    }

    /// Largest bin, optionally ignoring the DC bin
    pub fn peak(&self, skip_dc: bool) -> Option<(f64, f64)> {
        let skip = usize::from(skip_dc);
        self.iter()
            .skip(skip)
            .fold(None, |best: Option<(f64, f64)>, (f, m)| match best {
                Some((_, best_m)) if best_m >= m => best,
                _ => Some((f, m)),
            })
    }

    /// Largest bin with frequency inside `[f_low, f_high]`
    pub fn peak_in(&self, f_low: f64, f_high: f64) -> Option<(f64, f64)> {
        self.iter()
            .filter(|(f, _)| *f >= f_low && *f <= f_high)
            .fold(None, |best: Option<(f64, f64)>, (f, m)| match best {
                Some((_, best_m)) if best_m >= m => best,
                _ => Some((f, m)),
            })
    }

    /// Copy restricted to bins at or below `limit_hz` (display truncation)
    pub fn truncated(&self, limit_hz: f64) -> SpectrumSeries {
        let keep = self.frequencies.iter().take_while(|f| **f <= limit_hz).count();
        SpectrumSeries {
            frequencies: self.frequencies[..keep].to_vec(),
            magnitudes: self.magnitudes[..keep].to_vec(),
            sample_rate: self.sample_rate,
            source_len: self.source_len,
        }
    }
}

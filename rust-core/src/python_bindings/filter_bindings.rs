//! Python bindings for band-pass design and zero-phase filtering

use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::filters::{self, FilterSpec};
use crate::series::SampleSeries;

/// Butterworth band-pass coefficients `(b, a)`
///
/// Args:
///     lowcut: Lower band edge in Hz
///     highcut: Upper band edge in Hz
///     sample_rate: Sample rate in Hz
///     order: Prototype order (default: 4)
#[pyfunction]
#[pyo3(signature = (lowcut, highcut, sample_rate, order=filters::DEFAULT_ORDER))]
pub fn design_bandpass<'py>(
    py: Python<'py>,
    lowcut: f64,
    highcut: f64,
    sample_rate: f64,
    order: usize,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let spec = FilterSpec::design(lowcut, highcut, sample_rate, order)?;
    let c = spec.coefficients();
    Ok((PyArray1::from_slice(py, &c.b), PyArray1::from_slice(py, &c.a)))
}

/// Designed band-pass filter exposed to Python
#[pyclass(name = "BandpassFilter")]
pub struct PyBandpassFilter {
    spec: FilterSpec,
}

#[pymethods]
impl PyBandpassFilter {
    /// Design a new band-pass filter
    ///
    /// Args:
    ///     lowcut: Lower band edge in Hz
    ///     highcut: Upper band edge in Hz
    ///     sample_rate: Sample rate in Hz
    ///     order: Prototype order (default: 4)
    #[new]
    #[pyo3(signature = (lowcut, highcut, sample_rate, order=filters::DEFAULT_ORDER))]
    fn new(lowcut: f64, highcut: f64, sample_rate: f64, order: usize) -> PyResult<Self> {
        Ok(Self {
            spec: FilterSpec::design(lowcut, highcut, sample_rate, order)?,
        })
    }

    /// Zero-phase (forward-backward) filter a signal
    ///
    /// Args:
    ///     signal: Input samples as numpy array
    ///
    /// Returns:
    ///     Filtered samples, same length as the input
    fn filtfilt<'py>(
        &self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let series = SampleSeries::new(signal.as_array().to_vec(), self.spec.sample_rate())?;
        let filtered = py.allow_threads(|| filters::apply(&self.spec, &series))?;
        Ok(PyArray1::from_vec(py, filtered.into_values()))
    }

    /// Magnitude response in dB at the given frequencies (Hz)
    fn magnitude_response_db<'py>(
        &self,
        py: Python<'py>,
        frequencies: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let freqs = frequencies.as_array().to_vec();
        Ok(PyArray1::from_vec(py, self.spec.magnitude_response_db(&freqs)))
    }

    /// Numerator coefficients
    fn numerator<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.spec.coefficients().b)
    }

    /// Denominator coefficients
    fn denominator<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, &self.spec.coefficients().a)
    }

    /// Shortest signal `filtfilt` accepts
    fn min_signal_len(&self) -> usize {
        self.spec.min_signal_len()
    }

    fn __repr__(&self) -> String {
        format!(
            "BandpassFilter(lowcut={}, highcut={}, sample_rate={}, order={})",
            self.spec.low_hz(),
            self.spec.high_hz(),
            self.spec.sample_rate(),
            self.spec.order()
        )
    }
}

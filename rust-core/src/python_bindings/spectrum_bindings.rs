//! Python bindings for envelope extraction, envelope spectra and the full pipeline

use pyo3::prelude::*;
use pyo3::types::PyDict;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::config::PipelineConfig;
use crate::envelope;
use crate::filters::DEFAULT_ORDER;
use crate::pipeline;
use crate::series::{SampleSeries, TriAxial};
use crate::spectrum;

/// Instantaneous amplitude of a (band-passed) signal
///
/// Args:
///     signal: Input samples as numpy array
///     sample_rate: Sample rate in Hz
#[pyfunction]
pub fn envelope<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    sample_rate: f64,
) -> PyResult<&'py PyArray1<f64>> {
    let series = SampleSeries::new(signal.as_array().to_vec(), sample_rate)?;
    let env = py.allow_threads(|| envelope::extract(&series))?;
    Ok(PyArray1::from_slice(py, env.values()))
}

/// Envelope and its magnitude spectrum
///
/// Returns:
///     Tuple of (frequencies_hz, magnitudes)
#[pyfunction]
pub fn envelope_spectrum<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    sample_rate: f64,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let series = SampleSeries::new(signal.as_array().to_vec(), sample_rate)?;
    let spec = py.allow_threads(|| {
        envelope::extract(&series).and_then(|env| spectrum::analyze(&env))
    })?;
    Ok((
        PyArray1::from_slice(py, spec.frequencies()),
        PyArray1::from_slice(py, spec.magnitudes()),
    ))
}

/// Run band-pass -> envelope -> spectrum on three axes
///
/// Returns:
///     Dict keyed "x", "y", "z"; each value is a dict with "time",
///     "filtered", "envelope", "frequencies" and "magnitudes" arrays
#[pyfunction]
#[pyo3(signature = (x, y, z, lowcut, highcut, sample_rate, order=DEFAULT_ORDER, parallel=true))]
#[allow(clippy::too_many_arguments)]
pub fn run_pipeline<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<f64>,
    y: PyReadonlyArray1<f64>,
    z: PyReadonlyArray1<f64>,
    lowcut: f64,
    highcut: f64,
    sample_rate: f64,
    order: usize,
    parallel: bool,
) -> PyResult<&'py PyDict> {
    let samples = TriAxial::new(
        SampleSeries::new(x.as_array().to_vec(), sample_rate)?,
        SampleSeries::new(y.as_array().to_vec(), sample_rate)?,
        SampleSeries::new(z.as_array().to_vec(), sample_rate)?,
    );
    let mut config = PipelineConfig::new(lowcut, highcut, sample_rate, order);
    config.parallel = parallel;

    let results = py.allow_threads(|| pipeline::run(&samples, &config))?;

    let out = PyDict::new(py);
    for (axis, result) in results.iter() {
        let entry = PyDict::new(py);
        entry.set_item("time", PyArray1::from_vec(py, result.envelope.time_axis()))?;
        entry.set_item("filtered", PyArray1::from_slice(py, result.filtered.values()))?;
        entry.set_item("envelope", PyArray1::from_slice(py, result.envelope.values()))?;
        entry.set_item("frequencies", PyArray1::from_slice(py, result.spectrum.frequencies()))?;
        entry.set_item("magnitudes", PyArray1::from_slice(py, result.spectrum.magnitudes()))?;
        out.set_item(axis.label().to_lowercase(), entry)?;
    }
    Ok(out)
}

//! PyO3 bindings for Python integration

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use crate::error::DiagnosticsError;

mod filter_bindings;
mod spectrum_bindings;

impl From<DiagnosticsError> for PyErr {
    fn from(err: DiagnosticsError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn vibration_envelope(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<filter_bindings::PyBandpassFilter>()?;
    m.add_function(wrap_pyfunction!(filter_bindings::design_bandpass, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::envelope, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::envelope_spectrum, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::run_pipeline, m)?)?;

    Ok(())
}

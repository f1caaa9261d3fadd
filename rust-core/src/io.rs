//! CSV ingestion of tri-axial recordings and export of computed arrays
//!
//! Input: header-less rows of three numeric columns (X, Y, Z), one row per
//! sample. Output: plain CSV with a header row, one file for envelopes and
//! one for spectra, ready for an external plotter.

use crate::error::{DiagnosticsError, Result};
use crate::pipeline::AxisResult;
use crate::series::{SampleSeries, TriAxial};
use std::io::{Read, Write};
use std::path::Path;

/// Parse three-column samples from any reader
pub fn parse_triaxial<R: Read>(reader: R, sample_rate: f64, delimiter: u8) -> Result<TriAxial<SampleSeries>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut columns: [Vec<f64>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        if record.len() != 3 {
            return Err(DiagnosticsError::Parse {
                row,
                message: format!("expected 3 columns, found {}", record.len()),
            });
        }
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            let value: f64 = field.parse().map_err(|_| DiagnosticsError::Parse {
                row,
                message: format!("'{}' is not a number", field),
            })?;
            column.push(value);
        }
    }

    let [x, y, z] = columns;
    log::debug!("parsed {} tri-axial samples", x.len());
    Ok(TriAxial::new(
        SampleSeries::new(x, sample_rate)?,
        SampleSeries::new(y, sample_rate)?,
        SampleSeries::new(z, sample_rate)?,
    ))
}

/// Read a header-less three-column CSV file
pub fn read_triaxial_csv(path: &Path, sample_rate: f64, delimiter: u8) -> Result<TriAxial<SampleSeries>> {
    let file = std::fs::File::open(path)?;
    let samples = parse_triaxial(file, sample_rate, delimiter)?;
    log::info!("read {} samples per axis from {}", samples.x.len(), path.display());
    Ok(samples)
}

/// Write `time_s,x,y,z` rows of the three envelopes
pub fn write_envelopes<W: Write>(writer: W, results: &TriAxial<AxisResult>) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["time_s", "x", "y", "z"])?;

    check_equal_lengths("envelope", results.each_ref().map(|_, r| r.envelope.len()))?;
    let time = results.x.envelope.time_axis();
    let (x, y, z) = (
        results.x.envelope.values(),
        results.y.envelope.values(),
        results.z.envelope.values(),
    );
    for (i, t) in time.iter().enumerate() {
        out.write_record(&[t.to_string(), x[i].to_string(), y[i].to_string(), z[i].to_string()])?;
    }
    out.flush()?;
    Ok(())
}

/// Write `frequency_hz,x,y,z` rows of the three spectra up to `limit_hz`
pub fn write_spectra<W: Write>(writer: W, results: &TriAxial<AxisResult>, limit_hz: f64) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["frequency_hz", "x", "y", "z"])?;

    let spectra = TriAxial::new(
        results.x.spectrum.truncated(limit_hz),
        results.y.spectrum.truncated(limit_hz),
        results.z.spectrum.truncated(limit_hz),
    );
    check_equal_lengths("spectrum", spectra.each_ref().map(|_, s| s.len()))?;
    for (i, f) in spectra.x.frequencies().iter().enumerate() {
        out.write_record(&[
            f.to_string(),
            spectra.x.magnitudes()[i].to_string(),
            spectra.y.magnitudes()[i].to_string(),
            spectra.z.magnitudes()[i].to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

fn check_equal_lengths(what: &str, lengths: TriAxial<usize>) -> Result<()> {
    for (axis, len) in lengths.iter() {
        if *len != lengths.x {
            return Err(DiagnosticsError::DimensionMismatch(format!(
                "axis {} {} has {} values but axis X has {}",
                axis, what, len, lengths.x
            )));
        }
    }
    Ok(())
}

/// Write envelopes to a file path
pub fn write_envelopes_file(path: &Path, results: &TriAxial<AxisResult>) -> Result<()> {
    write_envelopes(std::fs::File::create(path)?, results)?;
    log::info!("wrote envelopes to {}", path.display());
    Ok(())
}

/// Write spectra to a file path
pub fn write_spectra_file(path: &Path, results: &TriAxial<AxisResult>, limit_hz: f64) -> Result<()> {
    write_spectra(std::fs::File::create(path)?, results, limit_hz)?;
    log::info!("wrote spectra up to {} Hz to {}", limit_hz, path.display());
    Ok(())
}

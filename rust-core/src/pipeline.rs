//! Tri-axial envelope pipeline
//!
//! One filter design shared by all axes; each axis then runs
//! filter -> envelope -> spectrum to completion on its own worker.

use crate::config::PipelineConfig;
use crate::envelope;
use crate::error::{DiagnosticsError, Result, Stage};
use crate::filters::{self, FilterSpec};
use crate::series::{Axis, EnvelopeSeries, SampleSeries, SpectrumSeries, TriAxial};
use crate::spectrum::SpectrumAnalyzer;

/// Everything computed for one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisResult {
    /// Band-passed signal
    pub filtered: SampleSeries,

    /// Instantaneous amplitude of `filtered`
    pub envelope: EnvelopeSeries,

    /// Magnitude spectrum of `envelope`
    pub spectrum: SpectrumSeries,
}

/// Designed pipeline, reusable across runs with the same configuration
#[derive(Debug, Clone)]
pub struct EnvelopePipeline {
    config: PipelineConfig,
    filter: FilterSpec,
}

impl EnvelopePipeline {
    /// Design the shared band-pass filter
    ///
    /// Fails before touching any samples if the band, order or sample rate
    /// is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let filter = FilterSpec::design(config.lowcut, config.highcut, config.sample_rate, config.order)?;
        Ok(Self { config, filter })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Run all three axes; the first failure (in X, Y, Z order) aborts the run
    pub fn process(&self, samples: &TriAxial<SampleSeries>) -> Result<TriAxial<AxisResult>> {
        self.check_dimensions(samples)?;

        log::info!(
            "processing {} samples per axis at {} Hz, band [{}, {}] Hz, order {}{}",
            samples.x.len(),
            self.config.sample_rate,
            self.config.lowcut,
            self.config.highcut,
            self.config.order,
            if self.config.parallel { ", parallel" } else { "" }
        );

        let results = if self.config.parallel {
            self.process_parallel(samples)
        } else {
            let mut analyzer = SpectrumAnalyzer::new();
            TriAxial::new(
                process_axis(Axis::X, &self.filter, &samples.x, &mut analyzer),
                process_axis(Axis::Y, &self.filter, &samples.y, &mut analyzer),
                process_axis(Axis::Z, &self.filter, &samples.z, &mut analyzer),
            )
        };

        results.transpose()
    }

    fn process_parallel(&self, samples: &TriAxial<SampleSeries>) -> TriAxial<Result<AxisResult>> {
        let filter = &self.filter;
        std::thread::scope(|scope| {
            let spawn = |axis: Axis| {
                let series = samples.get(axis);
                scope.spawn(move || {
                    let mut analyzer = SpectrumAnalyzer::new();
                    process_axis(axis, filter, series, &mut analyzer)
                })
            };
            let handles = TriAxial::new(spawn(Axis::X), spawn(Axis::Y), spawn(Axis::Z));
            handles.map(|_, handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
        })
    }

    fn check_dimensions(&self, samples: &TriAxial<SampleSeries>) -> Result<()> {
        let len = samples.x.len();
        for (axis, series) in samples.iter() {
            if series.len() != len {
                return Err(DiagnosticsError::DimensionMismatch(format!(
                    "axis {} has {} samples but axis X has {}",
                    axis,
                    series.len(),
                    len
                )));
            }
            if series.sample_rate() != self.config.sample_rate {
                return Err(DiagnosticsError::DimensionMismatch(format!(
                    "axis {} sampled at {} Hz but the run is configured for {} Hz",
                    axis,
                    series.sample_rate(),
                    self.config.sample_rate
                )));
            }
        }
        Ok(())
    }
}

fn process_axis(
    axis: Axis,
    filter: &FilterSpec,
    series: &SampleSeries,
    analyzer: &mut SpectrumAnalyzer,
) -> Result<AxisResult> {
    let filtered = filters::apply(filter, series).map_err(|e| e.in_axis(axis, Stage::Filter))?;
    let envelope = envelope::extract(&filtered).map_err(|e| e.in_axis(axis, Stage::Envelope))?;
    let spectrum = analyzer
        .analyze(&envelope)
        .map_err(|e| e.in_axis(axis, Stage::Spectrum))?;

    if let Some((freq, mag)) = spectrum.peak(true) {
        log::debug!("axis {}: dominant envelope frequency {:.3} Hz (|X| = {:.3e})", axis, freq, mag);
    }

    Ok(AxisResult {
        filtered,
        envelope,
        spectrum,
    })
}

/// Design the filter from `config` and process `samples` in one call
pub fn run(samples: &TriAxial<SampleSeries>, config: &PipelineConfig) -> Result<TriAxial<AxisResult>> {
    EnvelopePipeline::new(*config)?.process(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn am_axis(n: usize, fs: f64, carrier: f64, modulation: f64, depth: f64) -> SampleSeries {
        let values = (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                (1.0 + depth * (2.0 * PI * modulation * t).sin()) * (2.0 * PI * carrier * t).sin()
            })
            .collect();
        SampleSeries::new(values, fs).unwrap()
    }

    fn tri(n: usize) -> TriAxial<SampleSeries> {
        TriAxial::new(
            am_axis(n, 1000.0, 100.0, 10.0, 0.5),
            am_axis(n, 1000.0, 120.0, 8.0, 0.3),
            am_axis(n, 1000.0, 80.0, 12.5, 0.7),
        )
    }

    #[test]
    fn test_per_axis_dominant_frequency() {
        let results = run(&tri(2000), &PipelineConfig::default()).unwrap();
        let expected = TriAxial::new(10.0, 8.0, 12.5);
        for (axis, result) in results.iter() {
            assert_eq!(result.envelope.len(), 2000);
            assert_eq!(result.filtered.len(), 2000);
            assert_eq!(result.spectrum.len(), 1000);
            let (freq, _) = result.spectrum.peak(true).unwrap();
            assert!((freq - expected.get(axis)).abs() <= 0.5, "axis {}: {}", axis, freq);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let samples = tri(1500);
        let parallel = run(&samples, &PipelineConfig::default()).unwrap();
        let sequential = run(&samples, &PipelineConfig::default().sequential()).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_invalid_band_fails_before_processing() {
        let config = PipelineConfig::new(300.0, 100.0, 1000.0, 4);
        assert!(matches!(
            run(&tri(10), &config),
            Err(DiagnosticsError::InvalidBand { .. })
        ));
    }

    #[test]
    fn test_unequal_lengths_rejected() {
        let mut samples = tri(500);
        samples.z = am_axis(400, 1000.0, 100.0, 10.0, 0.5);
        assert!(matches!(
            run(&samples, &PipelineConfig::default()),
            Err(DiagnosticsError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_sample_rate_mismatch_rejected() {
        let mut samples = tri(500);
        samples.y = SampleSeries::new(samples.y.values().to_vec(), 2000.0).unwrap();
        assert!(matches!(
            run(&samples, &PipelineConfig::default()),
            Err(DiagnosticsError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_short_input_reports_axis_and_stage() {
        for config in [PipelineConfig::default(), PipelineConfig::default().sequential()] {
            let err = run(&tri(3), &config).unwrap_err();
            match err {
                DiagnosticsError::Axis { axis, stage, ref source } => {
                    assert_eq!(axis, Axis::X);
                    assert_eq!(stage, Stage::Filter);
                    assert!(matches!(
                        **source,
                        DiagnosticsError::InsufficientSamples { len: 3, required: 28 }
                    ));
                }
                other => panic!("expected axis context, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_pipeline_reusable() {
        let pipeline = EnvelopePipeline::new(PipelineConfig::default()).unwrap();
        let samples = tri(800);
        let first = pipeline.process(&samples).unwrap();
        let second = pipeline.process(&samples).unwrap();
        assert_eq!(first, second);
        assert_eq!(pipeline.filter().order(), 4);
    }
}

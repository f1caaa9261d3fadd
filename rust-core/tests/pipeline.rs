use std::f64::consts::PI;
use vibration_envelope::{
    design, envelope, filters, run, spectrum, Axis, DiagnosticsError, PipelineConfig, SampleSeries,
    Stage, TriAxial,
};

const FS: f64 = 1000.0;
const N: usize = 2000;

/// 100 Hz carrier, amplitude-modulated at 10 Hz
fn am_signal() -> Vec<f64> {
    (0..N)
        .map(|i| {
            let t = i as f64 / FS;
            (1.0 + 0.5 * (2.0 * PI * 10.0 * t).sin()) * (2.0 * PI * 100.0 * t).sin()
        })
        .collect()
}

fn am_tri() -> TriAxial<SampleSeries> {
    let s = SampleSeries::new(am_signal(), FS).unwrap();
    TriAxial::new(s.clone(), s.clone(), s)
}

#[test]
fn am_round_trip_reveals_modulation_frequency() {
    let config = PipelineConfig::new(20.0, 200.0, FS, 4);
    let results = run(&am_tri(), &config).unwrap();
    let x = &results.x;

    // Band-pass isolates the carrier and its sidebands unchanged
    let raw = am_signal();
    for i in 200..1800 {
        assert!((x.filtered.values()[i] - raw[i]).abs() < 0.03, "sample {}", i);
    }

    // Envelope follows 1 + 0.5 sin(2π·10t) and is never negative
    assert!(x.envelope.values().iter().all(|&v| v >= 0.0));
    for i in 200..1800 {
        let expected = 1.0 + 0.5 * (2.0 * PI * 10.0 * i as f64 / FS).sin();
        assert!((x.envelope.values()[i] - expected).abs() < 0.03, "sample {}", i);
    }

    // Envelope spectrum: peak at 10 Hz (+/- one 0.5 Hz bin), at least 3x every
    // other non-DC bin below 50 Hz
    let spectrum = &x.spectrum;
    assert_eq!(spectrum.len(), N / 2);
    let (peak_freq, peak_mag) = spectrum.peak_in(0.1, 50.0).unwrap();
    assert!((peak_freq - 10.0).abs() <= spectrum.bin_width(), "peak at {}", peak_freq);
    for (f, m) in spectrum.iter().skip(1).take_while(|(f, _)| *f < 50.0) {
        if (f - peak_freq).abs() > spectrum.bin_width() {
            assert!(peak_mag >= 3.0 * m, "{} Hz bin {} vs peak {}", f, m, peak_mag);
        }
    }
}

#[test]
fn stages_compose_like_the_pipeline() {
    let spec = design(20.0, 200.0, FS, 4).unwrap();
    let signal = SampleSeries::new(am_signal(), FS).unwrap();
    let filtered = filters::apply(&spec, &signal).unwrap();
    let env = envelope::extract(&filtered).unwrap();
    let spec_series = spectrum::analyze(&env).unwrap();

    let results = run(&am_tri(), &PipelineConfig::new(20.0, 200.0, FS, 4)).unwrap();
    assert_eq!(&results.y.filtered, &filtered);
    assert_eq!(&results.y.envelope, &env);
    assert_eq!(&results.y.spectrum, &spec_series);
}

#[test]
fn spectrum_covers_non_negative_half() {
    let results = run(&am_tri(), &PipelineConfig::default()).unwrap();
    for (_, result) in results.iter() {
        let freqs = result.spectrum.frequencies();
        assert_eq!(freqs.len(), N / 2);
        assert_eq!(freqs[0], 0.0);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
        assert!(*freqs.last().unwrap() < FS / 2.0);
    }
}

#[test]
fn inverted_band_fails_fast() {
    let err = design(300.0, 100.0, FS, 4).unwrap_err();
    assert!(matches!(err, DiagnosticsError::InvalidBand { .. }));

    let err = run(&am_tri(), &PipelineConfig::new(300.0, 100.0, FS, 4)).unwrap_err();
    assert!(matches!(err, DiagnosticsError::InvalidBand { .. }));
}

#[test]
fn three_samples_with_order_four_is_rejected() {
    let spec = design(20.0, 200.0, FS, 4).unwrap();
    let short = SampleSeries::new(vec![1.0, -1.0, 0.5], FS).unwrap();
    assert!(matches!(
        filters::apply(&spec, &short),
        Err(DiagnosticsError::InsufficientSamples { len: 3, .. })
    ));

    let tri = TriAxial::new(short.clone(), short.clone(), short);
    let err = run(&tri, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        DiagnosticsError::Axis {
            axis: Axis::X,
            stage: Stage::Filter,
            ..
        }
    ));
    assert!(err.to_string().contains("axis X"));
}

#[test]
fn rerun_is_bit_identical() {
    let samples = am_tri();
    let config = PipelineConfig::default();
    let first = run(&samples, &config).unwrap();
    let second = run(&samples, &config).unwrap();
    let sequential = run(&samples, &config.sequential()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, sequential);
}

#[test]
fn identical_axes_give_identical_results() {
    let results = run(&am_tri(), &PipelineConfig::default()).unwrap();
    assert_eq!(results.x, results.y);
    assert_eq!(results.y, results.z);
}

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vibration_envelope::{io, DiagnosticsConfig, EnvelopePipeline};

#[derive(Parser)]
#[command(
    name = "envelope-scan",
    version,
    about = "Band-pass, envelope and envelope spectrum of a tri-axial vibration recording"
)]
struct Cli {
    /// Header-less CSV with X, Y, Z columns
    #[arg(long)]
    input: PathBuf,
    /// TOML configuration file (command-line flags take precedence)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    lowcut: Option<f64>,
    #[arg(long)]
    highcut: Option<f64>,
    #[arg(long)]
    sample_rate: Option<f64>,
    #[arg(long)]
    order: Option<usize>,
    /// Highest frequency written to the spectrum output
    #[arg(long)]
    freq_limit: Option<f64>,
    /// Process axes one after another instead of in parallel
    #[arg(long)]
    sequential: bool,
    /// Column delimiter of the input file
    #[arg(long, default_value_t = ',')]
    delimiter: char,
    /// Where to write time_s,x,y,z envelope rows
    #[arg(long)]
    envelope_out: Option<PathBuf>,
    /// Where to write frequency_hz,x,y,z spectrum rows
    #[arg(long)]
    spectrum_out: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<DiagnosticsConfig> {
        let mut config = match &self.config {
            Some(path) => DiagnosticsConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => DiagnosticsConfig::default(),
        };
        if let Some(v) = self.lowcut {
            config.lowcut = v;
        }
        if let Some(v) = self.highcut {
            config.highcut = v;
        }
        if let Some(v) = self.sample_rate {
            config.sample_rate = v;
        }
        if let Some(v) = self.order {
            config.filter_order = v;
        }
        if let Some(v) = self.freq_limit {
            config.display_frequency_limit = v;
        }
        if self.sequential {
            config.parallel = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if !cli.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }
    let config = cli.resolve_config()?;
    let pipeline = EnvelopePipeline::new(config.pipeline()?).context("invalid filter settings")?;

    let samples = io::read_triaxial_csv(&cli.input, config.sample_rate, cli.delimiter as u8)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let results = pipeline.process(&samples)?;

    for (axis, result) in results.iter() {
        match result.spectrum.peak(true) {
            Some((freq, mag)) => log::info!(
                "axis {}: dominant envelope frequency {:.3} Hz (magnitude {:.4e})",
                axis,
                freq,
                mag
            ),
            None => log::info!("axis {}: spectrum has no non-DC bins", axis),
        }
    }

    if let Some(path) = &cli.envelope_out {
        io::write_envelopes_file(path, &results)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &cli.spectrum_out {
        io::write_spectra_file(path, &results, config.display_frequency_limit)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

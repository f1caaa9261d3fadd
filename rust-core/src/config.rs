//! Run configuration
//!
//! `DiagnosticsConfig` is what users write (TOML, every key optional);
//! `PipelineConfig` is the validated, immutable subset the pipeline reads.

use crate::error::Result;
use crate::filters::design::check_parameters;
use crate::filters::DEFAULT_ORDER;
use serde::Deserialize;
use std::path::Path;

/// User-facing configuration surface
///
/// ```toml
/// lowcut = 20.0
/// highcut = 200.0
/// sample_rate = 1000
/// filter_order = 4
/// display_frequency_limit = 500.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Lower band edge in Hz
    pub lowcut: f64,

    /// Upper band edge in Hz
    pub highcut: f64,

    /// Sample rate of the input in Hz
    pub sample_rate: f64,

    /// Butterworth prototype order
    pub filter_order: usize,

    /// Upper frequency shown in spectrum views (not used by the computation)
    pub display_frequency_limit: f64,

    /// Process the three axes on separate threads
    pub parallel: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            lowcut: 20.0,
            highcut: 200.0,
            sample_rate: 1000.0,
            filter_order: DEFAULT_ORDER,
            display_frequency_limit: 500.0,
            parallel: true,
        }
    }
}

impl DiagnosticsConfig {
    /// Parse TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check everything the filter designer would reject, without designing
    pub fn validate(&self) -> Result<()> {
        check_parameters(self.lowcut, self.highcut, self.sample_rate, self.filter_order)?;
        Ok(())
    }

    /// Validated pipeline parameters
    pub fn pipeline(&self) -> Result<PipelineConfig> {
        self.validate()?;
        Ok(PipelineConfig {
            lowcut: self.lowcut,
            highcut: self.highcut,
            sample_rate: self.sample_rate,
            order: self.filter_order,
            parallel: self.parallel,
        })
    }
}

/// Immutable parameters shared by every axis of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub lowcut: f64,
    pub highcut: f64,
    pub sample_rate: f64,
    pub order: usize,
    pub parallel: bool,
}

impl PipelineConfig {
    pub fn new(lowcut: f64, highcut: f64, sample_rate: f64, order: usize) -> Self {
        Self {
            lowcut,
            highcut,
            sample_rate,
            order,
            parallel: true,
        }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let d = DiagnosticsConfig::default();
        Self::new(d.lowcut, d.highcut, d.sample_rate, d.filter_order)
    }
}

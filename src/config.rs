//! Run configuration.
//!
//! Fit parameters can come from three places, highest priority first:
//! command-line flags, an optional TOML file, built-in defaults.
//!
//! ```toml
//! # cest.toml
//! [fit]
//! frequency = 60.81
//! sat_freq = 25.0
//! mixing_time = 0.5
//! ini_r2a = 20.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::filter::Selection;
use crate::error::{ConvertError, Result};

// ---------------------------------------------------------------------------
// FitParameters – constant for every residue in one run
// ---------------------------------------------------------------------------

/// Experiment constants and fit seeds written into the ONEST header and
/// residue blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParameters {
    /// Nitrogen frequency (MHz).
    pub frequency: f64,
    /// Saturation field strength (Hz).
    pub sat_freq: f64,
    /// CEST mixing time (s).
    pub mixing_time: f64,
    /// Initial R2a.
    pub ini_r2a: f64,
    /// Initial R2b.
    pub ini_r2b: f64,
    /// Initial dw.
    pub ini_dw: f64,
}

impl Default for FitParameters {
    fn default() -> Self {
        Self {
            frequency: 80.12,
            sat_freq: 15.0,
            mixing_time: 0.4,
            ini_r2a: 25.0,
            ini_r2b: 0.0,
            ini_dw: 0.0,
        }
    }
}

/// A partial set of fit parameters, as given on the command line or in a
/// config file.  Unset fields fall through to the next source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitOverrides {
    pub frequency: Option<f64>,
    pub sat_freq: Option<f64>,
    pub mixing_time: Option<f64>,
    pub ini_r2a: Option<f64>,
    pub ini_r2b: Option<f64>,
    pub ini_dw: Option<f64>,
}

impl FitOverrides {
    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: FitOverrides) -> FitOverrides {
        FitOverrides {
            frequency: self.frequency.or(fallback.frequency),
            sat_freq: self.sat_freq.or(fallback.sat_freq),
            mixing_time: self.mixing_time.or(fallback.mixing_time),
            ini_r2a: self.ini_r2a.or(fallback.ini_r2a),
            ini_r2b: self.ini_r2b.or(fallback.ini_r2b),
            ini_dw: self.ini_dw.or(fallback.ini_dw),
        }
    }

    /// Resolve against the built-in defaults.
    pub fn resolve(self) -> FitParameters {
        let d = FitParameters::default();
        FitParameters {
            frequency: self.frequency.unwrap_or(d.frequency),
            sat_freq: self.sat_freq.unwrap_or(d.sat_freq),
            mixing_time: self.mixing_time.unwrap_or(d.mixing_time),
            ini_r2a: self.ini_r2a.unwrap_or(d.ini_r2a),
            ini_r2b: self.ini_r2b.unwrap_or(d.ini_r2b),
            ini_dw: self.ini_dw.unwrap_or(d.ini_dw),
        }
    }
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// Root of a TOML configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub fit: FitOverrides,
}

impl ConfigFile {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

// ---------------------------------------------------------------------------
// RunConfig – everything one conversion needs
// ---------------------------------------------------------------------------

/// Built once at startup and handed to [`crate::run`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub params: FitParameters,
    pub selection: Selection,
}

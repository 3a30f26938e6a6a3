//! # cest2onest
//!
//! Converts peak-picked CEST intensity tables (one residue per row, one
//! saturation offset per column) into the tab-delimited input format of the
//! ONEST exchange-fitting program.
//!
//! The pipeline is strictly sequential:
//!
//! ```text
//! load_table  →  select  →  write_onest
//! ```
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use cest2onest::config::{FitParameters, RunConfig};
//! use cest2onest::data::filter::Selection;
//!
//! let config = RunConfig {
//!     input: PathBuf::from("peaks.tsv"),
//!     output: PathBuf::from("onest.txt"),
//!     params: FitParameters::default(),
//!     selection: Selection::Names(vec!["G23".into()]),
//! };
//! cest2onest::run(&config)?;
//! # Ok::<(), cest2onest::error::ConvertError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;

use log::info;

use config::RunConfig;
use error::Result;

/// Run one conversion: load, select, write.
pub fn run(config: &RunConfig) -> Result<()> {
    info!("Input:  {}", config.input.display());
    info!("Output: {}", config.output.display());

    let table = data::loader::load_table(&config.input)?;
    let view = data::filter::select(&table, &config.selection)?;
    data::writer::write_onest(&view, &config.params, &config.output)
}

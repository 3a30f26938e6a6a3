use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cest2onest::config::{ConfigFile, FitOverrides, RunConfig};
use cest2onest::data::filter::Selection;

/// Converting modified Sparky CEST data to ONEST input format
#[derive(Parser)]
#[command(name = "cest2onest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file path
    #[arg(short = 'f', long = "file", value_name = "INPUT")]
    file: PathBuf,

    /// Output file path
    #[arg(short = 'o', long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Nitrogen frequency (MHz) [default: 80.12]
    #[arg(long, visible_alias = "frq")]
    frequency: Option<f64>,

    /// Saturation frequency (Hz) [default: 15]
    #[arg(long, visible_alias = "sf")]
    sat_freq: Option<f64>,

    /// Mixing time of CEST (s) [default: 0.4]
    #[arg(long, visible_alias = "mix")]
    mixing_time: Option<f64>,

    /// Initial value of R2a [default: 25]
    #[arg(long, visible_alias = "r2a")]
    ini_r2a: Option<f64>,

    /// Initial value of R2b [default: 0]
    #[arg(long, visible_alias = "r2b")]
    ini_r2b: Option<f64>,

    /// Initial value of dw [default: 0]
    #[arg(long, visible_alias = "dw")]
    ini_dw: Option<f64>,

    /// Residue numbers (1-based rows of the input table)
    #[arg(short = 's', long, num_args = 1.., allow_negative_numbers = true,
          conflicts_with = "select_name")]
    select_number: Option<Vec<i64>>,

    /// Residue names (substring of any cell in a row)
    #[arg(long, visible_alias = "sn", num_args = 1..)]
    select_name: Option<Vec<String>>,

    /// TOML file with a [fit] table of default parameters
    #[arg(short = 'c', long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_run_config(self) -> Result<RunConfig> {
        let from_file = match &self.config {
            Some(path) => ConfigFile::from_file(path)?.fit,
            None => FitOverrides::default(),
        };
        let from_flags = FitOverrides {
            frequency: self.frequency,
            sat_freq: self.sat_freq,
            mixing_time: self.mixing_time,
            ini_r2a: self.ini_r2a,
            ini_r2b: self.ini_r2b,
            ini_dw: self.ini_dw,
        };

        let selection = match (self.select_number, self.select_name) {
            (Some(numbers), _) => Selection::Positions(numbers),
            (None, Some(names)) => Selection::Names(names),
            (None, None) => Selection::All,
        };

        Ok(RunConfig {
            input: self.file,
            output: self.output,
            params: from_flags.or(from_file).resolve(),
            selection,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = cli.into_run_config()?;
    cest2onest::run(&config)?;

    println!(
        "The conversion process is complete. Output file: {}",
        config.output.display()
    );
    Ok(())
}

use std::path::PathBuf;

/// Everything that can stop a conversion run.
///
/// Every variant is terminal: the pipeline reports one of these and stops.
/// Out-of-range positional selections are not errors (they are logged and
/// dropped by the selector).
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input table does not exist.
    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    /// The input table exists but could not be read or decoded.
    #[error("Error reading input file '{}': {reason}", path.display())]
    ParseFailure { path: PathBuf, reason: String },

    /// A name selection matched no row.
    #[error("Please check residue name! Input name: {0:?}")]
    NoMatchingResidue(Vec<String>),

    /// A row carries too few intensities to estimate its noise.
    #[error("Residue '{residue}' has {found} intensity value(s); at least 2 are needed for a noise estimate")]
    InsufficientData { residue: String, found: usize },

    /// The destination could not be opened or written.
    #[error("Error writing to file '{}': {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML configuration file is unreadable or invalid.
    #[error("Invalid configuration '{}': {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

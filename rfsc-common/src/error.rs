//! Common error types for RFSC
//!
//! One taxonomy shared by the ingest, slicing and characterization stages.
//! Individual malformed numeric cells are never errors; they become missing
//! values and only fail a computation when nothing usable is left.

use thiserror::Error;

/// Common result type for RFSC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Section of the analyzer export a parse failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Whole file (section split stage)
    File,
    /// Section 2: frequency/magnitude table
    InstantSpectrum,
    /// Section 3: frequency bins x time instants matrix
    Spectrogram,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::File => "file",
            Section::InstantSpectrum => "instantaneous spectrum",
            Section::Spectrogram => "spectrogram",
        };
        f.write_str(name)
    }
}

/// Common error types across RFSC crates
#[derive(Error, Debug)]
pub enum Error {
    /// Source unreadable or missing (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid UTF-8 text
    #[error("Decode error: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// Malformed section structure
    #[error("Parse error in {section} section: {message}")]
    Parse { section: Section, message: String },

    /// Instant index outside the matrix
    #[error("Range error: index {index} out of range, {}", range_hint(.instants))]
    Range { index: i64, instants: usize },

    /// Metric cannot be computed from the slice
    #[error("Compute error: {0}")]
    Compute(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller-supplied parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn parse(section: Section, message: impl Into<String>) -> Self {
        Error::Parse {
            section,
            message: message.into(),
        }
    }
}

fn range_hint(instants: &usize) -> String {
    match *instants {
        0 => "spectrogram has no instants".to_string(),
        n => format!("must be between 0 and {} inclusive", n - 1),
    }
}

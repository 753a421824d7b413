//! Analyzer export ingest
//!
//! An export holds three blank-line separated sections:
//! 1. metadata lines (`key;value;unit` or `key;value`)
//! 2. instantaneous spectrum table (`Frequency [Hz];Magnitude [dBm]` header)
//! 3. spectrogram matrix (three preamble lines, then frequency bin + one
//!    amplitude per time instant on each row)
//!
//! Normalization (separator runs, decimal commas, line endings) is applied
//! to the whole text before the sections are split. Sections past the third
//! are ignored.

pub mod instant;
pub mod matrix;
pub mod metadata;
pub mod normalize;

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result, Section};
use crate::spectrogram::SpectrogramMatrix;

pub use instant::{InstantRow, InstantSpectrum};
pub use metadata::{Metadata, MetadataValue};

/// Number of sections an export must contain
pub const REQUIRED_SECTIONS: usize = 3;

/// Everything parsed from one analyzer export
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFile {
    pub metadata: Metadata,
    pub instant_spectrum: InstantSpectrum,
    pub spectrogram: SpectrogramMatrix,
}

impl SpectrumFile {
    /// Log what was parsed (entry counts and matrix shape)
    pub fn log_summary(&self) {
        let extent = self.spectrogram.render_extent();
        debug!(
            metadata_entries = self.metadata.len(),
            instant_rows = self.instant_spectrum.len(),
            bins = extent.bins,
            instants = extent.instants,
            frequency_min = ?extent.frequency_min,
            frequency_max = ?extent.frequency_max,
            "Parsed spectrum export"
        );
        for (key, value) in self.metadata.iter() {
            match value.unit() {
                Some(unit) => debug!("  {}: {} {}", key, value.value(), unit),
                None => debug!("  {}: {}", key, value.value()),
            }
        }
    }
}

/// Read and parse an export file
pub fn ingest_path(path: impl AsRef<Path>) -> Result<SpectrumFile> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    info!(path = %path.display(), size = bytes.len(), "Ingesting spectrum export");
    ingest_bytes(&bytes)
}

/// Decode and parse an export held in memory
///
/// Bytes must be UTF-8; a leading byte-order mark is allowed.
pub fn ingest_bytes(bytes: &[u8]) -> Result<SpectrumFile> {
    let text = std::str::from_utf8(bytes)?;
    ingest_str(text)
}

/// Parse export text
pub fn ingest_str(raw: &str) -> Result<SpectrumFile> {
    let text = normalize::normalize_text(raw);
    let sections = normalize::split_sections(&text);

    if sections.len() < REQUIRED_SECTIONS {
        return Err(Error::parse(
            Section::File,
            format!(
                "expected {} blank-line separated sections, found {}",
                REQUIRED_SECTIONS,
                sections.len()
            ),
        ));
    }
    if sections.len() > REQUIRED_SECTIONS {
        debug!(
            ignored = sections.len() - REQUIRED_SECTIONS,
            "Ignoring trailing sections"
        );
    }

    let file = SpectrumFile {
        metadata: metadata::parse_metadata(sections[0]),
        instant_spectrum: instant::parse_instant_spectrum(sections[1])?,
        spectrogram: matrix::parse_spectrogram(sections[2])?,
    };
    file.log_summary();

    Ok(file)
}

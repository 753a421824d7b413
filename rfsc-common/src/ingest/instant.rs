//! Instantaneous spectrum section parsing (section 2 of the export)
//!
//! Header-first table with a frequency and a magnitude column. The table is
//! informational: characterization works on the spectrogram matrix only.

use serde::Serialize;

use super::normalize::{parse_number, split_fields};
use crate::error::{Error, Result, Section};

/// Header label of the frequency column
pub const FREQUENCY_COLUMN: &str = "Frequency [Hz]";

/// Header label of the magnitude column
pub const MAGNITUDE_COLUMN: &str = "Magnitude [dBm]";

/// One row of the instantaneous spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstantRow {
    /// Frequency in Hz (missing if the cell was not numeric)
    pub frequency_hz: Option<f64>,
    /// Magnitude in dBm (missing if the cell was not numeric)
    pub magnitude_dbm: Option<f64>,
}

/// Frequency/magnitude table in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstantSpectrum {
    pub rows: Vec<InstantRow>,
}

impl InstantSpectrum {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse the instantaneous spectrum section
///
/// The first non-blank line is the header. Both required columns are looked
/// up by trimmed name; extra columns are ignored. Cells that are absent or
/// not numeric become missing.
pub fn parse_instant_spectrum(text: &str) -> Result<InstantSpectrum> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::parse(Section::InstantSpectrum, "missing header row"))?;
    let columns: Vec<&str> = split_fields(header).into_iter().map(str::trim).collect();

    let frequency_idx = column_index(&columns, FREQUENCY_COLUMN)?;
    let magnitude_idx = column_index(&columns, MAGNITUDE_COLUMN)?;

    let rows = lines
        .map(|line| {
            let fields = split_fields(line);
            let cell = |idx: usize| fields.get(idx).and_then(|c| parse_number(c));
            InstantRow {
                frequency_hz: cell(frequency_idx),
                magnitude_dbm: cell(magnitude_idx),
            }
        })
        .collect();

    Ok(InstantSpectrum { rows })
}

fn column_index(columns: &[&str], name: &str) -> Result<usize> {
    columns.iter().position(|c| *c == name).ok_or_else(|| {
        Error::parse(
            Section::InstantSpectrum,
            format!("missing column '{}' (found: {})", name, columns.join(", ")),
        )
    })
}

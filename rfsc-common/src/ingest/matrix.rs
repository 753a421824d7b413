//! Spectrogram section parsing (section 3 of the export)

use super::normalize::{parse_number, split_fields};
use crate::error::{Error, Result, Section};
use crate::spectrogram::{Cell, SpectrogramMatrix};

/// Lines at the top of the spectrogram section that never hold data
pub const SPECTROGRAM_PREAMBLE_LINES: usize = 3;

/// Parse the spectrogram section into a matrix
///
/// The first three lines are dropped unconditionally, blank lines are
/// skipped, and the first data row fixes the table width. Shorter rows are
/// padded with missing cells; longer rows are rejected. Column 0 is the
/// frequency axis (coerced to numbers); the remaining columns are instants.
pub fn parse_spectrogram(text: &str) -> Result<SpectrogramMatrix> {
    let rows: Vec<(usize, Vec<&str>)> = text
        .lines()
        .enumerate()
        .skip(SPECTROGRAM_PREAMBLE_LINES)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_no, line)| (line_no, split_fields(line)))
        .collect();

    let width = match rows.first() {
        Some((_, fields)) => fields.len(),
        None => return SpectrogramMatrix::new(Vec::new(), Vec::new()),
    };

    let instant_count = width - 1;
    let mut frequency_axis = Vec::with_capacity(rows.len());
    let mut instants: Vec<Vec<Cell>> = (0..instant_count)
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();

    for (line_no, fields) in &rows {
        if fields.len() > width {
            return Err(Error::parse(
                Section::Spectrogram,
                format!(
                    "line {} has {} fields, expected {}",
                    line_no + 1,
                    fields.len(),
                    width
                ),
            ));
        }

        frequency_axis.push(parse_number(fields[0]));
        for (idx, column) in instants.iter_mut().enumerate() {
            let cell = fields
                .get(idx + 1)
                .map(|field| Cell::from_field(field))
                .unwrap_or(Cell::Missing);
            column.push(cell);
        }
    }

    SpectrogramMatrix::new(frequency_axis, instants)
}

//! Text normalization and low-level field handling for analyzer exports
//!
//! The analyzer writes `;`-separated fields with locale decimal commas and
//! pads some rows with runs of empty fields. Everything here operates on the
//! whole text before it is split into sections.

/// Field separator used by every section of the export
pub const FIELD_SEPARATOR: char = ';';

/// Byte-order mark some exporters prepend to the text
const BOM: char = '\u{feff}';

/// Normalize raw export text
///
/// Steps, in order:
/// 1. Strip a leading byte-order mark
/// 2. Convert `\r\n` and lone `\r` line endings to `\n`
/// 3. Remove every run of two or more consecutive separators
/// 4. Replace every decimal comma with a decimal point
///
/// Step 3 deletes the run entirely (it is not collapsed to one separator),
/// so `a;;b` becomes `ab`. Exports only produce such runs as trailing
/// padding, where deleting them drops the padding.
pub fn normalize_text(raw: &str) -> String {
    let text = raw.strip_prefix(BOM).unwrap_or(raw);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = remove_separator_runs(&text);
    text.replace(',', ".")
}

/// Remove runs of two or more consecutive field separators
fn remove_separator_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    for c in text.chars() {
        if c == FIELD_SEPARATOR {
            run += 1;
            continue;
        }
        if run == 1 {
            out.push(FIELD_SEPARATOR);
        }
        run = 0;
        out.push(c);
    }
    if run == 1 {
        out.push(FIELD_SEPARATOR);
    }

    out
}

/// Split normalized text into blank-line separated sections
///
/// Sections are returned verbatim (no trimming); a section may start with a
/// newline when the source used more than one blank line.
pub fn split_sections(text: &str) -> Vec<&str> {
    text.split("\n\n").collect()
}

/// Split one line into its fields
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).collect()
}

/// Coerce a cell to a number
///
/// Empty, non-numeric and non-finite (`NaN`, `inf`) cells are missing
/// (`None`), never an error.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

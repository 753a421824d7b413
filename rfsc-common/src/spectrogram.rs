//! Spectrogram matrix and per-instant slicing
//!
//! The matrix is stored column-wise: one frequency-axis column plus one
//! column per time instant, every column `bins()` rows long. Instant columns
//! are labelled by their zero-based index.

use serde::Serialize;

use crate::error::{Error, Result};

/// Label of the frequency-axis column
pub const AXIS_LABEL: &str = "Frequency [Hz]";

/// One instant-column cell, kept as the export provided it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Build a cell from raw field text
    ///
    /// Blank and non-finite numbers are `Missing`; other non-numeric text is kept.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if !v.is_finite() => Cell::Missing,
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Frequency bins x time instants amplitude matrix
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrogramMatrix {
    frequency_axis: Vec<Option<f64>>,
    instants: Vec<Vec<Cell>>,
}

/// Frequency range and shape needed to draw the matrix as an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderExtent {
    /// Lowest frequency on the axis (None if every bin is missing)
    pub frequency_min: Option<f64>,
    /// Highest frequency on the axis (None if every bin is missing)
    pub frequency_max: Option<f64>,
    /// Number of instant columns
    pub instants: usize,
    /// Number of frequency bins
    pub bins: usize,
}

impl SpectrogramMatrix {
    /// Build a matrix from its columns
    ///
    /// Every instant column must have exactly as many rows as the axis.
    pub fn new(frequency_axis: Vec<Option<f64>>, instants: Vec<Vec<Cell>>) -> Result<Self> {
        let bins = frequency_axis.len();
        if let Some((idx, column)) = instants.iter().enumerate().find(|(_, c)| c.len() != bins) {
            return Err(Error::InvalidInput(format!(
                "instant column {} has {} rows, frequency axis has {}",
                idx,
                column.len(),
                bins
            )));
        }
        Ok(Self {
            frequency_axis,
            instants,
        })
    }

    /// Number of frequency bins (rows)
    pub fn bins(&self) -> usize {
        self.frequency_axis.len()
    }

    /// Number of instant columns
    pub fn instant_count(&self) -> usize {
        self.instants.len()
    }

    pub fn frequency_axis(&self) -> &[Option<f64>] {
        &self.frequency_axis
    }

    /// Instant column by index, if present
    pub fn instant(&self, index: usize) -> Option<&[Cell]> {
        self.instants.get(index).map(Vec::as_slice)
    }

    /// Labels of all columns, axis first
    pub fn column_labels(&self) -> Vec<String> {
        std::iter::once(AXIS_LABEL.to_string())
            .chain((0..self.instants.len()).map(|i| i.to_string()))
            .collect()
    }

    /// Project the matrix onto the axis column and one instant column
    ///
    /// Valid indices are `0..=instant_count() - 1`. Negative indices are
    /// accepted so callers passing through untrusted integers get a range
    /// error rather than a wrap-around.
    pub fn slice(&self, index: i64) -> Result<Slice> {
        let column = usize::try_from(index)
            .ok()
            .and_then(|i| self.instants.get(i))
            .ok_or(Error::Range {
                index,
                instants: self.instants.len(),
            })?;

        Ok(Slice {
            label: index.to_string(),
            axis: self.frequency_axis.clone(),
            values: column.clone(),
        })
    }

    /// Frequency range and `[instants, bins]` shape for rendering
    pub fn render_extent(&self) -> RenderExtent {
        let present = self.frequency_axis.iter().flatten().copied();
        RenderExtent {
            frequency_min: present.clone().reduce(f64::min),
            frequency_max: present.reduce(f64::max),
            instants: self.instants.len(),
            bins: self.frequency_axis.len(),
        }
    }

    /// Numeric amplitudes as `[instants][bins]`; non-numeric cells are None
    pub fn amplitude_grid(&self) -> Vec<Vec<Option<f64>>> {
        self.instants
            .iter()
            .map(|column| column.iter().map(Cell::as_number).collect())
            .collect()
    }
}

/// Two-column view of one instant: the frequency axis and its amplitudes
///
/// Column roles are named after what the columns hold, not after the metric
/// that reads them; see `features` for how each metric uses them.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    label: String,
    axis: Vec<Option<f64>>,
    values: Vec<Cell>,
}

impl Slice {
    /// Build a slice directly from its two columns
    pub fn new(
        label: impl Into<String>,
        axis: Vec<Option<f64>>,
        values: Vec<Cell>,
    ) -> Result<Self> {
        if axis.len() != values.len() {
            return Err(Error::InvalidInput(format!(
                "slice columns differ in length ({} vs {})",
                axis.len(),
                values.len()
            )));
        }
        Ok(Self {
            label: label.into(),
            axis,
            values,
        })
    }

    /// Label of the value column (the instant index as text)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Frequency-axis column
    pub fn axis(&self) -> &[Option<f64>] {
        &self.axis
    }

    /// Amplitude column of the selected instant
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }
}

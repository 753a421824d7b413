//! Per-instant signal characterization
//!
//! Every metric reads the two slice columns in fixed roles. Several metric
//! names do not match the column the value comes from:
//!
//! | Metric              | Computed from                                          |
//! |---------------------|--------------------------------------------------------|
//! | `noise_level`       | min of the axis column                                 |
//! | `amplitude`         | max of the axis column                                 |
//! | `central_frequency` | value column at the row of the axis maximum            |
//! | `snr`               | `amplitude - noise_level`                              |
//! | `bandwidth`         | value-column span over rows with axis >= `-snr / 2`    |
//! | `modulation`        | constant `"PPM"`                                       |
//! | `crest_factor`      | `amplitude - amplitude * 0.707`                        |
//! | `spectral_peaks`    | value column at local maxima of the axis column        |
//!
//! Consumers of the reported numbers rely on these roles, so they are kept
//! as-is. Whether the axis/value swap is intended has not been confirmed.

pub mod peaks;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::spectrogram::{Cell, Slice};

pub use peaks::PeakDetector;

/// Modulation reported for every slice
pub const MODULATION: &str = "PPM";

/// RMS-to-peak ratio assumed by the crest factor
const RMS_RATIO: f64 = 0.707;

/// Characterization of one spectrogram instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterizationResult {
    pub central_frequency: f64,
    pub bandwidth: f64,
    pub noise_level: f64,
    pub modulation: String,
    pub amplitude: f64,
    pub spectral_peaks: String,
    pub snr: f64,
    pub crest_factor: f64,
}

/// Computes the characterization metrics of a slice
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor {
    peak_detector: PeakDetector,
}

impl FeatureExtractor {
    pub fn new(peak_detector: PeakDetector) -> Self {
        Self { peak_detector }
    }

    /// Compute all metrics for one slice
    pub fn characterize(&self, slice: &Slice) -> Result<CharacterizationResult> {
        if slice.is_empty() {
            return Err(Error::Compute(format!(
                "slice '{}' has no rows",
                slice.label()
            )));
        }

        let result = CharacterizationResult {
            central_frequency: finite("central_frequency", central_frequency(slice)?)?,
            bandwidth: finite("bandwidth", bandwidth(slice)?)?,
            noise_level: finite("noise_level", noise_level(slice)?)?,
            modulation: MODULATION.to_string(),
            amplitude: finite("amplitude", amplitude(slice)?)?,
            spectral_peaks: self.spectral_peaks(slice),
            snr: finite("snr", snr(slice)?)?,
            crest_factor: finite("crest_factor", crest_factor(slice)?)?,
        };

        debug!(instant = %slice.label(), ?result, "Characterized slice");
        Ok(result)
    }

    /// Value-column entries at local maxima of the axis column, `", "`-joined
    ///
    /// Rows whose value cell is missing are left out.
    pub fn spectral_peaks(&self, slice: &Slice) -> String {
        self.peak_detector
            .find_peaks(slice.axis())
            .into_iter()
            .filter_map(|row| match &slice.values()[row] {
                Cell::Number(v) => Some(format_decimal(*v)),
                Cell::Text(text) => Some(text.clone()),
                Cell::Missing => {
                    debug!(instant = %slice.label(), row, "Skipping peak with missing value");
                    None
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Minimum of the axis column
pub fn noise_level(slice: &Slice) -> Result<f64> {
    let row = arg_extreme(slice, |candidate, best| candidate < best)?;
    axis_at(slice, row)
}

/// Maximum of the axis column
pub fn amplitude(slice: &Slice) -> Result<f64> {
    let row = arg_extreme(slice, |candidate, best| candidate > best)?;
    axis_at(slice, row)
}

/// Value-column entry at the first row holding the axis maximum
pub fn central_frequency(slice: &Slice) -> Result<f64> {
    let row = arg_extreme(slice, |candidate, best| candidate > best)?;
    match &slice.values()[row] {
        Cell::Number(v) => Ok(*v),
        Cell::Text(text) => Err(Error::Compute(format!(
            "central frequency: non-numeric value '{}' at row {}",
            text, row
        ))),
        Cell::Missing => Err(Error::Compute(format!(
            "central frequency: missing value at row {}",
            row
        ))),
    }
}

/// `amplitude - noise_level`
pub fn snr(slice: &Slice) -> Result<f64> {
    Ok(amplitude(slice)? - noise_level(slice)?)
}

/// Span of value-column entries over rows whose axis is at least `-snr / 2`
pub fn bandwidth(slice: &Slice) -> Result<f64> {
    let threshold = -snr(slice)? / 2.0;

    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    let mut selected = 0usize;

    for (row, (axis, value)) in slice.axis().iter().zip(slice.values()).enumerate() {
        if !axis.is_some_and(|a| a >= threshold) {
            continue;
        }
        match value {
            Cell::Number(v) => {
                low = low.min(*v);
                high = high.max(*v);
                selected += 1;
            }
            Cell::Text(text) => {
                return Err(Error::Compute(format!(
                    "bandwidth: non-numeric value '{}' at row {}",
                    text, row
                )))
            }
            Cell::Missing => {}
        }
    }

    if selected == 0 {
        return Err(Error::Compute(format!(
            "bandwidth: no numeric values at or above reference level {}",
            threshold
        )));
    }
    Ok(high - low)
}

/// Modulation label (not derived from data)
pub fn modulation() -> &'static str {
    MODULATION
}

/// `amplitude - amplitude * 0.707`
pub fn crest_factor(slice: &Slice) -> Result<f64> {
    let peak = amplitude(slice)?;
    Ok(peak - peak * RMS_RATIO)
}

/// Row of the extreme axis value; ties keep the first row
fn arg_extreme(slice: &Slice, better: impl Fn(f64, f64) -> bool) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (row, value) in slice.axis().iter().enumerate() {
        let Some(v) = *value else { continue };
        match best {
            Some((_, current)) if !better(v, current) => {}
            _ => best = Some((row, v)),
        }
    }

    best.map(|(row, _)| row).ok_or_else(|| {
        Error::Compute(format!(
            "slice '{}' has no numeric axis values",
            slice.label()
        ))
    })
}

/// Reject overflowed metrics; JSON has no representation for them
fn finite(metric: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Compute(format!("{} is not finite ({})", metric, value)))
    }
}

fn axis_at(slice: &Slice, row: usize) -> Result<f64> {
    slice.axis()[row]
        .ok_or_else(|| Error::Compute(format!("missing axis value at row {}", row)))
}

/// Plain decimal rendering: integral values keep `.0`, no exponent
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

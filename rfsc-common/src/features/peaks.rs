//! Local-maximum peak detection over a series with missing values
//!
//! A sample is a peak when it is strictly greater than its left neighbour
//! and strictly greater than the first differing sample to its right. Flat
//! tops report their middle sample (rounded down). The first and last
//! samples are never peaks. Missing samples compare false against anything,
//! so they neither form nor bound a peak.

use crate::error::{Error, Result};

/// Peak detector with optional height and spacing constraints
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakDetector {
    /// Minimum peak height (None = no constraint)
    min_height: Option<f64>,

    /// Minimum horizontal distance in samples between kept peaks
    /// (None = no constraint)
    min_distance: Option<usize>,
}

impl PeakDetector {
    /// Create detector without constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Require peaks to be at least `height` tall
    pub fn with_min_height(mut self, height: Option<f64>) -> Result<Self> {
        if let Some(h) = height {
            if h.is_nan() {
                return Err(Error::InvalidInput("Peak height must be a number".to_string()));
            }
        }
        self.min_height = height;
        Ok(self)
    }

    /// Require kept peaks to be at least `distance` samples apart
    pub fn with_min_distance(mut self, distance: Option<usize>) -> Result<Self> {
        if distance == Some(0) {
            return Err(Error::InvalidInput(
                "Peak distance must be >= 1".to_string(),
            ));
        }
        self.min_distance = distance;
        Ok(self)
    }

    pub fn min_height(&self) -> Option<f64> {
        self.min_height
    }

    pub fn min_distance(&self) -> Option<usize> {
        self.min_distance
    }

    /// Find peak row indices in increasing order
    pub fn find_peaks(&self, series: &[Option<f64>]) -> Vec<usize> {
        let mut peaks = local_maxima(series);

        if let Some(min_height) = self.min_height {
            peaks.retain(|&idx| series[idx].is_some_and(|h| h >= min_height));
        }

        if let Some(distance) = self.min_distance {
            if distance > 1 && peaks.len() > 1 {
                peaks = select_by_distance(&peaks, series, distance);
            }
        }

        peaks
    }
}

/// All local maxima, flat tops reduced to their middle sample
fn local_maxima(series: &[Option<f64>]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if series.len() < 3 {
        return peaks;
    }

    let last = series.len() - 1;
    let mut i = 1;
    while i < last {
        if less(series[i - 1], series[i]) {
            let mut ahead = i + 1;
            while ahead < last && equal(series[ahead], series[i]) {
                ahead += 1;
            }
            if less(series[ahead], series[i]) {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Drop peaks closer than `distance` to a higher peak
///
/// Peaks are visited from highest to lowest; each kept peak removes its
/// lower neighbours within range. Equal heights favour the later peak.
fn select_by_distance(peaks: &[usize], series: &[Option<f64>], distance: usize) -> Vec<usize> {
    let height = |p: usize| series[peaks[p]].unwrap_or(f64::NEG_INFINITY);

    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| height(a).total_cmp(&height(b)));

    let mut keep = vec![true; peaks.len()];
    for &j in by_height.iter().rev() {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

fn less(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn equal(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

//! Gas-chromatography peak quantification by triangular area and area normalisation.

use serde::{Deserialize, Serialize};

use super::error::{AnalysisError, AnalysisResult};
use crate::data::model::ChromatogramPeak;

/// A peak with its derived area and share of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantifiedPeak {
    pub peak: ChromatogramPeak,
    pub area: f64,
    /// `100 · area / total_area`
    pub percent_area: f64,
}

/// Quantification of a whole run, peaks kept in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakReport {
    pub peaks: Vec<QuantifiedPeak>,
    pub total_area: f64,
}

impl PeakReport {
    /// Index of the largest peak by area (first on ties).
    pub fn major_peak(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, p) in self.peaks.iter().enumerate() {
            match best {
                Some(b) if self.peaks[b].area >= p.area => {}
                _ => best = Some(i),
            }
        }
        best
    }
}

/// Compute area and percent area of every peak.
///
/// Fails with [`AnalysisError::EmptyInput`] for an empty run, with
/// [`AnalysisError::InvalidValue`] when a retention time or width is not
/// strictly positive or a height is negative, and with
/// [`AnalysisError::ZeroArea`] when every area is zero.
pub fn quantify_peaks(peaks: &[ChromatogramPeak]) -> AnalysisResult<PeakReport> {
    if peaks.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    for (index, p) in peaks.iter().enumerate() {
        validate(index, p)?;
    }

    let areas: Vec<f64> = peaks.iter().map(ChromatogramPeak::area).collect();
    let total_area: f64 = areas.iter().sum();
    if total_area == 0.0 {
        return Err(AnalysisError::ZeroArea);
    }

    let peaks = peaks
        .iter()
        .zip(areas)
        .map(|(&peak, area)| QuantifiedPeak {
            peak,
            area,
            percent_area: 100.0 * area / total_area,
        })
        .collect();

    Ok(PeakReport { peaks, total_area })
}

fn validate(index: usize, p: &ChromatogramPeak) -> AnalysisResult<()> {
    let checks = [
        ("retention_time", p.retention_time, p.retention_time > 0.0, "must be > 0"),
        ("height", p.height, p.height >= 0.0, "must be ≥ 0"),
        ("width", p.width, p.width > 0.0, "must be > 0"),
    ];
    for (field, value, ok, reason) in checks {
        if !value.is_finite() || !ok {
            return Err(AnalysisError::InvalidValue {
                index,
                field,
                value,
                reason,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn normalises_areas() {
        let peaks = [
            ChromatogramPeak::new(1.0, 10.0, 2.0),
            ChromatogramPeak::new(2.0, 30.0, 2.0),
        ];
        let report = quantify_peaks(&peaks).unwrap();
        assert_relative_eq!(report.total_area, 40.0);
        assert_relative_eq!(report.peaks[0].area, 10.0);
        assert_relative_eq!(report.peaks[0].percent_area, 25.0);
        assert_relative_eq!(report.peaks[1].percent_area, 75.0);
        assert_eq!(report.major_peak(), Some(1));
    }

    #[test]
    fn zero_height_peak_is_kept() {
        let peaks = [
            ChromatogramPeak::new(1.0, 0.0, 1.0),
            ChromatogramPeak::new(2.0, 4.0, 1.0),
        ];
        let report = quantify_peaks(&peaks).unwrap();
        assert_eq!(report.peaks[0].percent_area, 0.0);
        assert_relative_eq!(report.peaks[1].percent_area, 100.0);
    }

    #[test]
    fn all_zero_heights() {
        let peaks = [
            ChromatogramPeak::new(1.0, 0.0, 1.0),
            ChromatogramPeak::new(2.0, 0.0, 0.5),
        ];
        assert_eq!(quantify_peaks(&peaks), Err(AnalysisError::ZeroArea));
    }

    #[test]
    fn empty_run() {
        assert_eq!(quantify_peaks(&[]), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn invalid_width() {
        let peaks = [
            ChromatogramPeak::new(1.0, 5.0, 1.0),
            ChromatogramPeak::new(2.0, 5.0, 0.0),
        ];
        assert!(matches!(
            quantify_peaks(&peaks),
            Err(AnalysisError::InvalidValue { index: 1, field: "width", .. })
        ));
    }

    #[test]
    fn major_peak_ties_resolve_first() {
        let peaks = [
            ChromatogramPeak::new(1.0, 2.0, 1.0),
            ChromatogramPeak::new(2.0, 1.0, 2.0),
        ];
        assert_eq!(quantify_peaks(&peaks).unwrap().major_peak(), Some(0));
    }
}

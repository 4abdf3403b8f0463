//! Linear calibration curve (absorbance vs. concentration) by ordinary least squares.

use serde::{Deserialize, Serialize};

use super::concentration::solve_concentration;
use super::error::{AnalysisError, AnalysisResult};
use crate::data::model::CalibrationPoint;

/// Fitted line `absorbance = slope · concentration + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, in `[0, 1]`.
    pub r_squared: f64,
    /// Number of standards the line was fit on.
    pub n_points: usize,
}

impl CalibrationModel {
    /// Absorbance predicted for a concentration.
    pub fn predict(&self, concentration: f64) -> f64 {
        self.slope * concentration + self.intercept
    }

    /// Invert the line for a measured absorbance.
    pub fn concentration_for(&self, absorbance: f64) -> AnalysisResult<f64> {
        solve_concentration(absorbance, self.slope, self.intercept)
    }

    /// Human-readable equation with `decimals` digits.
    pub fn equation(&self, decimals: usize) -> String {
        let sign = if self.intercept < 0.0 { '-' } else { '+' };
        format!(
            "A = {:.d$} × C {sign} {:.d$}",
            self.slope,
            self.intercept.abs(),
            d = decimals
        )
    }
}

/// Fit a straight line through the calibration standards.
///
/// Requires at least two points with at least two distinct concentrations.
/// Concentrations must be finite and non-negative, absorbances finite.
pub fn fit_calibration(points: &[CalibrationPoint]) -> AnalysisResult<CalibrationModel> {
    if points.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            got: points.len(),
        });
    }
    validate(points)?;

    let first = points[0].concentration;
    if points.iter().all(|p| p.concentration == first) {
        return Err(AnalysisError::DegenerateInput { value: first });
    }

    let n = points.len() as f64;
    let x_mean = points.iter().map(|p| p.concentration).sum::<f64>() / n;
    let y_mean = points.iter().map(|p| p.absorbance).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
        let dx = p.concentration - x_mean;
        (sxy + dx * (p.absorbance - y_mean), sxx + dx * dx)
    });
    if sxx == 0.0 {
        return Err(AnalysisError::DegenerateInput { value: first });
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), p| {
        let fitted = slope * p.concentration + intercept;
        (
            res + (p.absorbance - fitted).powi(2),
            tot + (p.absorbance - y_mean).powi(2),
        )
    });
    // A flat response is explained exactly by the horizontal line.
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    for (quantity, value) in [
        ("slope", slope),
        ("intercept", intercept),
        ("r²", r_squared),
    ] {
        if !value.is_finite() {
            return Err(AnalysisError::NotFinite { quantity, value });
        }
    }

    log::debug!("calibration fit: slope={slope}, intercept={intercept}, r2={r_squared}");

    Ok(CalibrationModel {
        slope,
        intercept,
        r_squared,
        n_points: points.len(),
    })
}

fn validate(points: &[CalibrationPoint]) -> AnalysisResult<()> {
    for (index, p) in points.iter().enumerate() {
        if !p.concentration.is_finite() || p.concentration < 0.0 {
            return Err(AnalysisError::InvalidValue {
                index,
                field: "concentration",
                value: p.concentration,
                reason: "must be finite and ≥ 0",
            });
        }
        if !p.absorbance.is_finite() {
            return Err(AnalysisError::InvalidValue {
                index,
                field: "absorbance",
                value: p.absorbance,
                reason: "must be finite",
            });
        }
    }
    Ok(())
}

use super::error::{AnalysisError, AnalysisResult};

/// Concentration of a sample from its absorbance: `(A − intercept) / slope`.
///
/// `slope` and `intercept` come from a fitted [`CalibrationModel`] or are
/// typed in by the user, so a zero slope is reported, not assumed away.
///
/// [`CalibrationModel`]: super::calibration::CalibrationModel
pub fn solve_concentration(absorbance: f64, slope: f64, intercept: f64) -> AnalysisResult<f64> {
    for (index, field, value) in [
        (0, "absorbance", absorbance),
        (0, "slope", slope),
        (0, "intercept", intercept),
    ] {
        if !value.is_finite() {
            return Err(AnalysisError::InvalidValue {
                index,
                field,
                value,
                reason: "must be finite",
            });
        }
    }
    if slope == 0.0 {
        return Err(AnalysisError::ZeroSlope);
    }
    Ok((absorbance - intercept) / slope)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn inverts_line() {
        let c = solve_concentration(0.30, 0.025, 0.0125).unwrap();
        assert_relative_eq!(c, 11.5, epsilon = 1e-9);
    }

    #[test]
    fn negative_result_is_allowed() {
        // Absorbance below the intercept: reported as-is.
        let c = solve_concentration(0.0, 0.02, 0.01).unwrap();
        assert_relative_eq!(c, -0.5, epsilon = 1e-12);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert!(matches!(
            solve_concentration(0.3, f64::NAN, 0.01),
            Err(AnalysisError::InvalidValue { field: "slope", .. })
        ));
        assert!(matches!(
            solve_concentration(0.3, 0.02, f64::INFINITY),
            Err(AnalysisError::InvalidValue { field: "intercept", .. })
        ));
        assert!(matches!(
            solve_concentration(f64::NAN, 0.02, 0.01),
            Err(AnalysisError::InvalidValue { field: "absorbance", .. })
        ));
    }

    #[test]
    fn zero_slope() {
        assert_eq!(solve_concentration(0.3, 0.0, 0.1), Err(AnalysisError::ZeroSlope));
        assert_eq!(solve_concentration(0.3, -0.0, 0.1), Err(AnalysisError::ZeroSlope));
    }
}

use approx::assert_relative_eq;
use proptest::prelude::*;

use spectro_lab::analysis::ftir::BAND_TABLE;
use spectro_lab::analysis::{
    AnalysisError, FunctionalGroup, classify_wavenumber, fit_calibration, locate_peak,
    quantify_peaks, solve_concentration,
};
use spectro_lab::{CalibrationPoint, ChromatogramPeak, SpectrumSample};

fn standards() -> Vec<CalibrationPoint> {
    [(0.0, 0.02), (5.0, 0.13), (10.0, 0.27), (15.0, 0.40), (20.0, 0.52), (25.0, 0.64)]
        .iter()
        .map(|&(c, a)| CalibrationPoint::new(c, a))
        .collect()
}

#[test]
fn classroom_calibration_end_to_end() {
    let model = fit_calibration(&standards()).unwrap();

    // Sxy = 11.0, Sxx = 437.5 for these standards.
    assert_relative_eq!(model.slope, 11.0 / 437.5, epsilon = 1e-12);
    assert_relative_eq!(model.intercept, 0.33 - 12.5 * 11.0 / 437.5, epsilon = 1e-12);
    assert!((model.slope - 0.0248).abs() < 1e-3);
    assert!(model.r_squared > 0.99);

    let c = model.concentration_for(0.30).unwrap();
    assert_relative_eq!(c, (0.30 - model.intercept) / model.slope, epsilon = 1e-12);
    assert!((c - 11.3).abs() < 0.05, "{c}");
}

#[test]
fn percent_areas_of_example_run() {
    let peaks = [
        ChromatogramPeak::new(1.2, 45.0, 0.20),
        ChromatogramPeak::new(2.8, 120.0, 0.35),
        ChromatogramPeak::new(4.1, 80.0, 0.30),
        ChromatogramPeak::new(6.5, 30.0, 0.50),
    ];
    let report = quantify_peaks(&peaks).unwrap();
    assert_relative_eq!(report.total_area, 4.5 + 21.0 + 12.0 + 7.5, epsilon = 1e-12);
    assert_relative_eq!(report.peaks[1].percent_area, 21.0 / 45.0 * 100.0, epsilon = 1e-9);
    assert_eq!(report.major_peak(), Some(1));
}

#[test]
fn error_messages_are_user_readable() {
    let err = fit_calibration(&[CalibrationPoint::new(1.0, 0.1)]).unwrap_err();
    assert_eq!(err.to_string(), "at least 2 data points are required, got 1");
    assert_eq!(
        solve_concentration(0.3, 0.0, 0.0).unwrap_err().to_string(),
        "slope must not be zero"
    );
    assert_eq!(locate_peak(&[]).unwrap_err(), AnalysisError::EmptyInput);
}

proptest! {
    #[test]
    fn fit_recovers_exact_line(
        m in prop_oneof![-5.0f64..-0.01, 0.01f64..5.0],
        b in -10.0f64..10.0,
        offset in 0.0f64..100.0,
        step in 0.1f64..10.0,
        n in 2usize..20,
    ) {
        let points: Vec<CalibrationPoint> = (0..n)
            .map(|i| {
                let x = offset + step * i as f64;
                CalibrationPoint::new(x, m * x + b)
            })
            .collect();
        let model = fit_calibration(&points).unwrap();
        let scale = 1.0 + b.abs() + m.abs() * (offset + step * n as f64);
        prop_assert!((model.slope - m).abs() <= 1e-9 * scale, "slope {} vs {}", model.slope, m);
        prop_assert!((model.intercept - b).abs() <= 1e-7 * scale, "intercept {} vs {}", model.intercept, b);
        prop_assert!((model.r_squared - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn solver_inverts_line(
        c in 0.0f64..1000.0,
        m in prop_oneof![-10.0f64..-0.001, 0.001f64..10.0],
        b in -10.0f64..10.0,
    ) {
        let back = solve_concentration(m * c + b, m, b).unwrap();
        prop_assert!((back - c).abs() <= 1e-9 * (1.0 + c.abs()), "{} vs {}", back, c);
    }

    #[test]
    fn percent_areas_sum_to_hundred(
        raw in prop::collection::vec((0.1f64..100.0, 0.1f64..1000.0, 0.01f64..5.0), 1..20),
    ) {
        let peaks: Vec<ChromatogramPeak> = raw
            .iter()
            .map(|&(t, h, w)| ChromatogramPeak::new(t, h, w))
            .collect();
        let report = quantify_peaks(&peaks).unwrap();
        let sum: f64 = report.peaks.iter().map(|p| p.percent_area).sum();
        prop_assert!((sum - 100.0).abs() < 1e-9, "{}", sum);
        prop_assert_eq!(report.peaks.len(), peaks.len());
    }

    #[test]
    fn locator_matches_linear_scan(levels in prop::collection::vec(0u8..10, 1..100)) {
        let samples: Vec<SpectrumSample> = levels
            .iter()
            .enumerate()
            .map(|(i, &l)| SpectrumSample::new(i as f64, l as f64 / 10.0))
            .collect();

        let mut expected = 0;
        for (i, s) in samples.iter().enumerate() {
            if s.y > samples[expected].y {
                expected = i;
            }
        }
        prop_assert_eq!(locate_peak(&samples).unwrap().index, expected);
    }

    #[test]
    fn classifier_is_total_and_first_match(wn in -1.0e5f64..1.0e5) {
        let expected = BAND_TABLE
            .iter()
            .find(|(lo, hi, _)| *lo <= wn && wn <= *hi)
            .map(|(_, _, g)| *g)
            .unwrap_or(FunctionalGroup::Unclassified);
        prop_assert_eq!(classify_wavenumber(wn), expected);
    }
}

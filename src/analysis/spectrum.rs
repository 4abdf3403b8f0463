use super::error::{AnalysisError, AnalysisResult};
use crate::data::model::SpectrumSample;

/// Position of the strongest signal in a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    /// Index into the input sequence.
    pub index: usize,
    pub sample: SpectrumSample,
}

/// λmax / peak wavenumber: the sample with the largest `y`.
///
/// Ties go to the first occurrence in input order. NaN intensities are
/// skipped; a spectrum made only of NaNs falls back to its first sample.
pub fn locate_peak(samples: &[SpectrumSample]) -> AnalysisResult<SpectralPeak> {
    let first = samples.first().ok_or(AnalysisError::EmptyInput)?;

    let mut best = SpectralPeak {
        index: 0,
        sample: *first,
    };
    for (index, s) in samples.iter().enumerate().skip(1) {
        if s.y > best.sample.y || (best.sample.y.is_nan() && !s.y.is_nan()) {
            best = SpectralPeak { index, sample: *s };
        }
    }
    Ok(best)
}

/// Indices of local maxima whose height is at least `min_relative` of the
/// global maximum, in input order.  Plateaus report their first sample.
/// End points count when they exceed their single neighbour.
pub fn local_maxima(samples: &[SpectrumSample], min_relative: f64) -> Vec<usize> {
    let Ok(global) = locate_peak(samples) else {
        return Vec::new();
    };
    let threshold = global.sample.y * min_relative;
    let n = samples.len();

    (0..n)
        .filter(|&i| {
            let y = samples[i].y;
            if y.is_nan() || y < threshold {
                return false;
            }
            let left_ok = i == 0 || samples[i - 1].y < y;
            // Walk across a plateau to find the next different value.
            let mut j = i + 1;
            while j < n && samples[j].y == y {
                j += 1;
            }
            let right_ok = j == n || samples[j].y < y;
            left_ok && right_ok && (n == 1 || i > 0 || j < n)
        })
        .collect()
}

/// Simulated reference trace: the sample spectrum scaled by `scale`.
pub fn reference_overlay(samples: &[SpectrumSample], scale: f64) -> Vec<SpectrumSample> {
    samples
        .iter()
        .map(|s| SpectrumSample::new(s.x, s.y * scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(ys: &[f64]) -> Vec<SpectrumSample> {
        ys.iter()
            .enumerate()
            .map(|(i, &y)| SpectrumSample::new(200.0 + 50.0 * i as f64, y))
            .collect()
    }

    #[test]
    fn finds_lambda_max() {
        let s = spectrum(&[0.01, 0.18, 0.45, 0.60, 0.40, 0.25]);
        let peak = locate_peak(&s).unwrap();
        assert_eq!(peak.index, 3);
        assert_eq!(peak.sample.x, 350.0);
    }

    #[test]
    fn ties_resolve_to_first() {
        let s = spectrum(&[0.1, 0.7, 0.3, 0.7]);
        assert_eq!(locate_peak(&s).unwrap().index, 1);
    }

    #[test]
    fn empty_spectrum() {
        assert_eq!(locate_peak(&[]), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn nan_never_wins() {
        let s = spectrum(&[f64::NAN, 0.2, 0.1]);
        assert_eq!(locate_peak(&s).unwrap().index, 1);
    }

    #[test]
    fn local_maxima_with_threshold() {
        let s = spectrum(&[0.1, 0.5, 0.2, 0.05, 0.08, 0.04, 1.0, 0.3]);
        assert_eq!(local_maxima(&s, 0.0), vec![1, 4, 6]);
        assert_eq!(local_maxima(&s, 0.2), vec![1, 6]);
    }

    #[test]
    fn local_maxima_plateau_and_edges() {
        let s = spectrum(&[0.9, 0.2, 0.6, 0.6, 0.1]);
        assert_eq!(local_maxima(&s, 0.0), vec![0, 2]);
        assert_eq!(local_maxima(&spectrum(&[0.4]), 0.5), vec![0]);
    }

    #[test]
    fn overlay_scales_y_only() {
        let s = spectrum(&[0.5, 1.0]);
        let r = reference_overlay(&s, 0.8);
        assert_eq!(r[1], SpectrumSample::new(250.0, 0.8));
    }
}

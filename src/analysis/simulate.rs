//! Synthetic instrument output for demos and the `generate_sample` tool.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};

use crate::data::model::{ChromatogramPeak, SpectrumSample};

/// Gaussian band `amplitude · exp(−(x − μ)² / 2σ²)`.
pub fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Seeded noise source producing normally distributed values.
pub struct NoiseSource {
    rng: StdRng,
}

impl NoiseSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One draw from `N(mean, std_dev²)`. Fails for a negative or non-finite `std_dev`.
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> Result<f64, NormalError> {
        Ok(Normal::new(mean, std_dev)?.sample(&mut self.rng))
    }
}

/// Sum of Gaussian bands `(μ, σ, amplitude)` sampled on `axis`, plus noise.
pub fn synthesize(
    axis: &[f64],
    bands: &[(f64, f64, f64)],
    noise_level: f64,
    noise: &mut NoiseSource,
) -> Result<Vec<SpectrumSample>, NormalError> {
    axis.iter()
        .map(|&x| {
            let signal: f64 = bands
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(x, mu, sigma, amp))
                .sum();
            Ok(SpectrumSample::new(x, signal + noise.gauss(0.0, noise_level)?))
        })
        .collect()
}

/// UV-Vis spectrum over 200–800 nm in 10 nm steps with one band at 500 nm
/// (σ = 30 nm) and σ = 0.02 absorbance noise.
pub fn uvvis_spectrum(seed: u64) -> Result<Vec<SpectrumSample>, NormalError> {
    let axis: Vec<f64> = (0..=60).map(|i| 200.0 + 10.0 * i as f64).collect();
    synthesize(&axis, &[(500.0, 30.0, 1.0)], 0.02, &mut NoiseSource::new(seed))
}

/// Mid-IR spectrum, 4000 → 600 cm⁻¹ in 4 cm⁻¹ steps, of a simple ester/alcohol mix.
pub fn ftir_spectrum(seed: u64) -> Result<Vec<SpectrumSample>, NormalError> {
    let axis: Vec<f64> = (0..=850).map(|i| 4000.0 - 4.0 * i as f64).collect();
    let bands = [
        (3400.0, 90.0, 0.55),
        (2950.0, 30.0, 0.45),
        (1735.0, 18.0, 0.90),
        (1450.0, 20.0, 0.25),
        (1240.0, 25.0, 0.50),
        (1050.0, 20.0, 0.35),
        (720.0, 15.0, 0.15),
    ];
    synthesize(&axis, &bands, 0.005, &mut NoiseSource::new(seed))
}

/// A GC run of `n_peaks` well separated peaks with random heights and widths.
pub fn chromatogram(seed: u64, n_peaks: usize) -> Vec<ChromatogramPeak> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_peaks)
        .map(|i| {
            let retention_time = 1.0 + 1.5 * i as f64 + rng.gen_range(0.0..0.5);
            let height = rng.gen_range(10.0..150.0);
            let width = rng.gen_range(0.15..0.6);
            ChromatogramPeak::new(retention_time, height, width)
        })
        .collect()
}

/// Detector trace for a set of triangular peaks, sampled every `step` minutes.
pub fn chromatogram_trace(peaks: &[ChromatogramPeak], step: f64) -> Vec<[f64; 2]> {
    let end = peaks
        .iter()
        .map(|p| p.retention_time + p.width)
        .fold(0.0, f64::max);
    let n = (end / step).ceil() as usize + 1;

    (0..n)
        .map(|i| {
            let t = i as f64 * step;
            let y = peaks
                .iter()
                .map(|p| {
                    let half = p.width / 2.0;
                    let d = (t - p.retention_time).abs();
                    if d >= half { 0.0 } else { p.height * (1.0 - d / half) }
                })
                .sum();
            [t, y]
        })
        .collect()
}

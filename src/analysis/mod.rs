/// Numeric core: every procedure is a pure function of its input.
///
/// ```text
///   CalibrationPoint[] ──► calibration ──► CalibrationModel ──► concentration
///   ChromatogramPeak[] ──► peaks       ──► PeakReport
///   SpectrumSample[]   ──► spectrum    ──► SpectralPeak (λmax)
///   wavenumber         ──► ftir        ──► FunctionalGroup
/// ```
///
/// [`Analysis`] selects one of them for the active instrument mode.

pub mod calibration;
pub mod concentration;
pub mod error;
pub mod ftir;
pub mod peaks;
pub mod simulate;
pub mod spectrum;

pub use calibration::{CalibrationModel, fit_calibration};
pub use concentration::solve_concentration;
pub use error::{AnalysisError, AnalysisResult};
pub use ftir::{BandAssignment, FunctionalGroup, classify_peaks, classify_wavenumber};
pub use peaks::{PeakReport, QuantifiedPeak, quantify_peaks};
pub use spectrum::{SpectralPeak, locate_peak, reference_overlay};

use crate::data::model::{CalibrationPoint, ChromatogramPeak, SpectrumSample};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// One requested computation together with its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    LambdaMax(Vec<SpectrumSample>),
    Calibration(Vec<CalibrationPoint>),
    Concentration {
        absorbance: f64,
        slope: f64,
        intercept: f64,
    },
    PeakQuantification(Vec<ChromatogramPeak>),
    FunctionalGroups {
        spectrum: Vec<SpectrumSample>,
        min_relative: f64,
    },
    ClassifyWavenumber(f64),
}

/// Result of an [`Analysis`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    LambdaMax(SpectralPeak),
    Calibration(CalibrationModel),
    Concentration(f64),
    Peaks(PeakReport),
    FunctionalGroups {
        strongest: SpectralPeak,
        bands: Vec<BandAssignment>,
    },
    Wavenumber(FunctionalGroup),
}

impl Analysis {
    pub fn run(&self) -> AnalysisResult<AnalysisOutcome> {
        let outcome = match self {
            Analysis::LambdaMax(samples) => AnalysisOutcome::LambdaMax(locate_peak(samples)?),
            Analysis::Calibration(points) => AnalysisOutcome::Calibration(fit_calibration(points)?),
            Analysis::Concentration {
                absorbance,
                slope,
                intercept,
            } => AnalysisOutcome::Concentration(solve_concentration(*absorbance, *slope, *intercept)?),
            Analysis::PeakQuantification(peaks) => AnalysisOutcome::Peaks(quantify_peaks(peaks)?),
            Analysis::FunctionalGroups {
                spectrum,
                min_relative,
            } => AnalysisOutcome::FunctionalGroups {
                strongest: locate_peak(spectrum)?,
                bands: classify_peaks(spectrum, *min_relative),
            },
            Analysis::ClassifyWavenumber(wn) => AnalysisOutcome::Wavenumber(classify_wavenumber(*wn)),
        };
        Ok(outcome)
    }
}

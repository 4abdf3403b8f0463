//! FTIR band assignment from a fixed, priority-ordered table of wavenumber ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::spectrum::local_maxima;
use crate::data::model::SpectrumSample;

/// Functional groups the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionalGroup {
    OhNhStretch,
    ChStretch,
    CarbonylStretch,
    AromaticCc,
    CoStretch,
    ChBendingFingerprint,
    Unclassified,
}

impl FunctionalGroup {
    pub fn label(&self) -> &'static str {
        match self {
            FunctionalGroup::OhNhStretch => "O-H/N-H stretching",
            FunctionalGroup::ChStretch => "C-H stretching",
            FunctionalGroup::CarbonylStretch => "C=O stretching",
            FunctionalGroup::AromaticCc => "C=C aromatic",
            FunctionalGroup::CoStretch => "C-O stretching",
            FunctionalGroup::ChBendingFingerprint => "C-H bending/fingerprint",
            FunctionalGroup::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for FunctionalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive `[low, high]` ranges in cm⁻¹, checked top to bottom.
/// Neighbouring ranges share boundary values (1600), so order decides.
pub const BAND_TABLE: [(f64, f64, FunctionalGroup); 6] = [
    (3200.0, 3700.0, FunctionalGroup::OhNhStretch),
    (2800.0, 3100.0, FunctionalGroup::ChStretch),
    (1600.0, 1800.0, FunctionalGroup::CarbonylStretch),
    (1400.0, 1600.0, FunctionalGroup::AromaticCc),
    (1000.0, 1300.0, FunctionalGroup::CoStretch),
    (600.0, 900.0, FunctionalGroup::ChBendingFingerprint),
];

/// Functional group for a wavenumber.  First matching range wins;
/// anything outside the table, including NaN, is `Unclassified`.
pub fn classify_wavenumber(wavenumber: f64) -> FunctionalGroup {
    BAND_TABLE
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&wavenumber))
        .map(|&(_, _, group)| group)
        .unwrap_or(FunctionalGroup::Unclassified)
}

/// An absorption band found in a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandAssignment {
    pub index: usize,
    pub wavenumber: f64,
    pub absorbance: f64,
    pub group: FunctionalGroup,
}

/// Assign every local maximum at or above `min_relative` of the strongest band.
pub fn classify_peaks(samples: &[SpectrumSample], min_relative: f64) -> Vec<BandAssignment> {
    local_maxima(samples, min_relative)
        .into_iter()
        .map(|index| {
            let s = samples[index];
            BandAssignment {
                index,
                wavenumber: s.x,
                absorbance: s.y,
                group: classify_wavenumber(s.x),
            }
        })
        .collect()
}

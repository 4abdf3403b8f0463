use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Measurement records
// ---------------------------------------------------------------------------

/// One calibration standard: known concentration and its measured absorbance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    /// Concentration of the standard (ppm), must be ≥ 0.
    pub concentration: f64,
    pub absorbance: f64,
}

impl CalibrationPoint {
    pub fn new(concentration: f64, absorbance: f64) -> Self {
        Self {
            concentration,
            absorbance,
        }
    }
}

/// One chromatographic peak approximated as a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromatogramPeak {
    /// Elution time (min), must be > 0.
    pub retention_time: f64,
    /// Peak height, must be ≥ 0.
    pub height: f64,
    /// Base width (min), must be > 0.
    pub width: f64,
}

impl ChromatogramPeak {
    pub fn new(retention_time: f64, height: f64, width: f64) -> Self {
        Self {
            retention_time,
            height,
            width,
        }
    }

    /// Triangular area approximation: ½ · height · width.
    pub fn area(&self) -> f64 {
        0.5 * self.height * self.width
    }
}

/// One point of a spectrum. `x` is a wavelength (nm) or wavenumber (cm⁻¹).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSample {
    pub x: f64,
    pub y: f64,
}

impl SpectrumSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// InstrumentMode – which simulation the user is running
// ---------------------------------------------------------------------------

/// The simulations offered by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentMode {
    /// UV-Vis spectrum, λmax detection.
    UvVis,
    /// Calibration curve from standards.
    Calibration,
    /// Back-calculate a sample concentration from absorbance.
    Concentration,
    /// Gas chromatography peak quantification.
    Chromatography,
    /// FTIR spectrum with functional-group assignment.
    Ftir,
}

impl InstrumentMode {
    pub const ALL: [InstrumentMode; 5] = [
        InstrumentMode::UvVis,
        InstrumentMode::Calibration,
        InstrumentMode::Concentration,
        InstrumentMode::Chromatography,
        InstrumentMode::Ftir,
    ];

    /// Column headers of the tabular input this mode expects.
    /// `Concentration` reuses the calibration table.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            InstrumentMode::UvVis => &["wavelength (nm)", "absorbance"],
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                &["concentration (ppm)", "absorbance"]
            }
            InstrumentMode::Chromatography => &["retention time (min)", "height", "width (min)"],
            InstrumentMode::Ftir => &["wavenumber (cm⁻¹)", "absorbance"],
        }
    }

    /// Field names used by record-oriented JSON input.
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            InstrumentMode::UvVis => &["wavelength", "absorbance"],
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                &["concentration", "absorbance"]
            }
            InstrumentMode::Chromatography => &["retention_time", "height", "width"],
            InstrumentMode::Ftir => &["wavenumber", "absorbance"],
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Plot axis labels (x, y).
    pub fn axis_labels(&self) -> (&'static str, &'static str) {
        match self {
            InstrumentMode::UvVis => ("Wavelength (nm)", "Absorbance"),
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                ("Concentration (ppm)", "Absorbance")
            }
            InstrumentMode::Chromatography => ("Retention time (min)", "Detector response"),
            InstrumentMode::Ftir => ("Wavenumber (cm⁻¹)", "Absorbance"),
        }
    }

    /// Example input shown when the mode is first opened.
    pub fn default_input(&self) -> &'static str {
        match self {
            InstrumentMode::UvVis => "200,0.01\n250,0.18\n300,0.45\n350,0.60\n400,0.40\n450,0.25",
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                "0,0.02\n5,0.13\n10,0.27\n15,0.40\n20,0.52\n25,0.64"
            }
            InstrumentMode::Chromatography => "1.2,45,0.20\n2.8,120,0.35\n4.1,80,0.30\n6.5,30,0.50",
            InstrumentMode::Ftir => {
                "3650,0.05\n3400,0.62\n3050,0.12\n2950,0.48\n2350,0.03\n1715,0.85\n\
                 1600,0.30\n1450,0.22\n1250,0.40\n1050,0.35\n850,0.18\n700,0.10"
            }
        }
    }
}

impl fmt::Display for InstrumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstrumentMode::UvVis => "UV-Vis spectrum (λmax)",
            InstrumentMode::Calibration => "Calibration curve",
            InstrumentMode::Concentration => "Sample concentration",
            InstrumentMode::Chromatography => "Gas chromatography",
            InstrumentMode::Ftir => "FTIR functional groups",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// DataTable – parsed numeric rows, independent of the source format
// ---------------------------------------------------------------------------

/// Rectangular numeric table produced by the parser and the file loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    /// Column names (from the file header, or the mode defaults).
    pub column_names: Vec<String>,
    /// Rows, each exactly `column_names.len()` wide.
    pub rows: Vec<Vec<f64>>,
}

impl DataTable {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.column_names.len()
    }

    pub fn spectrum(&self) -> Vec<SpectrumSample> {
        self.rows
            .iter()
            .map(|r| SpectrumSample::new(r[0], r[1]))
            .collect()
    }

    pub fn calibration_points(&self) -> Vec<CalibrationPoint> {
        self.rows
            .iter()
            .map(|r| CalibrationPoint::new(r[0], r[1]))
            .collect()
    }

    /// Rows as chromatogram peaks; needs three columns.
    pub fn peaks(&self) -> Vec<ChromatogramPeak> {
        self.rows
            .iter()
            .filter(|r| r.len() >= 3)
            .map(|r| ChromatogramPeak::new(r[0], r[1], r[2]))
            .collect()
    }

    /// Render back into delimited text, e.g. after loading a file into the editor.
    pub fn to_text(&self, delimiter: char) -> String {
        let sep = delimiter.to_string();
        self.rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(sep.as_str())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_area() {
        let p = ChromatogramPeak::new(2.0, 120.0, 0.5);
        assert_eq!(p.area(), 30.0);
    }

    #[test]
    fn table_views() {
        let table = DataTable::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        );
        assert_eq!(table.spectrum()[1], SpectrumSample::new(4.0, 5.0));
        assert_eq!(table.calibration_points()[0], CalibrationPoint::new(1.0, 2.0));
        assert_eq!(table.peaks()[1], ChromatogramPeak::new(4.0, 5.0, 6.0));
        assert_eq!(table.to_text(','), "1,2,3\n4,5,6");
    }

    #[test]
    fn chromatography_expects_three_columns() {
        assert_eq!(InstrumentMode::Chromatography.column_count(), 3);
        for mode in InstrumentMode::ALL {
            if mode != InstrumentMode::Chromatography {
                assert_eq!(mode.column_count(), 2);
            }
        }
    }
}

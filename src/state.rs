use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui::{Color32, Rect};
use rand_distr::NormalError;

use crate::analysis::{
    Analysis, AnalysisOutcome, CalibrationModel, FunctionalGroup,
    simulate, solve_concentration,
};
use crate::color::{parse_hex, to_hex};
use crate::config::LabConfig;
use crate::data::loader::load_table;
use crate::data::model::{DataTable, InstrumentMode, SpectrumSample};
use crate::data::parser::parse_for_mode;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: LabConfig,

    /// Active simulation.
    pub mode: InstrumentMode,

    /// Editor text per input slot (see [`input_slot`]).
    inputs: HashMap<InstrumentMode, String>,

    /// Parsed input of the active mode (None when parsing failed).
    pub table: Option<DataTable>,

    /// Result of the active mode's analysis.
    pub outcome: Option<AnalysisOutcome>,

    /// Last successful calibration fit, handed to the concentration step.
    pub calibration: Option<CalibrationModel>,

    /// Concentration step inputs; slope/intercept are seeded from `calibration`.
    pub sample_absorbance: f64,
    pub slope_input: f64,
    pub intercept_input: f64,
    pub sample_concentration: Option<f64>,

    /// Single-wavenumber lookup in FTIR mode.
    pub query_wavenumber: f64,

    /// Sample trace colour.
    pub trace_color: Color32,

    /// Draw the scaled reference trace next to the sample spectrum.
    pub show_reference: bool,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    /// Destination of a requested plot export, waiting for the screenshot.
    pub pending_export: Option<PathBuf>,

    /// Screen area of the last drawn plot (points).
    pub plot_rect: Option<Rect>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LabConfig::default())
    }
}

/// Calibration and concentration modes edit the same standards table.
pub fn input_slot(mode: InstrumentMode) -> InstrumentMode {
    match mode {
        InstrumentMode::Concentration => InstrumentMode::Calibration,
        other => other,
    }
}

impl AppState {
    pub fn new(config: LabConfig) -> Self {
        let trace_color = parse_hex(&config.trace_color).unwrap_or_else(|e| {
            log::warn!("{e:#}; using default trace colour");
            Color32::from_rgb(0x1f, 0x77, 0xb4)
        });

        let inputs = InstrumentMode::ALL
            .iter()
            .map(|&m| (input_slot(m), m.default_input().replace(',', &config.delimiter.to_string())))
            .collect();

        let mut state = Self {
            show_reference: config.show_reference,
            config,
            mode: InstrumentMode::UvVis,
            inputs,
            table: None,
            outcome: None,
            calibration: None,
            sample_absorbance: 0.30,
            slope_input: 0.0,
            intercept_input: 0.0,
            sample_concentration: None,
            query_wavenumber: 1715.0,
            trace_color,
            status: None,
            pending_export: None,
            plot_rect: None,
        };
        state.recompute();
        state
    }

    /// Text of the active mode's editor.
    pub fn input(&self) -> &str {
        self.inputs
            .get(&input_slot(self.mode))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Mutable editor text; call [`AppState::recompute`] after editing.
    pub fn input_mut(&mut self) -> &mut String {
        self.inputs.entry(input_slot(self.mode)).or_default()
    }

    /// Switch simulation and re-run its analysis.
    pub fn set_mode(&mut self, mode: InstrumentMode) {
        if self.mode != mode {
            log::debug!("Switching to {mode}");
            self.mode = mode;
            self.sample_concentration = None;
            self.recompute();
        }
    }

    /// Replace the active editor text and re-run.
    pub fn set_input(&mut self, text: String) {
        *self.input_mut() = text;
        self.recompute();
    }

    /// Parse the active input and run the mode's analysis.
    pub fn recompute(&mut self) {
        self.table = None;
        self.outcome = None;

        let table = match parse_for_mode(self.input(), self.config.delimiter, self.mode) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Rejected {} input: {e}", self.mode);
                self.discard_calibration();
                self.set_error(format!("Could not read data: {e}"));
                return;
            }
        };

        match self.analysis_for(&table).run() {
            Ok(outcome) => {
                if let AnalysisOutcome::Calibration(model) = &outcome {
                    self.accept_calibration(*model);
                }
                self.outcome = Some(outcome);
                self.status = None;
            }
            Err(e) => {
                log::warn!("{} analysis failed: {e}", self.mode);
                self.discard_calibration();
                self.set_error(format!("Error: {e}"));
            }
        }
        self.table = Some(table);
    }

    fn analysis_for(&self, table: &DataTable) -> Analysis {
        match self.mode {
            InstrumentMode::UvVis => Analysis::LambdaMax(table.spectrum()),
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                Analysis::Calibration(table.calibration_points())
            }
            InstrumentMode::Chromatography => Analysis::PeakQuantification(table.peaks()),
            InstrumentMode::Ftir => Analysis::FunctionalGroups {
                spectrum: table.spectrum(),
                min_relative: self.config.ftir_peak_threshold,
            },
        }
    }

    /// Store a new fit and, when it changed, seed the concentration inputs
    /// with its rounded coefficients.
    fn accept_calibration(&mut self, model: CalibrationModel) {
        if self.calibration == Some(model) {
            return;
        }
        log::info!(
            "Calibration: {} (R² = {:.4}, n = {})",
            model.equation(self.config.decimals),
            model.r_squared,
            model.n_points
        );
        let scale = 10f64.powi(self.config.decimals as i32);
        self.slope_input = (model.slope * scale).round() / scale;
        self.intercept_input = (model.intercept * scale).round() / scale;
        self.calibration = Some(model);
    }

    /// Forget the last fit once the standards no longer produce one.
    fn discard_calibration(&mut self) {
        if matches!(self.mode, InstrumentMode::Calibration | InstrumentMode::Concentration) {
            self.calibration = None;
            self.sample_concentration = None;
        }
    }

    /// Back-calculate the sample concentration from the entered values.
    pub fn compute_concentration(&mut self) {
        if self.calibration.is_none() {
            log::warn!("Concentration requested without a valid calibration");
            self.sample_concentration = None;
            if !self.status.as_ref().is_some_and(|s| s.is_error) {
                self.set_error("No valid calibration: fix the standards first".into());
            }
            return;
        }
        match solve_concentration(self.sample_absorbance, self.slope_input, self.intercept_input) {
            Ok(c) => {
                log::info!("Absorbance {} → concentration {c}", self.sample_absorbance);
                self.sample_concentration = Some(c);
                self.status = None;
            }
            Err(e) => {
                log::warn!("Concentration rejected: {e}");
                self.sample_concentration = None;
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Functional group of [`AppState::query_wavenumber`].
    pub fn query_group(&self) -> FunctionalGroup {
        match Analysis::ClassifyWavenumber(self.query_wavenumber).run() {
            Ok(AnalysisOutcome::Wavenumber(group)) => group,
            _ => FunctionalGroup::Unclassified,
        }
    }

    /// Sample spectrum of the active input, if the mode has one.
    pub fn spectrum(&self) -> Option<Vec<SpectrumSample>> {
        match self.mode {
            InstrumentMode::UvVis | InstrumentMode::Ftir => self.table.as_ref().map(DataTable::spectrum),
            _ => None,
        }
    }

    /// Load a file into the active editor.
    pub fn load_file(&mut self, path: &Path) {
        match load_table(path, self.mode, self.config.delimiter) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    table.len(),
                    table.column_names,
                    path.display()
                );
                self.set_input(table.to_text(self.config.delimiter));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.set_error(format!("Error: {e:#}"));
            }
        }
    }

    /// Fill the active editor with simulated instrument output.
    pub fn load_demo(&mut self, seed: u64) {
        let columns = self.mode.columns().iter().map(|c| c.to_string()).collect();
        let rows: Result<Vec<Vec<f64>>, NormalError> = match self.mode {
            InstrumentMode::UvVis => simulate::uvvis_spectrum(seed).map(|s| spectrum_rows(&s)),
            InstrumentMode::Ftir => simulate::ftir_spectrum(seed).map(|s| spectrum_rows(&s)),
            InstrumentMode::Chromatography => Ok(simulate::chromatogram(seed, 5)
                .iter()
                .map(|p| vec![p.retention_time, p.height, p.width])
                .collect()),
            InstrumentMode::Calibration | InstrumentMode::Concentration => {
                let mut noise = simulate::NoiseSource::new(seed);
                (0..6)
                    .map(|i| -> Result<Vec<f64>, NormalError> {
                        let c = 5.0 * i as f64;
                        let a = 0.025 * c + 0.015 + noise.gauss(0.0, 0.005)?;
                        Ok(vec![c, (a * 1000.0).round() / 1000.0])
                    })
                    .collect()
            }
        };
        match rows {
            Ok(rows) => {
                let table = DataTable::new(columns, rows);
                self.set_input(table.to_text(self.config.delimiter));
            }
            Err(e) => {
                log::warn!("Simulation failed: {e}");
                self.set_error(format!("Simulation failed: {e}"));
            }
        }
    }

    /// Restore the example input of the active mode.
    pub fn reset_input(&mut self) {
        let text = self
            .mode
            .default_input()
            .replace(',', &self.config.delimiter.to_string());
        self.set_input(text);
    }

    pub fn set_trace_color(&mut self, color: Color32) {
        self.trace_color = color;
        self.config.trace_color = to_hex(color);
    }

    pub fn set_error(&mut self, text: String) {
        self.status = Some(Status {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.status = Some(Status {
            text,
            is_error: false,
        });
    }
}

fn spectrum_rows(samples: &[SpectrumSample]) -> Vec<Vec<f64>> {
    samples
        .iter()
        .map(|s| vec![s.x, (s.y * 10_000.0).round() / 10_000.0])
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::analysis::AnalysisError;

    #[test]
    fn starts_with_lambda_max_of_example() {
        let state = AppState::default();
        match &state.outcome {
            Some(AnalysisOutcome::LambdaMax(p)) => assert_eq!(p.sample.x, 350.0),
            other => panic!("unexpected {other:?}"),
        }
        assert!(state.status.is_none());
    }

    #[test]
    fn calibration_feeds_concentration_inputs() {
        let mut state = AppState::default();
        state.set_mode(InstrumentMode::Calibration);
        let model = state.calibration.expect("fit");
        assert_relative_eq!(state.slope_input, 0.0251, epsilon = 1e-12);
        assert_relative_eq!(state.intercept_input, 0.0157, epsilon = 1e-12);
        assert!(model.r_squared > 0.99);

        state.set_mode(InstrumentMode::Concentration);
        assert_eq!(state.input(), InstrumentMode::Calibration.default_input());
        state.sample_absorbance = 0.30;
        state.compute_concentration();
        let c = state.sample_concentration.unwrap();
        assert!((c - 11.3).abs() < 0.1, "{c}");
    }

    #[test]
    fn manual_slope_survives_recompute() {
        let mut state = AppState::default();
        state.set_mode(InstrumentMode::Concentration);
        state.slope_input = 0.05;
        state.recompute();
        assert_eq!(state.slope_input, 0.05);
    }

    #[test]
    fn zero_slope_is_reported() {
        let mut state = AppState::default();
        state.set_mode(InstrumentMode::Concentration);
        state.slope_input = 0.0;
        state.compute_concentration();
        assert!(state.sample_concentration.is_none());
        let status = state.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains(&AnalysisError::ZeroSlope.to_string()));
    }

    #[test]
    fn broken_standards_drop_the_old_fit() {
        let mut state = AppState::default();
        state.set_mode(InstrumentMode::Concentration);
        state.compute_concentration();
        assert!(state.sample_concentration.is_some());

        state.set_input("0,0.02\n5,abc".into());
        assert!(state.calibration.is_none());
        assert!(state.sample_concentration.is_none());
        state.compute_concentration();
        assert!(state.sample_concentration.is_none());
        let status = state.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.text.contains("line 2"), "{}", status.text);

        state.set_input("1,0.1\n1,0.2".into());
        assert!(state.calibration.is_none());
        state.compute_concentration();
        assert!(state.sample_concentration.is_none());
        assert!(state.status.unwrap().is_error);
    }

    #[test]
    fn wavenumber_lookup() {
        let mut state = AppState::default();
        state.query_wavenumber = 1715.0;
        assert_eq!(state.query_group(), FunctionalGroup::CarbonylStretch);
        state.query_wavenumber = 2200.0;
        assert_eq!(state.query_group(), FunctionalGroup::Unclassified);
    }

    #[test]
    fn bad_input_keeps_app_usable() {
        let mut state = AppState::default();
        state.set_input("200,0.1\n250,abc".into());
        assert!(state.outcome.is_none());
        assert!(state.status.as_ref().unwrap().text.contains("line 2, field 2"));

        state.reset_input();
        assert!(state.outcome.is_some());
        assert!(state.status.is_none());
    }

    #[test]
    fn chromatography_zero_area() {
        let mut state = AppState::default();
        state.set_mode(InstrumentMode::Chromatography);
        state.set_input("1.0,0,0.5\n2.0,0,0.5".into());
        assert!(state.status.unwrap().text.contains("zero"));
    }

    #[test]
    fn demo_data_analyses_cleanly() {
        let mut state = AppState::default();
        for mode in InstrumentMode::ALL {
            state.set_mode(mode);
            state.load_demo(42);
            assert!(state.outcome.is_some(), "{mode}: {:?}", state.status);
        }
    }

    #[test]
    fn custom_delimiter_applies_to_examples() {
        let config = LabConfig {
            delimiter: ';',
            ..LabConfig::default()
        };
        let state = AppState::new(config);
        assert!(state.input().starts_with("200;0.01"));
        assert!(state.outcome.is_some());
    }
}

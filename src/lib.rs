//! Educational simulator for UV-Vis, gas-chromatography and FTIR instruments.
//!
//! The numeric core lives in [`analysis`], input handling in [`data`]; the
//! remaining modules back the egui application in `main.rs`.

pub mod analysis;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;

pub use analysis::{Analysis, AnalysisError, AnalysisOutcome};
pub use config::LabConfig;
pub use data::model::{
    CalibrationPoint, ChromatogramPeak, DataTable, InstrumentMode, SpectrumSample,
};

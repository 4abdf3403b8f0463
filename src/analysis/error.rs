use thiserror::Error;

/// Failures of the numeric procedures.  None of them is fatal: the caller
/// reports the message and lets the user correct the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("at least {needed} data points are required, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("all concentrations are identical ({value}); the slope is undefined")]
    DegenerateInput { value: f64 },

    #[error("{quantity} = {value} is out of numeric range")]
    NotFinite { quantity: &'static str, value: f64 },

    #[error("slope must not be zero")]
    ZeroSlope,

    #[error("total peak area is zero; percent areas are undefined")]
    ZeroArea,

    #[error("no data to analyse")]
    EmptyInput,

    #[error("row {index}: {field} = {value} is invalid ({reason})")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

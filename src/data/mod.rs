/// Data layer: core types, parsing, and loading.
///
/// Architecture:
/// ```text
///  pasted text        .csv / .txt / .tsv / .json / .parquet
///        │                        │
///        ▼                        ▼
///   ┌──────────┐            ┌──────────┐
///   │  parser   │            │  loader   │
///   └──────────┘            └──────────┘
///        │                        │
///        └──────────┬─────────────┘
///                   ▼
///            ┌────────────┐
///            │ DataTable   │  rows of f64, column names
///            └────────────┘
///                   │
///                   ▼
///   CalibrationPoint / ChromatogramPeak / SpectrumSample
/// ```

pub mod loader;
pub mod model;
pub mod parser;
pub mod writer;

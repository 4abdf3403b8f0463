use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::color::parse_hex;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "spectro-lab.toml";

/// Largest `decimals` that still round-trips through `f64`.
pub const MAX_DECIMALS: usize = 15;

/// Characters that may appear inside a number literal.
const NUMERIC_CHARS: [char; 5] = ['.', '-', '+', 'e', 'E'];

/// User-tunable settings, read from TOML.  Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Field separator for pasted text and `.csv`/`.txt` files.
    pub delimiter: char,
    /// Sample trace colour, `#rrggbb`.
    pub trace_color: String,
    /// Factor applied to the sample spectrum to draw the reference overlay.
    pub reference_scale: f64,
    /// Whether the reference overlay is shown at start-up.
    pub show_reference: bool,
    /// Digits after the decimal point in displayed results.
    pub decimals: usize,
    /// Minimum height, relative to the strongest band, of annotated FTIR bands.
    pub ftir_peak_threshold: f64,
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            delimiter: ',',
            trace_color: "#1f77b4".to_string(),
            reference_scale: 0.8,
            show_reference: false,
            decimals: 4,
            ftir_peak_threshold: 0.1,
        }
    }
}

impl LabConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: LabConfig = toml::from_str(text).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("Using config from {}", fallback.display());
            return Self::from_file(&fallback);
        }
        Ok(Self::default())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialising config")
    }

    fn validate(&self) -> Result<()> {
        if self.delimiter.is_ascii_digit() || NUMERIC_CHARS.contains(&self.delimiter) {
            bail!("delimiter {:?} would clash with numbers", self.delimiter);
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            bail!("delimiter {:?} would clash with line breaks", self.delimiter);
        }
        if self.decimals > MAX_DECIMALS {
            bail!("decimals must be at most {MAX_DECIMALS}, got {}", self.decimals);
        }
        parse_hex(&self.trace_color)?;
        if !self.reference_scale.is_finite() || self.reference_scale < 0.0 {
            bail!("reference_scale must be finite and ≥ 0, got {}", self.reference_scale);
        }
        if !(0.0..=1.0).contains(&self.ftir_peak_threshold) {
            bail!(
                "ftir_peak_threshold must lie in [0, 1], got {}",
                self.ftir_peak_threshold
            );
        }
        Ok(())
    }
}

//! Optional TOML settings file.
//!
//! Every key may be omitted; missing keys keep the built-in defaults.
//!
//! ```toml
//! padding = 3.0
//! transition_ms = 750
//! min_radius = 0.5
//! palette = ["#d73027", "#fee08b", "#1a9850"]
//! window_width = 1280.0
//! window_height = 860.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::app::{ChartStyle, DEFAULT_MIN_RADIUS};
use crate::chart::{DEFAULT_PADDING, Palette, PaletteError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid palette")]
    Palette(#[from] PaletteError),
    #[error("{key} must be a finite non-negative number, got {value}")]
    OutOfRange { key: &'static str, value: f64 },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub padding: f64,
    pub transition_ms: u64,
    pub min_radius: f32,
    /// Low → high relevance; empty keeps the built-in palette.
    pub palette: Vec<String>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            transition_ms: 750,
            min_radius: DEFAULT_MIN_RADIUS,
            palette: Vec::new(),
            window_width: 1280.0,
            window_height: 860.0,
        }
    }
}

impl Settings {
    /// Reads `path` when given; otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?settings, "loaded config");
        Ok(settings)
    }

    pub fn chart_style(&self) -> Result<ChartStyle, ConfigError> {
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(ConfigError::OutOfRange {
                key: "padding",
                value: self.padding,
            });
        }
        if !(self.min_radius.is_finite() && self.min_radius >= 0.0) {
            return Err(ConfigError::OutOfRange {
                key: "min_radius",
                value: f64::from(self.min_radius),
            });
        }

        let palette = if self.palette.is_empty() {
            Palette::default()
        } else {
            Palette::from_hex_list(&self.palette)?
        };

        tracing::debug!(steps = palette.steps(), "chart palette ready");
        Ok(ChartStyle {
            padding: self.padding,
            transition_secs: self.transition_ms as f64 / 1000.0,
            min_radius: self.min_radius,
            palette,
        })
    }

    pub fn window_size(&self) -> [f32; 2] {
        [self.window_width.max(320.0), self.window_height.max(240.0)]
    }
}

//! Surface configuration: the declared logical size of a facade.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared logical width and height of a drawing surface.
///
/// Both fields are required. The size is what the caller declares, not
/// what the target reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON or a missing `width`/`height` field.
    #[error("invalid surface config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("surface {field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("surface {field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
}

impl SurfaceConfig {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Parse `{"width": .., "height": ..}` and reject unusable sizes.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SurfaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

//! Plain value types shared by every backend.
//!
//! These mirror the argument and result dictionaries of the standard 2D
//! context: winding rules, pattern repetition, the three `drawImage`
//! forms, text metrics, and context creation attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Winding rule for fill, clip, and point-in-path tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn as_str(self) -> &'static str {
        match self {
            FillRule::NonZero => "nonzero",
            FillRule::EvenOdd => "evenodd",
        }
    }
}

impl fmt::Display for FillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tiling mode for `create_pattern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Repetition {
    #[default]
    #[serde(rename = "repeat")]
    Repeat,
    #[serde(rename = "repeat-x")]
    RepeatX,
    #[serde(rename = "repeat-y")]
    RepeatY,
    #[serde(rename = "no-repeat")]
    NoRepeat,
}

impl Repetition {
    pub fn as_str(self) -> &'static str {
        match self {
            Repetition::Repeat => "repeat",
            Repetition::RepeatX => "repeat-x",
            Repetition::RepeatY => "repeat-y",
            Repetition::NoRepeat => "no-repeat",
        }
    }
}

/// An `(x, y, width, height)` rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Argument forms of `drawImage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImagePlacement {
    /// `drawImage(image, dx, dy)`
    At { dx: f64, dy: f64 },
    /// `drawImage(image, dx, dy, dw, dh)`
    Scaled { dx: f64, dy: f64, dw: f64, dh: f64 },
    /// `drawImage(image, sx, sy, sw, sh, dx, dy, dw, dh)`
    Cropped { source: Region, dest: Region },
}

/// Result of `measure_text`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub width: f64,
    pub actual_bounding_box_left: f64,
    pub actual_bounding_box_right: f64,
    pub actual_bounding_box_ascent: f64,
    pub actual_bounding_box_descent: f64,
    pub font_bounding_box_ascent: f64,
    pub font_bounding_box_descent: f64,
}

/// Options passed to the target when the 2D context is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    pub alpha: bool,
    pub desynchronized: bool,
    pub will_read_frequently: bool,
}

impl ContextOptions {
    /// Opaque surface: no alpha channel blended against the page backdrop.
    pub fn opaque() -> Self {
        Self {
            alpha: false,
            ..Self::default()
        }
    }
}

/// What a context reports from `getContextAttributes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextAttributes {
    pub alpha: bool,
    pub desynchronized: bool,
    pub will_read_frequently: bool,
}

impl From<ContextOptions> for ContextAttributes {
    fn from(opts: ContextOptions) -> Self {
        Self {
            alpha: opts.alpha,
            desynchronized: opts.desynchronized,
            will_read_frequently: opts.will_read_frequently,
        }
    }
}

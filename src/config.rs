//! Tunable parameters for the selection tools.
//!
//! Defaults reproduce the behaviour of the interactive tool: a magic wand
//! tolerance of 30, additive wand clicks, tolerance 40 for object detection
//! and an edge threshold of 50.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MIN_TOLERANCE: u8 = 5;
pub const MAX_TOLERANCE: u8 = 100;
pub const DEFAULT_TOLERANCE: u8 = 30;

/// Magic wand tolerance as accepted from the user, bounded to [5, 100].
///
/// The core algorithms take a raw `f64` and work for any non-negative value;
/// this type only enforces the range at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tolerance(u8);

impl Tolerance {
    pub fn new(value: u8) -> Result<Self> {
        if (MIN_TOLERANCE..=MAX_TOLERANCE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidConfig(format!(
                "tolerance {value} outside {MIN_TOLERANCE}..={MAX_TOLERANCE}"
            )))
        }
    }

    /// Clamp an arbitrary slider value into range.
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(MIN_TOLERANCE as i64, MAX_TOLERANCE as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(DEFAULT_TOLERANCE)
    }
}

impl TryFrom<u8> for Tolerance {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Tolerance> for u8 {
    fn from(t: Tolerance) -> u8 {
        t.0
    }
}

/// Which image the object detector floods over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    /// Edge-intensity map, expanded to RGB.
    #[default]
    Edges,
    /// Contrast-enhanced RGB image. Floods colour regions instead of the
    /// areas between edges.
    Contrast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Magic wand tolerance
    pub tolerance: Tolerance,
    /// Wand clicks accumulate into the current mask instead of replacing it
    pub additive: bool,
    /// Flood tolerance used from each detector seed
    pub object_tolerance: f64,
    /// Contrast factor applied before detection (1.0 = unchanged)
    pub object_contrast: f32,
    /// Median window size used to clean the detector mask (odd)
    pub object_smoothing: usize,
    pub object_source: DetectionSource,
    /// Edge intensity above which a pixel seeds a selected neighbourhood
    pub edge_threshold: u8,
    /// Contrast factor applied to the grayscale edge map
    pub edge_contrast: f32,
    /// Half-width of the square neighbourhood selected around edge pixels
    pub edge_radius: usize,
    /// Median window size used to clean the edge mask (odd)
    pub edge_smoothing: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            additive: true,
            object_tolerance: 40.0,
            object_contrast: 2.0,
            object_smoothing: 5,
            object_source: DetectionSource::Edges,
            edge_threshold: 50,
            edge_contrast: 3.0,
            edge_radius: 2,
            edge_smoothing: 3,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.object_tolerance.is_finite() || self.object_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "object_tolerance must be a non-negative number, got {}",
                self.object_tolerance
            )));
        }
        for (name, factor) in [
            ("object_contrast", self.object_contrast),
            ("edge_contrast", self.edge_contrast),
        ] {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {factor}"
                )));
            }
        }
        for (name, size) in [
            ("object_smoothing", self.object_smoothing),
            ("edge_smoothing", self.edge_smoothing),
        ] {
            if size == 0 || size % 2 == 0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be an odd window size, got {size}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_bounds() {
        assert!(Tolerance::new(4).is_err());
        assert!(Tolerance::new(101).is_err());
        assert_eq!(Tolerance::new(5).unwrap().get(), 5);
        assert_eq!(Tolerance::new(100).unwrap().get(), 100);
    }

    #[test]
    fn test_tolerance_saturating() {
        assert_eq!(Tolerance::saturating(-3).get(), MIN_TOLERANCE);
        assert_eq!(Tolerance::saturating(250).get(), MAX_TOLERANCE);
        assert_eq!(Tolerance::saturating(42).get(), 42);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SelectionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_even_smoothing_rejected() {
        let config = SelectionConfig {
            object_smoothing: 4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SelectionConfig =
            serde_json::from_str(r#"{"tolerance": 55, "object_source": "contrast"}"#).unwrap();
        assert_eq!(config.tolerance.get(), 55);
        assert_eq!(config.object_source, DetectionSource::Contrast);
        assert_eq!(config.edge_threshold, 50);
        assert!(config.additive);
    }

    #[test]
    fn test_out_of_range_json_tolerance_rejected() {
        let parsed: std::result::Result<SelectionConfig, _> =
            serde_json::from_str(r#"{"tolerance": 200}"#);
        assert!(parsed.is_err());
    }
}

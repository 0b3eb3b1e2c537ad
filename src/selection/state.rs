//! The current selection as an explicit value.
//!
//! `SelectionState` holds at most one mask plus the manually placed points.
//! Transitions consume the state and return the next one. When both a mask
//! and points exist, the mask is authoritative.

use log::debug;

use super::{edge_region, flood_fill, object_detect, polygon};
use crate::config::SelectionConfig;
use crate::error::{Error, Result};
use crate::image::PixelBuffer;
use crate::mask::Mask;

/// Tool that produced the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    None,
    MagicWand,
    Manual,
    SmartObject,
    Edge,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionState {
    pub mask: Option<Mask>,
    /// Manual points in input space, converted when the selection is resolved
    pub points: Vec<(f64, f64)>,
    pub mode: SelectionMode,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Magic wand click at image coordinates (x, y).
    ///
    /// In additive mode the new region is unioned with the existing mask,
    /// otherwise it replaces it. A click outside the image leaves the
    /// state unchanged.
    pub fn with_wand_click(
        self,
        image: &PixelBuffer,
        x: i64,
        y: i64,
        config: &SelectionConfig,
    ) -> Result<Self> {
        if !image.contains(x, y) {
            debug!("wand click ({x}, {y}) outside image ignored");
            return Ok(self);
        }

        let region = flood_fill::grow(image, x, y, config.tolerance.as_f64());
        let mask = match self.mask {
            Some(existing) if config.additive => existing.union(&region)?,
            _ => region,
        };

        Ok(Self {
            mask: Some(mask),
            points: self.points,
            mode: SelectionMode::MagicWand,
        })
    }

    /// Replace the selection with the detected main object.
    pub fn with_detected_object(self, image: &PixelBuffer, config: &SelectionConfig) -> Result<Self> {
        let detection = object_detect::detect_main_object_with(image, config)?;
        Ok(Self {
            mask: Some(detection.mask),
            points: self.points,
            mode: SelectionMode::SmartObject,
        })
    }

    /// Replace the selection with the edge-guided mask.
    pub fn with_edge_selection(self, image: &PixelBuffer, config: &SelectionConfig) -> Result<Self> {
        let mask = edge_region::edge_selection_with(image, config)?;
        Ok(Self {
            mask: Some(mask),
            points: self.points,
            mode: SelectionMode::Edge,
        })
    }

    /// Start a fresh manual selection, dropping any points and mask.
    pub fn manual() -> Self {
        Self {
            mode: SelectionMode::Manual,
            ..Self::default()
        }
    }

    /// Append a manual point.
    pub fn with_point(mut self, x: f64, y: f64) -> Self {
        self.points.push((x, y));
        self.mode = SelectionMode::Manual;
        self
    }

    /// Drop mask and points, keeping the active tool.
    pub fn cleared(self) -> Self {
        Self {
            mask: None,
            points: Vec::new(),
            mode: self.mode,
        }
    }

    /// Invert the mask if there is one.
    pub fn inverted(mut self) -> Self {
        self.mask = self.mask.map(|m| m.invert());
        self
    }

    pub fn has_selection(&self) -> bool {
        self.mask.is_some() || self.points.len() >= 3
    }

    /// Polygon preview of the manual points, once there are at least three.
    pub fn manual_preview<F>(&self, width: usize, height: usize, to_image: F) -> Option<Mask>
    where
        F: Fn((f64, f64)) -> (i64, i64),
    {
        if self.points.len() < 3 {
            return None;
        }
        let points = image_points(&self.points, width, height, to_image);
        polygon::rasterize(&points, width, height).ok()
    }

    /// The mask to apply to a `width`×`height` image.
    ///
    /// The mask wins if present. Otherwise manual points are mapped through
    /// `to_image`, clamped to the image and rasterized. Fails with
    /// `EmptySelection` when there is neither a mask nor three points.
    pub fn resolve_mask<F>(&self, width: usize, height: usize, to_image: F) -> Result<Mask>
    where
        F: Fn((f64, f64)) -> (i64, i64),
    {
        if let Some(mask) = &self.mask {
            mask.check_dimensions(width, height)?;
            return Ok(mask.clone());
        }
        if self.points.len() < 3 {
            return Err(Error::EmptySelection);
        }
        let points = image_points(&self.points, width, height, to_image);
        polygon::rasterize(&points, width, height)
    }
}

fn image_points<F>(points: &[(f64, f64)], width: usize, height: usize, to_image: F) -> Vec<(i64, i64)>
where
    F: Fn((f64, f64)) -> (i64, i64),
{
    let max_x = width.saturating_sub(1) as i64;
    let max_y = height.saturating_sub(1) as i64;
    points
        .iter()
        .map(|&p| {
            let (x, y) = to_image(p);
            (x.clamp(0, max_x), y.clamp(0, max_y))
        })
        .collect()
}

/// Identity mapping for points already in image space.
pub fn image_space((x, y): (f64, f64)) -> (i64, i64) {
    (x as i64, y as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half red, right half blue.
    fn halves() -> PixelBuffer {
        let mut image = PixelBuffer::filled(10, 10, [255, 0, 0]);
        for y in 0..10 {
            for x in 5..10 {
                image.set_rgb(x, y, [0, 0, 255]);
            }
        }
        image
    }

    #[test]
    fn test_additive_wand_accumulates() {
        let image = halves();
        let config = SelectionConfig::default();
        let state = SelectionState::new()
            .with_wand_click(&image, 0, 0, &config)
            .unwrap()
            .with_wand_click(&image, 9, 9, &config)
            .unwrap();
        assert_eq!(state.mode, SelectionMode::MagicWand);
        assert_eq!(state.mask.unwrap().count_selected(), 100);
    }

    #[test]
    fn test_non_additive_wand_replaces() {
        let image = halves();
        let config = SelectionConfig {
            additive: false,
            ..Default::default()
        };
        let state = SelectionState::new()
            .with_wand_click(&image, 0, 0, &config)
            .unwrap()
            .with_wand_click(&image, 9, 9, &config)
            .unwrap();
        let mask = state.mask.unwrap();
        assert_eq!(mask.count_selected(), 50);
        assert!(mask.is_selected(9, 0));
        assert!(!mask.is_selected(0, 0));
    }

    #[test]
    fn test_wand_outside_image_is_noop() {
        let image = halves();
        let state = SelectionState::new()
            .with_wand_click(&image, 40, 2, &SelectionConfig::default())
            .unwrap();
        assert_eq!(state, SelectionState::new());
    }

    #[test]
    fn test_additive_wand_rejects_stale_mask() {
        let image = halves();
        let state = SelectionState {
            mask: Some(Mask::full(3, 3)),
            ..Default::default()
        };
        let result = state.with_wand_click(&image, 0, 0, &SelectionConfig::default());
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }

    #[test]
    fn test_resolve_prefers_mask_over_points() {
        let mut mask = Mask::empty(10, 10);
        mask.select(5, 5);
        let state = SelectionState {
            mask: Some(mask.clone()),
            points: vec![(0.0, 0.0), (9.0, 0.0), (9.0, 9.0)],
            mode: SelectionMode::MagicWand,
        };
        assert_eq!(state.resolve_mask(10, 10, image_space).unwrap(), mask);
    }

    #[test]
    fn test_resolve_points_with_mapping() {
        // Display is scaled 2x and offset by 10
        let to_image = |(x, y): (f64, f64)| (((x - 10.0) / 2.0) as i64, ((y - 10.0) / 2.0) as i64);
        let state = SelectionState::manual()
            .with_point(10.0, 10.0)
            .with_point(18.0, 10.0)
            .with_point(18.0, 18.0)
            .with_point(10.0, 18.0);
        let mask = state.resolve_mask(10, 10, to_image).unwrap();
        assert_eq!(mask.bounds(), Some((0, 0, 5, 5)));
        assert_eq!(mask.count_selected(), 25);
    }

    #[test]
    fn test_resolve_empty_selection() {
        let state = SelectionState::manual().with_point(1.0, 1.0).with_point(2.0, 2.0);
        assert!(!state.has_selection());
        assert_eq!(state.resolve_mask(5, 5, image_space), Err(Error::EmptySelection));
        assert!(state.manual_preview(5, 5, image_space).is_none());
    }

    #[test]
    fn test_points_clamped_to_image() {
        let state = SelectionState::manual()
            .with_point(-50.0, -50.0)
            .with_point(50.0, -50.0)
            .with_point(50.0, 50.0)
            .with_point(-50.0, 50.0);
        let mask = state.resolve_mask(4, 3, image_space).unwrap();
        assert_eq!(mask.count_selected(), 12);
    }

    #[test]
    fn test_invert_and_clear() {
        let image = halves();
        let config = SelectionConfig::default();
        let state = SelectionState::new()
            .with_wand_click(&image, 0, 0, &config)
            .unwrap()
            .inverted();
        let mask = state.mask.clone().unwrap();
        assert!(mask.is_selected(9, 0));
        assert!(!mask.is_selected(0, 0));

        let cleared = state.cleared();
        assert!(cleared.mask.is_none());
        assert_eq!(cleared.mode, SelectionMode::MagicWand);
        assert!(!cleared.has_selection());
    }

    #[test]
    fn test_detected_object_sets_mode() {
        let image = PixelBuffer::filled(6, 6, [40, 40, 40]);
        let state = SelectionState::new()
            .with_detected_object(&image, &SelectionConfig::default())
            .unwrap();
        assert_eq!(state.mode, SelectionMode::SmartObject);
        assert_eq!(state.mask.unwrap().count_selected(), 36);
    }

    #[test]
    fn test_edge_selection_sets_mode() {
        let image = PixelBuffer::filled(6, 6, [40, 40, 40]);
        let state = SelectionState::new()
            .with_edge_selection(&image, &SelectionConfig::default())
            .unwrap();
        assert_eq!(state.mode, SelectionMode::Edge);
        assert!(state.mask.unwrap().is_empty());
    }
}

//! Automatic "main object" detection without a trained model.
//!
//! The subject is assumed to sit roughly in the middle of the frame. The
//! image is contrast-enhanced and turned into an edge-intensity map. Five
//! seeds (the centre and four points a sixth of the frame away from it) are
//! each flood-filled over that edge map, so a region grows until it meets a
//! strong edge. The union of the five regions is cleaned with a median
//! filter. [`DetectionSource::Contrast`] floods the enhanced colours instead. A seed that
//! lands on background only adds a stray region; the others still cover
//! the object. Callers correct the result with invert or clear.

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

use super::flood_fill::grow;
use crate::config::{DetectionSource, SelectionConfig};
use crate::error::Result;
use crate::filters::{color_adjust, edge, grayscale, noise};
use crate::image::PixelBuffer;
use crate::mask::{union_all, Mask};

/// Detection output with the intermediate edge map for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDetection {
    pub mask: Mask,
    /// Grayscale edge intensity of the contrast-enhanced image
    pub edges: Array2<u8>,
    /// Seed coordinates that were flooded, as (x, y)
    pub seeds: Vec<(usize, usize)>,
}

/// Centre plus four points offset by width/6 and height/6, clamped to bounds.
pub fn seed_points(width: usize, height: usize) -> Vec<(usize, usize)> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let cx = width / 2;
    let cy = height / 2;
    let dx = width / 6;
    let dy = height / 6;
    let clamp_x = |x: usize| x.min(width - 1);
    let clamp_y = |y: usize| y.min(height - 1);

    vec![
        (cx, cy),
        (cx.saturating_sub(dx), cy),
        (clamp_x(cx + dx), cy),
        (cx, cy.saturating_sub(dy)),
        (cx, clamp_y(cy + dy)),
    ]
}

/// Detect the main object with default settings.
pub fn detect_main_object(image: &PixelBuffer) -> Mask {
    detect(image, &SelectionConfig::default()).mask
}

/// Detect the main object with explicit settings.
pub fn detect_main_object_with(image: &PixelBuffer, config: &SelectionConfig) -> Result<ObjectDetection> {
    config.validate()?;
    Ok(detect(image, config))
}

fn detect(image: &PixelBuffer, config: &SelectionConfig) -> ObjectDetection {
    let (width, height) = image.dimensions();
    let rgb = image.to_rgb();

    let enhanced = color_adjust::contrast_u8(rgb.view(), config.object_contrast);
    let edges_rgb = noise::median_u8(edge::find_edges_u8(enhanced.view()).view(), 1);
    let edges = grayscale::luma_u8(edges_rgb.view());

    let source = match config.object_source {
        DetectionSource::Contrast => PixelBuffer::from_array_unchecked(enhanced),
        DetectionSource::Edges => PixelBuffer::from_array_unchecked(grayscale::gray_to_rgb(edges.view())),
    };

    let seeds = seed_points(width, height);

    // Each seed is an independent fill; union is order-independent.
    let regions: Vec<Mask> = seeds
        .par_iter()
        .map(|&(x, y)| grow(&source, x as i64, y as i64, config.object_tolerance))
        .collect();

    let mask = match union_all(width, height, regions) {
        Ok(mask) => mask.median_smoothed(config.object_smoothing),
        // Every region was grown on `source`, which has the image's dimensions.
        Err(_) => Mask::empty(width, height),
    };

    debug!(
        "object detection on {width}x{height}: {} pixels from {} seeds",
        mask.count_selected(),
        seeds.len()
    );

    ObjectDetection { mask, edges, seeds }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gray background with a centred dark square covering the middle third.
    fn centred_square(size: usize) -> PixelBuffer {
        let mut image = PixelBuffer::filled(size, size, [200, 200, 200]);
        let lo = size / 4;
        let hi = size - size / 4;
        for y in lo..hi {
            for x in lo..hi {
                image.set_rgb(x, y, [30, 40, 50]);
            }
        }
        image
    }

    #[test]
    fn test_seed_points_layout() {
        let seeds = seed_points(60, 30);
        assert_eq!(seeds, vec![(30, 15), (20, 15), (40, 15), (30, 10), (30, 20)]);
    }

    #[test]
    fn test_seed_points_tiny_image_stays_in_bounds() {
        for (w, h) in [(1, 1), (2, 1), (1, 5), (7, 3)] {
            for (x, y) in seed_points(w, h) {
                assert!(x < w && y < h, "seed ({x}, {y}) outside {w}x{h}");
            }
        }
        assert!(seed_points(0, 4).is_empty());
    }

    fn contrast_source() -> SelectionConfig {
        SelectionConfig {
            object_source: DetectionSource::Contrast,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_floods_edge_map() {
        // The 3x3 median erases the one-pixel edge ring around the square
        // except its four inner corners, so the edge-map flood covers
        // everything and the 5x5 majority fills those four pixels back in.
        let image = centred_square(24);
        let mask = detect_main_object(&image);
        let edges = SelectionConfig {
            object_source: DetectionSource::Edges,
            ..Default::default()
        };
        assert_eq!(mask, detect_main_object_with(&image, &edges).unwrap().mask);
        assert_eq!(mask.count_selected(), 24 * 24);

        let contrast = detect_main_object_with(&image, &contrast_source()).unwrap().mask;
        assert_ne!(mask, contrast);
    }

    #[test]
    fn test_contrast_source_detects_centred_square() {
        let image = centred_square(24);
        let mask = detect_main_object_with(&image, &contrast_source()).unwrap().mask;
        assert!(mask.is_selected(12, 12));
        assert!(!mask.is_selected(0, 0));
        assert!(!mask.is_selected(23, 23));
        // The 5x5 median trims three pixels from each square corner
        assert!(!mask.is_selected(6, 6));
        assert!(mask.is_selected(7, 7));
        assert_eq!(mask.count_selected(), 12 * 12 - 4 * 3);
    }

    #[test]
    fn test_uniform_image_selects_everything() {
        let image = PixelBuffer::filled(10, 10, [90, 90, 90]);
        assert_eq!(detect_main_object(&image).count_selected(), 100);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let image = centred_square(18);
        assert_eq!(detect_main_object(&image), detect_main_object(&image));
    }

    #[test]
    fn test_reports_edges_and_seeds() {
        let image = centred_square(24);
        let detection = detect_main_object_with(&image, &SelectionConfig::default()).unwrap();
        assert_eq!(detection.edges.dim(), (24, 24));
        assert_eq!(detection.seeds.len(), 5);
        assert_eq!(detection.edges[[12, 12]], 0);
        // Inner corner of the ring keeps the diagonal response (240 after contrast)
        assert_eq!(detection.edges[[6, 6]], 240);
        assert_eq!(detection.edges[[5, 12]], 0);
    }

    #[test]
    fn test_edge_source_on_flat_image() {
        let image = PixelBuffer::filled(10, 10, [90, 90, 90]);
        let config = SelectionConfig {
            object_source: DetectionSource::Edges,
            ..Default::default()
        };
        let detection = detect_main_object_with(&image, &config).unwrap();
        assert!(detection.edges.iter().all(|&v| v == 0));
        assert_eq!(detection.mask.count_selected(), 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let image = centred_square(8);
        let config = SelectionConfig {
            object_contrast: 0.0,
            ..Default::default()
        };
        assert!(detect_main_object_with(&image, &config).is_err());
    }

    #[test]
    fn test_empty_image() {
        let image = PixelBuffer::filled(0, 0, [0, 0, 0]);
        assert!(detect_main_object(&image).is_empty());
    }
}

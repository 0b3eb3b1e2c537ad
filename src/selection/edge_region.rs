//! Edge-guided selection.
//!
//! Every strong edge pixel selects a small square neighbourhood around it.
//! This thickens edge contours into bands instead of tracing the area they
//! enclose, so broken contours still produce a usable selection.

use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::config::SelectionConfig;
use crate::error::Result;
use crate::filters::{color_adjust, edge, grayscale};
use crate::image::PixelBuffer;
use crate::mask::Mask;

pub const EDGE_THRESHOLD: u8 = 50;
pub const EDGE_RADIUS: usize = 2;
pub const EDGE_SMOOTHING: usize = 3;

/// Build a mask from an edge-intensity map.
///
/// # Arguments
/// * `edge_map` - (height, width) edge intensities
/// * `threshold` - Pixels strictly above this value count as edges
///
/// # Returns
/// Dilated, median-smoothed edge mask
pub fn build_from_edges(edge_map: ArrayView2<u8>, threshold: u8) -> Mask {
    build_from_edges_with(edge_map, threshold, EDGE_RADIUS, EDGE_SMOOTHING)
}

/// [`build_from_edges`] with explicit neighbourhood radius and median size.
pub fn build_from_edges_with(
    edge_map: ArrayView2<u8>,
    threshold: u8,
    radius: usize,
    smoothing: usize,
) -> Mask {
    let (height, width) = edge_map.dim();
    let mut mask = Mask::empty(width, height);
    let mut edge_pixels = 0usize;

    for ((y, x), &v) in edge_map.indexed_iter() {
        if v <= threshold {
            continue;
        }
        edge_pixels += 1;

        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(height - 1);
        let x0 = x.saturating_sub(radius);
        let x1 = (x + radius).min(width - 1);
        for ny in y0..=y1 {
            for nx in x0..=x1 {
                mask.select(nx, ny);
            }
        }
    }

    debug!("edge mask: {edge_pixels} edge pixels above {threshold}");

    mask.median_smoothed(smoothing)
}

/// Grayscale edge-intensity map used by the edge selection tool.
///
/// Finds edges, smooths them with a 5x5 kernel, converts to luma and
/// stretches contrast by `contrast`.
pub fn edge_map(image: &PixelBuffer, contrast: f32) -> Array2<u8> {
    let rgb = image.to_rgb();
    let edges = edge::find_edges_u8(rgb.view());
    let smoothed = edge::smooth_more_u8(edges.view());
    let gray = grayscale::luma_u8(smoothed.view());
    color_adjust::contrast_gray_u8(gray.view(), contrast)
}

/// Full edge selection with default settings.
pub fn edge_selection(image: &PixelBuffer) -> Mask {
    let config = SelectionConfig::default();
    select(image, &config)
}

/// Full edge selection with explicit settings.
pub fn edge_selection_with(image: &PixelBuffer, config: &SelectionConfig) -> Result<Mask> {
    config.validate()?;
    Ok(select(image, config))
}

fn select(image: &PixelBuffer, config: &SelectionConfig) -> Mask {
    let map = edge_map(image, config.edge_contrast);
    build_from_edges_with(
        map.view(),
        config.edge_threshold,
        config.edge_radius,
        config.edge_smoothing,
    )
}

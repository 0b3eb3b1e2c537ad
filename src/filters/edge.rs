//! Edge detection and edge-map smoothing.
//!
//! `find_edges_u8` convolves each colour channel with the 3x3 kernel
//!
//! ```text
//! -1 -1 -1
//! -1  8 -1
//! -1 -1 -1
//! ```
//!
//! so flat regions become 0 and any local change becomes bright. The
//! one-pixel border, where the kernel does not fit, is left at 0. PIL's
//! FIND_EDGES copies the input pixels there instead; a zero border never
//! reads as an edge, so floods over the edge map pass along the frame.
//!
//! Alpha (if present) is preserved.

use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView3, Axis};

/// 5x5 smoothing kernel, weights sum to 100.
const SMOOTH_MORE: [[i32; 5]; 5] = [
    [1, 1, 1, 1, 1],
    [1, 5, 5, 5, 1],
    [1, 5, 44, 5, 1],
    [1, 5, 5, 5, 1],
    [1, 1, 1, 1, 1],
];
const SMOOTH_MORE_SCALE: i32 = 100;

// ============================================================================
// Find Edges
// ============================================================================

/// Find edges with a 3x3 high-pass kernel.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
///
/// # Returns
/// Per-channel edge intensity (white edges on black), same channel count
pub fn find_edges_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                if channels == 4 {
                    row[[x, 3]] = input[[y, x, 3]];
                }
                if y == 0 || x == 0 || y + 1 >= height || x + 1 >= width {
                    continue;
                }
                for c in 0..color_channels {
                    let mut sum = 8 * input[[y, x, c]] as i32;
                    for ky in 0..3 {
                        for kx in 0..3 {
                            if ky != 1 || kx != 1 {
                                sum -= input[[y + ky - 1, x + kx - 1, c]] as i32;
                            }
                        }
                    }
                    row[[x, c]] = sum.clamp(0, 255) as u8;
                }
            }
        });

    output
}

// ============================================================================
// Smooth More
// ============================================================================

/// Heavy 5x5 smoothing, used to join fragmented edge responses.
///
/// Borders are handled by clamping sample coordinates to the image.
pub fn smooth_more_u8(input: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    let color_channels = if channels == 4 { 3 } else { channels };

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                for c in 0..color_channels {
                    let mut sum = 0i32;
                    for (ky, weights) in SMOOTH_MORE.iter().enumerate() {
                        let sy = (y as isize + ky as isize - 2).clamp(0, height as isize - 1) as usize;
                        for (kx, &w) in weights.iter().enumerate() {
                            let sx =
                                (x as isize + kx as isize - 2).clamp(0, width as isize - 1) as usize;
                            sum += w * input[[sy, sx, c]] as i32;
                        }
                    }
                    row[[x, c]] = ((sum + SMOOTH_MORE_SCALE / 2) / SMOOTH_MORE_SCALE).clamp(0, 255) as u8;
                }
                if channels == 4 {
                    row[[x, 3]] = input[[y, x, 3]];
                }
            }
        });

    output
}

//! Median filter for edge maps.
//!
//! The object detector runs a 3x3 median (`radius = 1`) over the
//! find-edges output before converting it to luma. Lines one pixel wide,
//! such as the response along a clean object outline, have at most three
//! samples in any 3x3 window and vanish. Thicker or denser responses
//! (texture, noise, corners) survive, so the seeded flood stops only at
//! edges that carry real structure.

use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView3, Axis};

/// Largest supported radius; the window is at most 21x21.
const MAX_RADIUS: usize = 10;

/// Clamped sample offsets `pos - radius ..= pos + radius` along one axis.
fn window(pos: usize, radius: usize, len: usize) -> impl Iterator<Item = usize> {
    let lo = pos as isize - radius as isize;
    let last = len as isize - 1;
    (lo..=lo + 2 * radius as isize).map(move |p| p.clamp(0, last) as usize)
}

/// Per-channel median over a `(2r+1)`x`(2r+1)` window, borders clamped.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `radius` - Window radius, capped at 10
///
/// # Returns
/// Filtered image with the same channel count; alpha is copied through
pub fn median_u8(input: ArrayView3<u8>, radius: u32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));
    if height == 0 || width == 0 {
        return output;
    }

    let radius = (radius as usize).min(MAX_RADIUS);
    let color_channels = if channels == 4 { 3 } else { channels };

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let rows: Vec<usize> = window(y, radius, height).collect();
            let mut samples: Vec<u8> = Vec::with_capacity(rows.len() * rows.len());

            for x in 0..width {
                for c in 0..color_channels {
                    samples.clear();
                    for &sy in &rows {
                        samples.extend(window(x, radius, width).map(|sx| input[[sy, sx, c]]));
                    }
                    let mid = samples.len() / 2;
                    row[[x, c]] = *samples.select_nth_unstable(mid).1;
                }
                if channels == 4 {
                    row[[x, 3]] = input[[y, x, 3]];
                }
            }
        });

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_removes_outlier() {
        let mut img = Array3::<u8>::from_elem((5, 5, 3), 20);
        img[[2, 2, 0]] = 255;
        let result = median_u8(img.view(), 1);
        assert_eq!(result[[2, 2, 0]], 20);
    }

    #[test]
    fn test_median_preserves_straight_edge() {
        let mut img = Array3::<u8>::zeros((5, 6, 3));
        for y in 0..5 {
            for x in 3..6 {
                img[[y, x, 1]] = 200;
            }
        }
        let result = median_u8(img.view(), 1);
        assert_eq!(result, img);
    }

    #[test]
    fn test_median_preserves_alpha() {
        let mut img = Array3::<u8>::zeros((3, 3, 4));
        img[[1, 1, 3]] = 128;
        let result = median_u8(img.view(), 1);
        assert_eq!(result[[1, 1, 3]], 128);
    }

    #[test]
    fn test_median_erases_thin_line_keeps_band() {
        let mut img = Array3::<u8>::zeros((9, 9, 1));
        // One-pixel line on row 2, three-pixel band on rows 5..8
        for x in 0..9 {
            img[[2, x, 0]] = 255;
            for y in 5..8 {
                img[[y, x, 0]] = 255;
            }
        }
        let result = median_u8(img.view(), 1);
        assert!((0..9).all(|x| result[[2, x, 0]] == 0));
        assert!((0..9).all(|x| result[[6, x, 0]] == 255));
    }

    #[test]
    fn test_median_empty_image() {
        let img = Array3::<u8>::zeros((0, 4, 3));
        assert_eq!(median_u8(img.view(), 1).dim(), (0, 4, 3));
    }
}

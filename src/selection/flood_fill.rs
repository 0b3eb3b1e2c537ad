//! Magic wand region growing.
//!
//! Selects the 4-connected region of pixels whose colour lies within a
//! tolerance of the seed colour. The traversal is an explicit breadth-first
//! worklist, so stack depth stays constant on any image size.
//!
//! Every pixel is evaluated at most once. A pixel that fails the similarity
//! test is never reconsidered, even if another path later reaches it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use super::color::{is_similar, Rgb};
use crate::error::{Error, Result};
use crate::image::PixelBuffer;
use crate::mask::Mask;

/// One unit of flood-fill work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub x: i64,
    pub y: i64,
    /// Reference colour every candidate pixel is compared against
    pub color: Rgb,
    pub tolerance: f64,
}

impl Seed {
    /// Seed at (x, y) using the image's own colour there.
    ///
    /// Returns `None` when the point lies outside the image.
    pub fn at(image: &PixelBuffer, x: i64, y: i64, tolerance: f64) -> Option<Seed> {
        let color = image.rgb_checked(x, y).ok()?;
        Some(Seed { x, y, color, tolerance })
    }
}

/// Region growing result with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowResult {
    /// Selection mask (255 = selected, 0 = not selected)
    pub mask: Mask,
    /// Bounds of selected region as (x, y, width, height)
    pub bounds: Option<(usize, usize, usize, usize)>,
    /// Number of selected pixels
    pub pixel_count: usize,
}

/// Grow a selection from (seed_x, seed_y).
///
/// # Arguments
/// * `image` - RGB or RGBA image; alpha is ignored
/// * `seed_x`, `seed_y` - Seed coordinate in image space
/// * `tolerance` - Maximum Euclidean RGB distance from the seed colour
///
/// # Returns
/// Selection mask. A seed outside the image yields an empty mask.
pub fn grow(image: &PixelBuffer, seed_x: i64, seed_y: i64, tolerance: f64) -> Mask {
    grow_detailed(image, seed_x, seed_y, tolerance).mask
}

/// Grow a selection and report bounds and pixel count.
pub fn grow_detailed(image: &PixelBuffer, seed_x: i64, seed_y: i64, tolerance: f64) -> GrowResult {
    match Seed::at(image, seed_x, seed_y, tolerance) {
        Some(seed) => fill(image, &seed, None).unwrap_or_else(|_| empty_result(image)),
        None => {
            warn!(
                "seed ({seed_x}, {seed_y}) outside {}x{} image, nothing selected",
                image.width(),
                image.height()
            );
            empty_result(image)
        }
    }
}

/// Grow from an explicit seed. The seed colour need not match the pixel
/// under the seed; the seed pixel itself is tested like any other.
pub fn grow_seed(image: &PixelBuffer, seed: &Seed) -> Mask {
    if !image.contains(seed.x, seed.y) {
        return Mask::empty(image.width(), image.height());
    }
    match fill(image, seed, None) {
        Ok(result) => result.mask,
        Err(_) => Mask::empty(image.width(), image.height()),
    }
}

/// Like [`grow`], but checks `cancel` once per dequeued pixel.
///
/// Returns `Error::Cancelled` as soon as the flag is observed set. When it
/// never is, the mask is identical to the one `grow` produces.
pub fn grow_with_cancel(
    image: &PixelBuffer,
    seed_x: i64,
    seed_y: i64,
    tolerance: f64,
    cancel: &AtomicBool,
) -> Result<Mask> {
    match Seed::at(image, seed_x, seed_y, tolerance) {
        Some(seed) => Ok(fill(image, &seed, Some(cancel))?.mask),
        None => Ok(Mask::empty(image.width(), image.height())),
    }
}

fn empty_result(image: &PixelBuffer) -> GrowResult {
    GrowResult {
        mask: Mask::empty(image.width(), image.height()),
        bounds: None,
        pixel_count: 0,
    }
}

/// Breadth-first fill. The seed must be inside the image.
fn fill(image: &PixelBuffer, seed: &Seed, cancel: Option<&AtomicBool>) -> Result<GrowResult> {
    let (width, height) = image.dimensions();
    let mut mask = Mask::empty(width, height);

    let start_x = seed.x as usize;
    let start_y = seed.y as usize;

    let mut pixel_count = 0;
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;

    let mut queue = VecDeque::new();
    let mut visited = vec![false; width * height];

    queue.push_back((start_x, start_y));
    visited[start_y * width + start_x] = true;

    while let Some((x, y)) = queue.pop_front() {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                debug!("flood fill cancelled after {pixel_count} pixels");
                return Err(Error::Cancelled);
            }
        }

        if !is_similar(image.rgb(x, y), seed.color, seed.tolerance) {
            continue;
        }

        mask.select(x, y);
        pixel_count += 1;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);

        // Enqueue unvisited N/E/S/W neighbours
        for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;

            if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                let nx = nx as usize;
                let ny = ny as usize;
                let nidx = ny * width + nx;
                if !visited[nidx] {
                    visited[nidx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    let bounds = if pixel_count > 0 {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    };

    debug!(
        "grow from ({}, {}) tol {}: {pixel_count} pixels selected",
        seed.x, seed.y, seed.tolerance
    );

    Ok(GrowResult {
        mask,
        bounds,
        pixel_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone(width: usize, height: usize, split_x: usize) -> PixelBuffer {
        let mut image = PixelBuffer::filled(width, height, [255, 0, 0]);
        for y in 0..height {
            for x in split_x..width {
                image.set_rgb(x, y, [0, 0, 255]);
            }
        }
        image
    }

    #[test]
    fn test_single_color_fill() {
        let image = PixelBuffer::filled(5, 5, [255, 0, 0]);
        let mask = grow(&image, 2, 2, 0.0);
        assert_eq!(mask.count_selected(), 25);
    }

    #[test]
    fn test_two_regions() {
        let image = two_tone(4, 4, 2);
        let result = grow_detailed(&image, 0, 0, 0.0);
        assert_eq!(result.pixel_count, 8);
        assert_eq!(result.bounds, Some((0, 0, 2, 4)));
        assert!(!result.mask.is_selected(2, 0));
    }

    #[test]
    fn test_tolerance() {
        // Red channel gradient 250, 245, ... 210 in a 3x3 grid
        let mut image = PixelBuffer::filled(3, 3, [0, 0, 0]);
        let values = [250u8, 245, 240, 235, 230, 225, 220, 215, 210];
        for (i, &v) in values.iter().enumerate() {
            image.set_rgb(i % 3, i / 3, [v, 0, 0]);
        }

        // Center is 230; tolerance 10 accepts 220..=240
        let mask = grow(&image, 1, 1, 10.0);
        assert_eq!(mask.count_selected(), 5);
        assert!(mask.is_selected(2, 0)); // 240
        assert!(!mask.is_selected(1, 0)); // 245
    }

    #[test]
    fn test_outside_seed_is_empty() {
        let image = PixelBuffer::filled(3, 3, [1, 1, 1]);
        assert!(grow(&image, -1, 0, 100.0).is_empty());
        assert!(grow(&image, 3, 0, 100.0).is_empty());
        assert!(grow(&image, 0, 7, 100.0).is_empty());
    }

    #[test]
    fn test_isolated_outlier() {
        let mut image = PixelBuffer::filled(5, 5, [0, 0, 0]);
        image.set_rgb(2, 2, [255, 255, 255]);
        let mask = grow(&image, 2, 2, 30.0);
        assert_eq!(mask.count_selected(), 1);
        assert!(mask.is_selected(2, 2));
    }

    #[test]
    fn test_diagonal_not_connected() {
        let mut image = PixelBuffer::filled(2, 2, [0, 0, 0]);
        image.set_rgb(1, 1, [0, 0, 0]);
        image.set_rgb(1, 0, [255, 255, 255]);
        image.set_rgb(0, 1, [255, 255, 255]);
        let mask = grow(&image, 0, 0, 5.0);
        assert_eq!(mask.count_selected(), 1);
    }

    #[test]
    fn test_alpha_ignored() {
        let mut image = PixelBuffer::filled_rgba(3, 1, [10, 10, 10, 255]);
        image.as_array_mut()[[0, 2, 3]] = 0;
        let mask = grow(&image, 0, 0, 0.0);
        assert_eq!(mask.count_selected(), 3);
    }

    #[test]
    fn test_seed_color_override() {
        let image = two_tone(4, 1, 2);
        // Seed sits on red but looks for blue: the seed pixel itself fails
        let seed = Seed {
            x: 0,
            y: 0,
            color: [0, 0, 255],
            tolerance: 0.0,
        };
        assert!(grow_seed(&image, &seed).is_empty());
    }

    #[test]
    fn test_cancel_flag() {
        let image = PixelBuffer::filled(8, 8, [3, 3, 3]);
        let cancel = AtomicBool::new(true);
        assert_eq!(
            grow_with_cancel(&image, 0, 0, 10.0, &cancel),
            Err(Error::Cancelled)
        );

        let go = AtomicBool::new(false);
        assert_eq!(
            grow_with_cancel(&image, 0, 0, 10.0, &go),
            Ok(grow(&image, 0, 0, 10.0))
        );
    }
}

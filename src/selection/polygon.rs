//! Polygon rasterization for manual selections.
//!
//! Interior pixels are found with an even-odd scanline fill sampled at pixel
//! centres: pixel (x, y) is inside when the point (x + 0.5, y + 0.5) lies
//! inside the polygon. The outline is then drawn with Bresenham lines, so
//! every pixel an edge passes through is selected as well. Boundary pixels
//! are therefore always included.
//!
//! For the right triangle (0,0), (4,0), (0,4) on a 5x5 grid this selects
//! exactly the 15 pixels with `x + y <= 4`.

use log::debug;

use crate::error::{Error, Result};
use crate::mask::Mask;

/// Rasterize a closed polygon into a `width`×`height` mask.
///
/// # Arguments
/// * `points` - Vertices in image space; the last connects back to the first
/// * `width`, `height` - Mask dimensions
///
/// # Returns
/// Filled mask, or `InsufficientPoints` for fewer than three vertices
pub fn rasterize(points: &[(i64, i64)], width: usize, height: usize) -> Result<Mask> {
    if points.len() < 3 {
        return Err(Error::InsufficientPoints { got: points.len() });
    }

    let mut mask = Mask::empty(width, height);
    if width == 0 || height == 0 {
        return Ok(mask);
    }

    // Callers clamp already; clamp again so indexing can never go out of range.
    let vertices: Vec<(i64, i64)> = points
        .iter()
        .map(|&(x, y)| (x.clamp(0, width as i64 - 1), y.clamp(0, height as i64 - 1)))
        .collect();

    fill_interior(&mut mask, &vertices);

    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        draw_line(&mut mask, vertices[i], vertices[j]);
    }

    debug!(
        "polygon with {} vertices: {} pixels selected",
        vertices.len(),
        mask.count_selected()
    );

    Ok(mask)
}

/// Even-odd scanline fill at pixel centres.
fn fill_interior(mask: &mut Mask, vertices: &[(i64, i64)]) {
    let width = mask.width() as i64;
    let min_y = vertices.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let max_y = vertices.iter().map(|&(_, y)| y).max().unwrap_or(-1);

    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());

    for y in min_y..=max_y {
        let scan_y = y as f64 + 0.5;
        crossings.clear();

        for i in 0..vertices.len() {
            let j = (i + 1) % vertices.len();
            let (x1, y1) = (vertices[i].0 as f64, vertices[i].1 as f64);
            let (x2, y2) = (vertices[j].0 as f64, vertices[j].1 as f64);

            // Half-open test; horizontal edges never cross a half-integer scanline
            if (y1 <= scan_y) != (y2 <= scan_y) {
                crossings.push(x1 + (scan_y - y1) * (x2 - x1) / (y2 - y1));
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            // Pixel centres x + 0.5 within [left, right]
            let start = ((span[0] - 0.5).ceil() as i64).max(0);
            let end = ((span[1] - 0.5).floor() as i64).min(width - 1);
            for x in start..=end {
                mask.select(x as usize, y as usize);
            }
        }
    }
}

/// Bresenham line between two in-bounds points, inclusive.
///
/// Always walks from the smaller endpoint so an edge rasterizes the same
/// way whichever direction the polygon is wound.
fn draw_line(mask: &mut Mask, from: (i64, i64), to: (i64, i64)) {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        mask.select(x0 as usize, y0 as usize);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

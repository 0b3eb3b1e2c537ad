//! Grayscale conversion.
//!
//! Uses ITU-R 601 luma weights in 16-bit fixed point, so results are exact
//! integers and identical on every platform.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

/// ITU-R 601 weights scaled by 2^16 (0.299, 0.587, 0.114)
const LUMA_R: u32 = 19595;
const LUMA_G: u32 = 38470;
const LUMA_B: u32 = 7471;

/// Luma of a single RGB triple.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B + 0x8000) >> 16) as u8
}

// ============================================================================
// RGB(A) -> single channel
// ============================================================================

/// Convert an RGB or RGBA image to a single-channel luma map.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
///
/// # Returns
/// (height, width) luma values; alpha is ignored
pub fn luma_u8(input: ArrayView3<u8>) -> Array2<u8> {
    let (height, width, _) = input.dim();
    let mut output = Array2::<u8>::zeros((height, width));

    Zip::from(&mut output)
        .and(input.lanes(Axis(2)))
        .par_for_each(|out, px| *out = luma(px[0], px[1], px[2]));

    output
}

// ============================================================================
// Single channel -> RGB
// ============================================================================

/// Expand a single-channel map to RGB with R=G=B.
pub fn gray_to_rgb(input: ArrayView2<u8>) -> Array3<u8> {
    let (height, width) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    Zip::from(output.lanes_mut(Axis(2)))
        .and(&input)
        .par_for_each(|mut px, &v| px.fill(v));

    output
}

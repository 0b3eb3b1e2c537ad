//! Contrast enhancement.
//!
//! Contrast is stretched around the image's mean luma rather than a fixed
//! mid-gray, so an overall dark or bright photo keeps its key while local
//! differences grow. A factor of 1.0 leaves the image unchanged, 2.0 doubles
//! every deviation from the mean.
//!
//! Alpha channel (if present) is always preserved unchanged.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

use super::grayscale::luma;

/// Rounded mean luma of an RGB(A) image.
pub fn mean_luma(input: ArrayView3<u8>) -> u8 {
    let (height, width, _) = input.dim();
    let count = (height * width) as u64;
    if count == 0 {
        return 0;
    }
    let sum: u64 = input
        .lanes(Axis(2))
        .into_iter()
        .map(|px| luma(px[0], px[1], px[2]) as u64)
        .sum();
    ((sum + count / 2) / count) as u8
}

#[inline]
fn stretch(value: u8, mean: f32, factor: f32) -> u8 {
    (mean + (value as f32 - mean) * factor).clamp(0.0, 255.0) as u8
}

// ============================================================================
// Contrast
// ============================================================================

/// Adjust image contrast around the mean luma.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `factor` - Contrast factor, 1.0 = no change
///
/// # Returns
/// Contrast-adjusted image with the same channel count
pub fn contrast_u8(input: ArrayView3<u8>, factor: f32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));
    let mean = mean_luma(input) as f32;

    let color_channels = if channels == 4 { 3 } else { channels };

    Zip::from(output.lanes_mut(Axis(2)))
        .and(input.lanes(Axis(2)))
        .par_for_each(|mut out, px| {
            for c in 0..color_channels {
                out[c] = stretch(px[c], mean, factor);
            }
            if channels == 4 {
                out[3] = px[3];
            }
        });

    output
}

/// Adjust contrast of a single-channel map around its own mean.
pub fn contrast_gray_u8(input: ArrayView2<u8>, factor: f32) -> Array2<u8> {
    let count = input.len() as u64;
    if count == 0 {
        return input.to_owned();
    }
    let sum: u64 = input.iter().map(|&v| v as u64).sum();
    let mean = ((sum + count / 2) / count) as f32;

    let mut output = input.to_owned();
    output.par_mapv_inplace(|v| stretch(v, mean, factor));
    output
}

//! Flatten a transparent result onto a solid background colour.

use ndarray::{Array3, Axis, Zip};

use crate::image::PixelBuffer;
use crate::selection::color::Rgb;

/// Blend one channel over the background with 8-bit alpha, rounding.
#[inline]
fn blend_over_u8(src: u8, background: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + background as u32 * (255 - a) + 127) / 255) as u8
}

/// Composite `image` over a solid `background`, producing an RGB image.
///
/// Opaque pixels keep their colour, fully transparent ones take the
/// background colour, partially transparent ones are blended. RGB input
/// has nothing to blend and is returned as a copy.
pub fn flatten_onto(image: &PixelBuffer, background: Rgb) -> PixelBuffer {
    if !image.has_alpha() {
        return image.clone();
    }

    let (height, width, _) = image.view().dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    Zip::from(output.lanes_mut(Axis(2)))
        .and(image.view().lanes(Axis(2)))
        .par_for_each(|mut out, px| {
            let alpha = px[3];
            for c in 0..3 {
                out[c] = blend_over_u8(px[c], background[c], alpha);
            }
        });

    PixelBuffer::from_array_unchecked(output)
}

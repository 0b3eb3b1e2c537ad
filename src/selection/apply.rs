//! Turn a mask into transparency.
//!
//! Unselected pixels get alpha 0 with their RGB preserved. Selected pixels
//! are left untouched, including any alpha they already had.

use log::{info, warn};
use ndarray::{Axis, Zip};

use crate::error::Result;
use crate::image::PixelBuffer;
use crate::mask::{Mask, UNSELECTED};

/// Result of applying a mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// RGBA image with unselected pixels made transparent
    pub image: PixelBuffer,
    /// Pixels this call turned transparent
    pub removed: usize,
    /// Selected pixels, left unchanged
    pub kept: usize,
    /// Unselected pixels that were already fully transparent
    pub already_transparent: usize,
}

impl Applied {
    /// True when nothing was removed. This usually means the selection
    /// covers the background instead of the object and should be inverted.
    pub fn nothing_removed(&self) -> bool {
        self.removed == 0
    }
}

/// Apply `mask` to `image`.
///
/// # Arguments
/// * `image` - RGB or RGBA image; an alpha channel is added if missing
/// * `mask` - Selection with the same dimensions; consumed
///
/// # Returns
/// The masked image with removed/kept counts, or `DimensionMismatch`
pub fn apply(image: PixelBuffer, mask: Mask) -> Result<Applied> {
    mask.check_dimensions(image.width(), image.height())?;

    let mut image = if image.has_alpha() { image } else { image.to_rgba() };

    let mut removed = 0usize;
    let mut kept = 0usize;
    let mut already_transparent = 0usize;

    Zip::from(image.as_array_mut().lanes_mut(Axis(2)))
        .and(mask.view())
        .for_each(|mut px, &m| {
            if m == UNSELECTED {
                if px[3] == 0 {
                    already_transparent += 1;
                } else {
                    px[3] = 0;
                    removed += 1;
                }
            } else {
                kept += 1;
            }
        });

    if removed == 0 {
        warn!("selection applied but no pixels were removed; the selection may need inverting");
    } else {
        info!("selection applied: {removed} pixels removed, {kept} kept");
    }

    Ok(Applied {
        image,
        removed,
        kept,
        already_transparent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_full_mask_keeps_everything() {
        let image = PixelBuffer::filled(2, 2, [10, 20, 30]);
        let applied = apply(image, Mask::full(2, 2)).unwrap();
        assert_eq!(applied.removed, 0);
        assert_eq!(applied.kept, 4);
        assert!(applied.nothing_removed());
        assert_eq!(applied.image.channels(), 4);
        assert!(applied.image.is_opaque());
    }

    #[test]
    fn test_unselected_become_transparent_rgb_kept() {
        let image = PixelBuffer::filled(3, 1, [10, 20, 30]);
        let mut mask = Mask::empty(3, 1);
        mask.select(1, 0);
        let applied = apply(image, mask).unwrap();
        assert_eq!(applied.removed, 2);
        assert_eq!(applied.kept, 1);
        assert_eq!(applied.image.alpha(0, 0), 0);
        assert_eq!(applied.image.alpha(1, 0), 255);
        assert_eq!(applied.image.rgb(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_selected_alpha_untouched() {
        let image = PixelBuffer::filled_rgba(1, 1, [1, 2, 3, 77]);
        let applied = apply(image, Mask::full(1, 1)).unwrap();
        assert_eq!(applied.image.alpha(0, 0), 77);
    }

    #[test]
    fn test_second_apply_removes_nothing() {
        let image = PixelBuffer::filled(4, 4, [50, 50, 50]);
        let mut mask = Mask::empty(4, 4);
        mask.select(0, 0);
        mask.select(3, 3);

        let first = apply(image, mask.clone()).unwrap();
        assert_eq!(first.removed, 14);

        let second = apply(first.image.clone(), mask).unwrap();
        assert_eq!(second.removed, 0);
        assert_eq!(second.already_transparent, 14);
        assert_eq!(second.image, first.image);
    }

    #[test]
    fn test_dimension_mismatch() {
        let image = PixelBuffer::filled(2, 2, [0, 0, 0]);
        assert_eq!(
            apply(image, Mask::full(3, 2)),
            Err(Error::DimensionMismatch {
                expected: (2, 2),
                actual: (3, 2)
            })
        );
    }
}

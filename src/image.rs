//! RGB(A) pixel buffer.
//!
//! Pixels are stored in a single contiguous row-major `Array3<u8>` with shape
//! (height, width, channels), the same layout the filters operate on.

use ndarray::{s, Array3, ArrayView3, Axis, Zip};

use crate::error::{Error, Result};
use crate::selection::color::Rgb;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Wrap an existing (height, width, channels) array. Channels must be 3 or 4.
    pub fn from_array(data: Array3<u8>) -> Result<Self> {
        let channels = data.dim().2;
        if channels != 3 && channels != 4 {
            return Err(Error::InvalidChannels(channels));
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self { data })
    }

    /// Build from raw interleaved bytes.
    pub fn from_raw(width: usize, height: usize, channels: usize, bytes: Vec<u8>) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(Error::InvalidChannels(channels));
        }
        let data = Array3::from_shape_vec((height, width, channels), bytes)
            .map_err(|e| Error::InvalidShape(e.to_string()))?;
        Ok(Self { data })
    }

    /// Internal constructor for arrays the crate itself produced with 3 or 4 channels.
    pub(crate) fn from_array_unchecked(data: Array3<u8>) -> Self {
        debug_assert!(matches!(data.dim().2, 3 | 4));
        Self { data }
    }

    /// Solid RGB image.
    pub fn filled(width: usize, height: usize, rgb: Rgb) -> Self {
        let mut data = Array3::<u8>::zeros((height, width, 3));
        for c in 0..3 {
            data.slice_mut(s![.., .., c]).fill(rgb[c]);
        }
        Self { data }
    }

    /// Solid RGBA image.
    pub fn filled_rgba(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut data = Array3::<u8>::zeros((height, width, 4));
        for c in 0..4 {
            data.slice_mut(s![.., .., c]).fill(rgba[c]);
        }
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn has_alpha(&self) -> bool {
        self.channels() == 4
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width() as u64 && (y as u64) < self.height() as u64
    }

    /// RGB triple at (x, y), alpha stripped. Panics when out of bounds.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> Rgb {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    pub fn rgb_checked(&self, x: i64, y: i64) -> Result<Rgb> {
        if self.contains(x, y) {
            Ok(self.rgb(x as usize, y as usize))
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    /// Alpha at (x, y); opaque for RGB images.
    #[inline]
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        if self.has_alpha() {
            self.data[[y, x, 3]]
        } else {
            255
        }
    }

    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: Rgb) {
        for (c, v) in rgb.into_iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    pub(crate) fn as_array_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Interleaved bytes in row-major order.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    /// Copy with an alpha channel, opaque where one did not exist.
    pub fn to_rgba(&self) -> PixelBuffer {
        if self.has_alpha() {
            return self.clone();
        }
        let (height, width, _) = self.data.dim();
        let mut out = Array3::<u8>::from_elem((height, width, 4), 255);
        out.slice_mut(s![.., .., 0..3]).assign(&self.data);
        Self { data: out }
    }

    /// Copy with the alpha channel dropped.
    pub fn to_rgb(&self) -> PixelBuffer {
        if !self.has_alpha() {
            return self.clone();
        }
        Self {
            data: self.data.slice(s![.., .., 0..3]).to_owned(),
        }
    }

    /// Number of fully transparent pixels.
    pub fn transparent_count(&self) -> usize {
        if !self.has_alpha() {
            return 0;
        }
        self.data
            .index_axis(Axis(2), 3)
            .iter()
            .filter(|&&a| a == 0)
            .count()
    }

    /// True when every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        if !self.has_alpha() {
            return true;
        }
        let mut opaque = true;
        Zip::from(self.data.index_axis(Axis(2), 3)).for_each(|&a| opaque &= a == 255);
        opaque
    }

    pub(crate) fn out_of_bounds(&self, x: i64, y: i64) -> Error {
        Error::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }
}

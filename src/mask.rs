//! Binary selection masks and the algebra over them.
//!
//! A mask has one byte per pixel restricted to {0, 255}. Every mask is paired
//! with the image it was computed against, so combining masks of different
//! dimensions is rejected.

use ndarray::{Array2, ArrayView2, Zip};

use crate::error::{Error, Result};

pub const SELECTED: u8 = 255;
pub const UNSELECTED: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    data: Array2<u8>,
}

impl Mask {
    /// All-unselected mask.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    /// All-selected mask.
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            data: Array2::from_elem((height, width), SELECTED),
        }
    }

    /// Wrap a (height, width) array. Any non-zero value counts as selected.
    pub fn from_array(data: Array2<u8>) -> Self {
        let mut data = data.as_standard_layout().into_owned();
        data.par_mapv_inplace(|v| if v == UNSELECTED { UNSELECTED } else { SELECTED });
        Self { data }
    }

    pub fn from_raw(width: usize, height: usize, bytes: Vec<u8>) -> Result<Self> {
        let data = Array2::from_shape_vec((height, width), bytes)
            .map_err(|e| Error::InvalidShape(e.to_string()))?;
        Ok(Self::from_array(data))
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[[y, x]]
    }

    pub fn get_checked(&self, x: i64, y: i64) -> Result<u8> {
        if x < 0 || y < 0 || x as u64 >= self.width() as u64 || y as u64 >= self.height() as u64 {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(self.get(x as usize, y as usize))
    }

    #[inline]
    pub fn is_selected(&self, x: usize, y: usize) -> bool {
        self.data[[y, x]] == SELECTED
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, selected: bool) {
        self.data[[y, x]] = if selected { SELECTED } else { UNSELECTED };
    }

    #[inline]
    pub fn select(&mut self, x: usize, y: usize) {
        self.data[[y, x]] = SELECTED;
    }

    pub fn view(&self) -> ArrayView2<'_, u8> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }

    pub fn into_array(self) -> Array2<u8> {
        self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }

    pub(crate) fn check_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if self.dimensions() != (width, height) {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: self.dimensions(),
            });
        }
        Ok(())
    }

    /// Cellwise maximum: a pixel is selected if either mask selects it.
    pub fn union(&self, other: &Mask) -> Result<Mask> {
        other.check_dimensions(self.width(), self.height())?;
        let mut data = self.data.clone();
        Zip::from(&mut data)
            .and(&other.data)
            .par_for_each(|a, &b| *a = (*a).max(b));
        Ok(Mask { data })
    }

    /// Flip every cell: `255 - value`.
    pub fn invert(&self) -> Mask {
        let mut data = self.data.clone();
        data.par_mapv_inplace(|v| SELECTED - v);
        Mask { data }
    }

    /// Number of selected cells.
    pub fn count_selected(&self) -> usize {
        self.data.iter().filter(|&&v| v == SELECTED).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&v| v == SELECTED)
    }

    /// Bounding box of the selection as (x, y, width, height).
    pub fn bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0, 0);
        let mut any = false;

        for ((y, x), &v) in self.data.indexed_iter() {
            if v == SELECTED {
                any = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }

    /// Median (majority) filter over a `size`×`size` window with clamped
    /// borders. Removes isolated speckles and fills pinholes.
    pub fn median_smoothed(&self, size: usize) -> Mask {
        let radius = (size.max(1) / 2) as isize;
        let (height, width) = self.data.dim();
        if radius == 0 || width == 0 || height == 0 {
            return self.clone();
        }
        let window = ((radius * 2 + 1) * (radius * 2 + 1)) as usize;
        let src = &self.data;

        let mut data = Array2::<u8>::zeros((height, width));
        Zip::indexed(&mut data).par_for_each(|(y, x), out| {
            let mut selected = 0usize;
            for dy in -radius..=radius {
                let sy = (y as isize + dy).clamp(0, height as isize - 1) as usize;
                for dx in -radius..=radius {
                    let sx = (x as isize + dx).clamp(0, width as isize - 1) as usize;
                    if src[[sy, sx]] == SELECTED {
                        selected += 1;
                    }
                }
            }
            *out = if selected * 2 > window { SELECTED } else { UNSELECTED };
        });

        Mask { data }
    }
}

/// Union of any number of masks, starting from an empty `width`×`height` mask.
pub fn union_all<I>(width: usize, height: usize, masks: I) -> Result<Mask>
where
    I: IntoIterator<Item = Mask>,
{
    masks
        .into_iter()
        .try_fold(Mask::empty(width, height), |acc, m| acc.union(&m))
}

//! maskcut: selection engine for background removal
//!
//! Turns sparse user input (clicks, point sequences) into binary keep/discard
//! masks over a full image, combines masks, and applies them as an alpha
//! channel. Python bindings via PyO3 and WASM bindings for JavaScript are
//! available behind the `python` and `wasm` features.
//!
//! ## Image Format
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4); alpha is ignored by every colour comparison
//!
//! Masks are (height, width) `u8` grids with 0 = unselected, 255 = selected.
//!
//! ## Pipeline
//! 1. Produce a mask: [`selection::grow`] (magic wand),
//!    [`selection::detect_main_object`], [`selection::edge_selection`] or
//!    [`selection::rasterize`] (manual polygon).
//! 2. Optionally combine it with the previous mask ([`Mask::union`]) or
//!    invert it ([`Mask::invert`]).
//! 3. [`selection::apply`] makes unselected pixels transparent.
//! 4. [`composite::flatten_onto`] replaces transparency with a solid colour.
//!
//! [`SelectionState`] and [`Session`] carry the interactive state explicitly
//! between these steps.

pub mod composite;
pub mod config;
pub mod error;
pub mod filters;
pub mod image;
pub mod mask;
pub mod selection;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{DetectionSource, SelectionConfig, Tolerance};
pub use error::{Error, Result};
pub use image::PixelBuffer;
pub use mask::Mask;
pub use selection::{SelectionMode, SelectionState};
pub use session::{ApplyReport, Session};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::prelude::*;

    use crate::composite::flatten_onto;
    use crate::config::SelectionConfig;
    use crate::image::PixelBuffer;
    use crate::mask::Mask;
    use crate::selection::{apply, edge_region, flood_fill, object_detect, polygon};

    fn load(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        Ok(PixelBuffer::from_array(image.as_array().to_owned())?)
    }

    fn load_mask(mask: PyReadonlyArray2<'_, u8>) -> Mask {
        Mask::from_array(mask.as_array().to_owned())
    }

    // ========================================================================
    // Mask producers
    // ========================================================================

    /// Magic wand selection from (x, y).
    ///
    /// Returns a (height, width) mask; a click outside the image selects nothing.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance=30.0))]
    pub fn magic_wand<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: i64,
        y: i64,
        tolerance: f64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let image = load(image)?;
        let mask = flood_fill::grow(&image, x, y, tolerance);
        Ok(mask.into_array().into_pyarray(py))
    }

    /// Auto-detect the main object around the image centre.
    #[pyfunction]
    #[pyo3(signature = (image, tolerance=40.0))]
    pub fn detect_object<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        tolerance: f64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let image = load(image)?;
        let config = SelectionConfig {
            object_tolerance: tolerance,
            ..Default::default()
        };
        let detection = object_detect::detect_main_object_with(&image, &config)?;
        Ok(detection.mask.into_array().into_pyarray(py))
    }

    /// Edge-guided selection.
    #[pyfunction]
    #[pyo3(signature = (image, threshold=50))]
    pub fn edge_select<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        threshold: u8,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let image = load(image)?;
        let config = SelectionConfig {
            edge_threshold: threshold,
            ..Default::default()
        };
        let mask = edge_region::edge_selection_with(&image, &config)?;
        Ok(mask.into_array().into_pyarray(py))
    }

    /// Rasterize a closed polygon of image-space points.
    #[pyfunction]
    pub fn polygon_select<'py>(
        py: Python<'py>,
        points: Vec<(i64, i64)>,
        width: usize,
        height: usize,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let mask = polygon::rasterize(&points, width, height)?;
        Ok(mask.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Mask algebra
    // ========================================================================

    #[pyfunction]
    pub fn union_masks<'py>(
        py: Python<'py>,
        a: PyReadonlyArray2<'py, u8>,
        b: PyReadonlyArray2<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let union = load_mask(a).union(&load_mask(b))?;
        Ok(union.into_array().into_pyarray(py))
    }

    #[pyfunction]
    pub fn invert_mask<'py>(
        py: Python<'py>,
        mask: PyReadonlyArray2<'py, u8>,
    ) -> Bound<'py, PyArray2<u8>> {
        load_mask(mask).invert().into_array().into_pyarray(py)
    }

    #[pyfunction]
    pub fn count_selected(mask: PyReadonlyArray2<'_, u8>) -> usize {
        load_mask(mask).count_selected()
    }

    // ========================================================================
    // Apply & composite
    // ========================================================================

    /// Make unselected pixels transparent.
    ///
    /// Returns (rgba_image, removed, kept).
    #[pyfunction]
    pub fn apply_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        mask: PyReadonlyArray2<'py, u8>,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, usize, usize)> {
        let applied = apply::apply(load(image)?, load_mask(mask))?;
        Ok((
            applied.image.into_array().into_pyarray(py),
            applied.removed,
            applied.kept,
        ))
    }

    /// Flatten an RGBA image onto a solid (r, g, b) colour.
    #[pyfunction]
    pub fn flatten_background<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        color: (u8, u8, u8),
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = load(image)?;
        let flat = flatten_onto(&image, [color.0, color.1, color.2]);
        Ok(flat.into_array().into_pyarray(py))
    }

    /// maskcut Python extension module
    #[pymodule]
    pub fn maskcut(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Mask producers
        m.add_function(wrap_pyfunction!(magic_wand, m)?)?;
        m.add_function(wrap_pyfunction!(detect_object, m)?)?;
        m.add_function(wrap_pyfunction!(edge_select, m)?)?;
        m.add_function(wrap_pyfunction!(polygon_select, m)?)?;

        // Mask algebra
        m.add_function(wrap_pyfunction!(union_masks, m)?)?;
        m.add_function(wrap_pyfunction!(invert_mask, m)?)?;
        m.add_function(wrap_pyfunction!(count_selected, m)?)?;

        // Apply & composite
        m.add_function(wrap_pyfunction!(apply_mask, m)?)?;
        m.add_function(wrap_pyfunction!(flatten_background, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::maskcut;

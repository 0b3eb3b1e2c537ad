//! WebAssembly exports for the selection engine.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! Images are passed as flat interleaved bytes (RGB or RGBA, row-major) with
//! explicit width, height and channel count. Masks are flat `width * height`
//! byte arrays with 0 = unselected and 255 = selected.

use wasm_bindgen::prelude::*;

use crate::composite::flatten_onto;
use crate::error::Error;
use crate::image::PixelBuffer;
use crate::mask::Mask;
use crate::selection::{apply, detect_main_object, edge_selection, grow, rasterize};

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn load(data: &[u8], width: usize, height: usize, channels: usize) -> Result<PixelBuffer, JsValue> {
    PixelBuffer::from_raw(width, height, channels, data.to_vec()).map_err(to_js)
}

fn load_mask(mask: &[u8], width: usize, height: usize) -> Result<Mask, JsValue> {
    Mask::from_raw(width, height, mask.to_vec()).map_err(to_js)
}

// ============================================================================
// Mask producers
// ============================================================================

/// Magic wand selection from (x, y).
///
/// # Returns
/// Mask bytes; a click outside the image gives an empty mask
#[wasm_bindgen]
pub fn magic_wand_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    x: i32,
    y: i32,
    tolerance: f64,
) -> Result<Vec<u8>, JsValue> {
    let image = load(data, width, height, channels)?;
    Ok(grow(&image, x as i64, y as i64, tolerance).into_raw())
}

/// Auto-detect the main object.
#[wasm_bindgen]
pub fn detect_object_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsValue> {
    let image = load(data, width, height, channels)?;
    Ok(detect_main_object(&image).into_raw())
}

/// Edge-guided selection.
#[wasm_bindgen]
pub fn edge_select_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u8>, JsValue> {
    let image = load(data, width, height, channels)?;
    Ok(edge_selection(&image).into_raw())
}

/// Polygon selection from flat `[x0, y0, x1, y1, ...]` image coordinates.
#[wasm_bindgen]
pub fn polygon_select_wasm(points: &[i32], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let vertices: Vec<(i64, i64)> = points
        .chunks_exact(2)
        .map(|p| (p[0] as i64, p[1] as i64))
        .collect();
    let mask = rasterize(&vertices, width, height).map_err(to_js)?;
    Ok(mask.into_raw())
}

// ============================================================================
// Mask algebra
// ============================================================================

#[wasm_bindgen]
pub fn union_masks_wasm(a: &[u8], b: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let a = load_mask(a, width, height)?;
    let b = load_mask(b, width, height)?;
    Ok(a.union(&b).map_err(to_js)?.into_raw())
}

#[wasm_bindgen]
pub fn invert_mask_wasm(mask: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    Ok(load_mask(mask, width, height)?.invert().into_raw())
}

// ============================================================================
// Apply & composite
// ============================================================================

/// Masked RGBA image plus pixel counts.
#[wasm_bindgen]
pub struct ApplyResult {
    data: Vec<u8>,
    removed: usize,
    kept: usize,
}

#[wasm_bindgen]
impl ApplyResult {
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn removed(&self) -> usize {
        self.removed
    }

    #[wasm_bindgen(getter)]
    pub fn kept(&self) -> usize {
        self.kept
    }
}

#[wasm_bindgen]
pub fn apply_mask_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    mask: &[u8],
) -> Result<ApplyResult, JsValue> {
    let image = load(data, width, height, channels)?;
    let mask = load_mask(mask, width, height)?;
    let applied = apply(image, mask).map_err(to_js)?;
    Ok(ApplyResult {
        removed: applied.removed,
        kept: applied.kept,
        data: applied.image.into_raw(),
    })
}

/// Flatten an RGBA image onto a solid colour, returning RGB bytes.
#[wasm_bindgen]
pub fn flatten_background_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    r: u8,
    g: u8,
    b: u8,
) -> Result<Vec<u8>, JsValue> {
    let image = load(data, width, height, 4)?;
    Ok(flatten_onto(&image, [r, g, b]).into_raw())
}

//! Image filters used by the selection pipelines.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Gray8 | (H, W) | u8 | Single channel, used for edge maps |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! Channel count is inferred from input array dimensions. Alpha, when
//! present, is passed through untouched.
//!
//! Every filter is deterministic. Rows (or pixels) are processed in parallel
//! with rayon, but each output value depends only on the input, so results
//! match a sequential pass exactly.

pub mod color_adjust;
pub mod edge;
pub mod grayscale;
pub mod noise;

//! Selection algorithms for background removal.
//!
//! This module turns sparse user input into binary masks:
//! - **Magic wand**: flood fill from a clicked pixel under a colour tolerance
//! - **Object detection**: multi-seed flood fill around the frame centre
//! - **Edge selection**: dilation of strong edges from an edge map
//! - **Polygon**: scanline fill of manually placed points
//!
//! Masks are combined with [`crate::mask::Mask::union`] and turned into
//! transparency by [`apply::apply`].

pub mod apply;
pub mod color;
pub mod edge_region;
pub mod flood_fill;
pub mod object_detect;
pub mod polygon;
pub mod state;

pub use apply::{apply, Applied};
pub use edge_region::{build_from_edges, edge_selection};
pub use flood_fill::{grow, grow_seed, Seed};
pub use object_detect::detect_main_object;
pub use polygon::rasterize;
pub use state::{SelectionMode, SelectionState};

//! Reassembles an image from square tiles given in unknown orientations, then looks
//! for a fixed pattern in the result.
//!
//! Data flows one way: tiles -> adjacency graph -> corners -> top-left anchor ->
//! assembled image -> pattern scan.

pub mod adjacency;
pub mod anchor;
pub mod assembler;
pub mod error;
pub mod helpers;
pub mod scanner;
pub mod tile;

pub use adjacency::{build_adjacency, corner_product, find_corners, AdjacencyGraph};
pub use assembler::{assemble, assemble_image, Assembly};
pub use error::{JigsawError, Result};
pub use helpers::orientation::Orientation;
pub use scanner::{count_unmatched_set_pixels, find_pattern, mark_pattern, Pattern};
pub use tile::{build_tiles, parse_tiles, Pixel, Pixels, Side, Tile, TileId};

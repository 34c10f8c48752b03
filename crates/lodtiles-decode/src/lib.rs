//! Decode dataset descriptors, tile names and TIFF tiles for LOD terrain grids.
//!
//! This crate provides pure synchronous decoding functions for the on-disk
//! pieces of a tiled terrain dataset. It does not walk directories, keep
//! state, or talk to a GPU; the `lodtiles` crate builds on it for that.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Stateless**: Every function maps input bytes or names to values
//! - **Fail loudly**: Missing required data is an error, never a default

mod descriptor;
mod error;
mod texture;
mod tile_name;

pub use descriptor::{
    DatasetDescription, DatasetDescriptor, MaxElevationTable, parse_dataset_descriptor,
};
pub use error::{DecodeError, DecodeResult};
pub use texture::{
    DecodedTexture, TextureKind, TexturePixels, decode_tiff, is_tiff_path, read_tiff,
};
pub use tile_name::{TILE_EXTENSION, parse_tile_name, tile_file_name};

/// Column and row of a tile within its LOD level grid.
///
/// Row 0 is the top row of the source imagery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Grid column.
    pub column: u32,
    /// Grid row.
    pub row: u32,
}

impl TileCoord {
    /// Create a tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

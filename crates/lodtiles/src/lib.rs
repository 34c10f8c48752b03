//! Level-of-detail terrain grid built from tiled elevation and satellite data.
//!
//! This crate loads a two-level quadtree of terrain tiles from a dataset
//! directory, exposes its leaves for rendering, and tracks the ground height
//! under a camera.
//!
//! # Design principles
//!
//! - **Synchronous**: Loading blocks; per-frame queries never fail
//! - **Owned textures**: A [`TextureStore`] owns every uploaded texture
//! - **All or nothing**: A failed load leaves no partial grid behind
//!
//! # Example
//!
//! ```ignore
//! use lodtiles::{GroundTracker, SimulationState, TerrainGrid, TerrainScales};
//!
//! let mut grid = TerrainGrid::new();
//! grid.load_tiles(Path::new("data/gen/more_details"))?;
//!
//! let mut tracker = GroundTracker::new();
//! let mut state = SimulationState::default();
//! tracker.update(&grid, &TerrainScales::default(), camera_position, &mut state);
//! ```

mod error;
mod grid;
mod ground;
pub mod loader;
pub mod quadtree;
pub mod store;
#[cfg(test)]
mod test_support;
pub mod types;

pub use error::{DatasetError, Error, Result, StructuralError};
pub use grid::{TerrainGrid, level_dir};
pub use ground::{GroundTracker, GroundUpdate, SimulationState};
pub use loader::{load_description, load_level_tiles};
pub use quadtree::{LeafView, NodeId, QuadNode, TerrainQuadtree};
pub use store::{MemoryTextureStore, NoTextureStore, TextureStore};
pub use types::{
    MAX_LEVEL, TerrainScales, TerrainTile, TextureHandle, TileDrawParams, TileKey, grid_size,
    is_above, level_quad_size, level_scale, to_world_position,
};

// Re-export decode types for convenience.
pub use lodtiles_decode::{DatasetDescription, DatasetDescriptor, TileCoord};

//! Terrain tile types and grid geometry.
//!
//! These types describe loaded terrain tiles and the pure functions that map
//! grid cells to world space. World X points right and world Y points up;
//! tile rows count downwards from the top of the source imagery, so rows are
//! negated when mapped to world Y.

use glam::{Mat4, Vec2, Vec3};
use lodtiles_decode::TileCoord;

/// Name of the dataset descriptor file inside each level directory.
pub const DESCRIPTOR_FILE_NAME: &str = "dataset.json";

/// Level value of a tile that has not yet been placed into a quadtree.
pub const UNPLACED_LEVEL: u32 = 0;

/// Opaque handle to a texture owned by a [`TextureStore`](crate::TextureStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Wrap a raw store-specific texture id.
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// The raw store-specific texture id.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Identity of a tile within the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    /// LOD level the tile was placed at.
    pub level: u32,
    /// Grid cell within that level.
    pub coord: TileCoord,
}

/// Renderable data of one quadtree leaf.
///
/// All tiles of one level share texture dimensions and pixel scale, so those
/// live in the level's dataset description rather than here.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainTile {
    /// Elevation texture.
    pub elevation_map: TextureHandle,
    /// Satellite imagery texture.
    pub satellite_map: TextureHandle,
    /// World position of the tile's origin corner (before model scaling).
    pub position: Vec2,
    /// Reference elevation used as the camera ground anchor over this tile.
    ///
    /// Read from the per-file maximum elevation of the dataset descriptor.
    pub elevation_min: f32,
    /// Grid column within the level.
    pub grid_c: u32,
    /// Grid row within the level.
    pub grid_r: u32,
    /// Quadtree depth (1 is the coarsest loaded level), or
    /// [`UNPLACED_LEVEL`] until the tile is placed.
    pub level: u32,
}

impl TerrainTile {
    /// Grid cell of the tile.
    #[must_use]
    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.grid_c, self.grid_r)
    }

    /// Grid-wide identity of the tile.
    #[must_use]
    pub fn key(&self) -> TileKey {
        TileKey {
            level: self.level,
            coord: self.coord(),
        }
    }

    /// Both textures owned by the tile.
    #[must_use]
    pub fn textures(&self) -> [TextureHandle; 2] {
        [self.elevation_map, self.satellite_map]
    }
}

/// Scale factors applied when placing terrain in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainScales {
    /// Horizontal scale from grid units to scene units.
    pub model_scale: f32,
    /// Vertical exaggeration applied on top of the elevation scale.
    pub height_scale: f32,
}

impl Default for TerrainScales {
    fn default() -> Self {
        Self {
            model_scale: 2.0,
            height_scale: 10.0,
        }
    }
}

/// Everything a renderer needs to draw one leaf tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDrawParams {
    /// Which tile this is.
    pub key: TileKey,
    /// Elevation texture to sample heights from.
    pub elevation_texture: TextureHandle,
    /// Satellite texture to colour the surface with.
    pub satellite_texture: TextureHandle,
    /// Local (unit quad mesh) to world transform, `T * S`.
    pub world_transform: Mat4,
    /// Raw elevation sample to scene height factor.
    pub elevation_scale: f32,
    /// Vertical exaggeration.
    pub height_scale: f32,
    /// Elevation texture edge length in pixels.
    pub elevation_tile_size: u32,
    /// Tile edge length in source world units (`tile_size * pixel_size`).
    pub terrain_size: f32,
    /// Edge length of the usable normal area (2 px border on each side).
    pub normal_tile_size: u32,
}

impl TileDrawParams {
    /// Combine the tile's world transform with a camera view-projection.
    #[must_use]
    pub fn local_to_screen(&self, view_projection: Mat4) -> Mat4 {
        view_projection * self.world_transform
    }
}

/// Deepest level whose grid size fits in a `u32`.
pub const MAX_LEVEL: u32 = 31;

/// Number of tiles along one side of a level grid (`2^level`).
///
/// # Panics
///
/// Panics if `level` is greater than [`MAX_LEVEL`]. The same holds for
/// [`level_quad_size`], [`level_scale`] and [`to_world_position`].
#[must_use]
pub fn grid_size(level: u32) -> u32 {
    match 1u32.checked_shl(level) {
        Some(size) => size,
        None => panic!("level {level} exceeds the deepest level {MAX_LEVEL}"),
    }
}

/// World edge length of one tile at `level`.
///
/// Chosen so level 1 tiles have edge `quad_size`; level 0 is never rendered.
#[must_use]
pub fn level_quad_size(quad_size: f32, level: u32) -> f32 {
    (2.0 * quad_size) / grid_size(level) as f32
}

/// Mesh scale factor of a level relative to the model scale.
#[must_use]
pub fn level_scale(level: u32) -> f32 {
    1.0 / ((grid_size(level) as f32 / 2.0) / 2.0)
}

/// World position of the origin corner of grid cell (`column`, `row`).
///
/// The grid is centred horizontally on the origin and its top row starts at
/// `level_quad_size` above the X axis.
#[must_use]
pub fn to_world_position(column: u32, row: u32, level: u32, quad_size: f32) -> Vec2 {
    let grid = grid_size(level) as f32;
    let tile_size = level_quad_size(quad_size, level);
    Vec2::new(column as f32, -(row as f32)) * tile_size
        - Vec2::new(grid, -(grid - 2.0)) * tile_size * 0.5
}

/// Raw elevation sample to scene height factor for one level.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn elevation_scale(model_scale: f32, level: u32, pixel_size: f64, tile_size: u32) -> f32 {
    let scale = f64::from(model_scale * level_scale(level));
    (scale / (pixel_size * f64::from(tile_size))) as f32
}

/// Check whether `position` lies horizontally within a tile's bounding box.
///
/// The box is `[tile.position, tile.position + quad_size] * model_scale` and
/// includes its edges. The Z component of `position` is ignored.
#[must_use]
pub fn is_above(tile: &TerrainTile, quad_size: f32, model_scale: f32, position: Vec3) -> bool {
    let min_corner = tile.position * model_scale;
    let max_corner = (tile.position + quad_size) * model_scale;
    let point = position.truncate();

    point.cmpge(min_corner).all() && point.cmple(max_corner).all()
}

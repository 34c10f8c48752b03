//! The terrain grid: a two-level tile quadtree plus per-level datasets.
//!
//! The grid has a fixed sample topology. The root is split into the four
//! level-1 tiles of `<data>/level1`, and the top-left level-1 quadrant is
//! refined into the four level-2 tiles at cells (0,0), (1,0), (0,1), (1,1)
//! of `<data>/level2`. That makes seven leaves in total.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec2, Vec3};
use lodtiles_decode::{DatasetDescription, TileCoord};

use crate::error::{Result, StructuralError};
use crate::loader::{load_description, load_level_tiles, release_tiles};
use crate::quadtree::{LeafView, NodeId, TerrainQuadtree, arrange_quadrant};
use crate::store::{MemoryTextureStore, TextureStore};
use crate::types::{
    TerrainScales, TerrainTile, TextureHandle, TileDrawParams, TileKey, elevation_scale,
    level_scale,
};

/// Tiles required in the coarsest level.
const ROOT_TILE_COUNT: usize = 4;

/// Level-1 quadrant that gets refined with level-2 tiles.
const REFINED_QUADRANT: usize = 0;

/// Top-left cell of the refined level-2 block.
const REFINED_ORIGIN: TileCoord = TileCoord::new(0, 0);

/// Border in pixels around the usable normal area of an elevation tile.
const NORMAL_BORDER: u32 = 2;

/// Directory holding the tiles of `level`.
#[must_use]
pub fn level_dir(data_path: &Path, level: u32) -> PathBuf {
    data_path.join(format!("level{level}"))
}

/// Quadtree of terrain tiles loaded from a dataset directory.
///
/// The grid owns its [`TextureStore`] and every texture of its leaves; they
/// are released when the grid is cleared, reloaded or dropped.
///
/// # Example
///
/// ```ignore
/// let mut grid = TerrainGrid::new();
/// grid.load_tiles(Path::new("data/gen/more_details"))?;
/// for tile in grid.iterate() {
///     let params = grid.draw_params(tile, &TerrainScales::default());
/// }
/// ```
pub struct TerrainGrid<S: TextureStore = MemoryTextureStore> {
    store: S,
    tree: TerrainQuadtree,
    levels: BTreeMap<u32, DatasetDescription>,
    quad_size: f32,
}

impl TerrainGrid<MemoryTextureStore> {
    /// Create an empty grid that keeps textures in memory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryTextureStore::new())
    }
}

impl Default for TerrainGrid<MemoryTextureStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TextureStore> TerrainGrid<S> {
    /// Create an empty grid with a custom texture store.
    #[must_use]
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            tree: TerrainQuadtree::default(),
            levels: BTreeMap::new(),
            quad_size: 1.0,
        }
    }

    /// Set the world edge length of a level-1 tile.
    #[must_use]
    pub fn with_quad_size(mut self, quad_size: f32) -> Self {
        self.quad_size = quad_size;
        self
    }

    /// World edge length of a level-1 tile.
    #[must_use]
    pub fn quad_size(&self) -> f32 {
        self.quad_size
    }

    /// The texture store holding leaf textures.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The underlying quadtree.
    #[must_use]
    pub fn tree(&self) -> &TerrainQuadtree {
        &self.tree
    }

    /// Load both levels from `data_path`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Fails on unreadable directories, malformed descriptors, undecodable
    /// or misshapen textures, and tile sets that do not fit the two-level
    /// topology. On failure the grid is left empty and every texture uploaded
    /// during the load has been released.
    pub fn load_tiles(&mut self, data_path: &Path) -> Result<()> {
        self.clear();

        let mut uploaded = Vec::new();
        match self.assemble(data_path, &mut uploaded) {
            Ok((tree, levels)) => {
                self.tree = tree;
                self.levels = levels;
                tracing::info!(
                    data_path = %data_path.display(),
                    leaves = self.len(),
                    "loaded terrain grid"
                );
                Ok(())
            }
            Err(e) => {
                for handle in uploaded {
                    self.store.release(handle);
                }
                Err(e)
            }
        }
    }

    /// Release every leaf texture and forget all levels.
    pub fn clear(&mut self) {
        let tree = std::mem::take(&mut self.tree);
        release_tiles(&mut self.store, tree.leaves());
        self.levels.clear();
    }

    /// Number of leaf tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.leaves().count()
    }

    /// Check if no tiles are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Iterate over every leaf tile in some depth-first order.
    #[must_use]
    pub fn iterate(&self) -> LeafView<'_> {
        self.tree.leaves()
    }

    /// Dataset description of a loaded level.
    #[must_use]
    pub fn description(&self, level: u32) -> Option<&DatasetDescription> {
        self.levels.get(&level)
    }

    /// Number of tiles along one side of `level`.
    #[must_use]
    pub fn grid_size(&self, level: u32) -> u32 {
        crate::types::grid_size(level)
    }

    /// Elevation texture edge length of a loaded level.
    #[must_use]
    pub fn elevation_tile_size(&self, level: u32) -> Option<u32> {
        self.description(level).map(|d| d.elevation_tile_size)
    }

    /// World units per elevation pixel of a loaded level.
    #[must_use]
    pub fn elevation_pixel_size(&self, level: u32) -> Option<f64> {
        self.description(level).map(|d| d.elevation_pixel_size)
    }

    /// Satellite texture edge length of a loaded level.
    #[must_use]
    pub fn satellite_tile_size(&self, level: u32) -> Option<u32> {
        self.description(level).map(|d| d.satellite_tile_size)
    }

    /// Raw elevation to scene height factor of a loaded level.
    #[must_use]
    pub fn elevation_scale(&self, level: u32, model_scale: f32) -> Option<f32> {
        let description = self.description(level)?;
        Some(elevation_scale(
            model_scale,
            level,
            description.elevation_pixel_size,
            description.elevation_tile_size,
        ))
    }

    /// Scene height of the ground reference of `tile`.
    #[must_use]
    pub fn ground_height(&self, tile: &TerrainTile, scales: &TerrainScales) -> Option<f32> {
        let scale = self.elevation_scale(tile.level, scales.model_scale)?;
        Some(tile.elevation_min * scale * scales.height_scale)
    }

    /// Draw parameters of one leaf tile.
    ///
    /// Returns `None` if the tile's level is not loaded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw_params(
        &self,
        tile: &TerrainTile,
        scales: &TerrainScales,
    ) -> Option<TileDrawParams> {
        let description = self.description(tile.level)?;
        let mesh_scale = scales.model_scale * level_scale(tile.level);
        let translation = (tile.position * scales.model_scale).extend(0.0);
        let world_transform = Mat4::from_translation(translation)
            * Mat4::from_scale(Vec3::new(mesh_scale, mesh_scale, 1.0));
        let tile_size = description.elevation_tile_size;

        Some(TileDrawParams {
            key: tile.key(),
            elevation_texture: tile.elevation_map,
            satellite_texture: tile.satellite_map,
            world_transform,
            elevation_scale: self.elevation_scale(tile.level, scales.model_scale)?,
            height_scale: scales.height_scale,
            elevation_tile_size: tile_size,
            terrain_size: (f64::from(tile_size) * description.elevation_pixel_size) as f32,
            normal_tile_size: tile_size.saturating_sub(2 * NORMAL_BORDER),
        })
    }

    /// Cell and scaled world position of every leaf.
    #[must_use]
    pub fn listing(&self, model_scale: f32) -> Vec<(TileKey, Vec2)> {
        self.iterate()
            .map(|tile| (tile.key(), tile.position * model_scale))
            .collect()
    }

    fn assemble(
        &mut self,
        data_path: &Path,
        uploaded: &mut Vec<TextureHandle>,
    ) -> Result<(TerrainQuadtree, BTreeMap<u32, DatasetDescription>)> {
        let (coarse, coarse_tiles) = self.load_level(data_path, 1, uploaded)?;
        if coarse_tiles.len() != ROOT_TILE_COUNT {
            return Err(StructuralError::TileCount {
                level: 1,
                expected: ROOT_TILE_COUNT,
                found: coarse_tiles.len(),
            }
            .into());
        }
        let roots = arrange_quadrant(coarse_tiles, 1, TileCoord::new(0, 0))?;

        let (fine, mut fine_tiles) = self.load_level(data_path, 2, uploaded)?;
        let mut children = Vec::with_capacity(4);
        for index in 0..4 {
            let coord = TileCoord::new(
                REFINED_ORIGIN.column + index % 2,
                REFINED_ORIGIN.row + index / 2,
            );
            let found = fine_tiles
                .iter()
                .position(|tile| tile.coord() == coord)
                .ok_or(StructuralError::MissingTile { level: 2, coord })?;
            children.push(fine_tiles.swap_remove(found));
        }
        let children = arrange_quadrant(children, 2, REFINED_ORIGIN)?;

        let mut tree = TerrainQuadtree::with_root_tiles(roots);
        let refined = tree
            .child(NodeId::ROOT, REFINED_QUADRANT)
            .ok_or(StructuralError::MissingTile {
                level: 1,
                coord: REFINED_ORIGIN,
            })?;
        let replaced = tree.subdivide(refined, children)?;

        tracing::debug!(
            replaced = ?replaced.key(),
            unused = fine_tiles.len(),
            "releasing tiles outside the tree"
        );
        release_tiles(&mut self.store, std::iter::once(&replaced).chain(&fine_tiles));

        let levels = BTreeMap::from([(1, coarse), (2, fine)]);
        Ok((tree, levels))
    }

    fn load_level(
        &mut self,
        data_path: &Path,
        level: u32,
        uploaded: &mut Vec<TextureHandle>,
    ) -> Result<(DatasetDescription, Vec<TerrainTile>)> {
        let dir = level_dir(data_path, level);
        let descriptor = load_description(&dir)?;
        let mut tiles =
            load_level_tiles(&dir, level, &descriptor, self.quad_size, &mut self.store)?;

        for tile in &mut tiles {
            tile.level = level;
            uploaded.extend(tile.textures());
        }
        Ok((descriptor.description, tiles))
    }
}

impl<S: TextureStore> Drop for TerrainGrid<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

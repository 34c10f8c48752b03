//! Ground height tracking for the camera.
//!
//! Each frame the tracker finds the first leaf whose footprint lies under the
//! camera and, when that leaf changes, writes its ground height into the
//! [`SimulationState`] read by the camera update.

use glam::{Vec2, Vec3};

use crate::grid::TerrainGrid;
use crate::store::TextureStore;
use crate::types::{TerrainScales, TileKey, is_above};

/// Per-frame state shared between the terrain scan and the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationState {
    /// Scene height of the terrain reference under the camera.
    pub camera_ground_height: f32,
}

/// Outcome of one [`GroundTracker::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundUpdate {
    /// The camera did not move horizontally or is still over the same tile.
    Unchanged,
    /// The camera is over no tile; the previous height was kept.
    OffGrid,
    /// The camera entered a different tile and the height was recomputed.
    Rebound {
        /// The tile now under the camera.
        key: TileKey,
        /// Its ground height.
        height: f32,
    },
}

/// Tracks which tile the camera is above.
#[derive(Debug, Clone, Default)]
pub struct GroundTracker {
    last_position: Option<Vec2>,
    current: Option<TileKey>,
}

impl GroundTracker {
    /// Create a tracker bound to no tile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tile the ground height currently comes from.
    #[must_use]
    pub fn current_tile(&self) -> Option<TileKey> {
        self.current
    }

    /// Rescan the grid if the camera moved horizontally.
    ///
    /// The footprint test uses the grid's level-1 quad size for every level,
    /// so finer tiles are matched by their enlarged footprint in traversal
    /// order.
    pub fn update<S: TextureStore>(
        &mut self,
        grid: &TerrainGrid<S>,
        scales: &TerrainScales,
        camera_position: Vec3,
        state: &mut SimulationState,
    ) -> GroundUpdate {
        let horizontal = camera_position.truncate();
        if self.last_position == Some(horizontal) {
            return GroundUpdate::Unchanged;
        }
        self.last_position = Some(horizontal);

        let Some(tile) = grid
            .iterate()
            .find(|tile| is_above(tile, grid.quad_size(), scales.model_scale, camera_position))
        else {
            return GroundUpdate::OffGrid;
        };

        let key = tile.key();
        if self.current == Some(key) {
            return GroundUpdate::Unchanged;
        }

        let Some(height) = grid.ground_height(tile, scales) else {
            tracing::warn!(?key, "no dataset loaded for tile level");
            return GroundUpdate::Unchanged;
        };

        state.camera_ground_height = height;
        self.current = Some(key);
        tracing::debug!(?key, height, "camera ground rebound");

        GroundUpdate::Rebound { key, height }
    }
}

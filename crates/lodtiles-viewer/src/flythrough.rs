//! The frame loop: pan, update the camera, bind ground, draw leaves.

use glam::{Mat4, Vec2};
use lodtiles::{
    GroundTracker, GroundUpdate, SimulationState, TerrainGrid, TerrainScales, TextureStore,
};

use crate::camera::OrbitCamera;
use crate::render::{RenderFeatures, TileRenderer, draw_tile};

/// Viewport aspect ratio used for the projection.
const ASPECT_RATIO: f32 = 1280.0 / 720.0;

/// What happened in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Leaves handed to the renderer.
    pub rendered_tiles: usize,
    /// Outcome of the ground scan.
    pub ground: GroundUpdate,
}

/// Drives a camera over a loaded grid and renders every leaf each frame.
pub struct Flythrough<'a, S: TextureStore, R: TileRenderer> {
    grid: &'a TerrainGrid<S>,
    renderer: R,
    camera: OrbitCamera,
    tracker: GroundTracker,
    state: SimulationState,
    scales: TerrainScales,
    features: RenderFeatures,
    projection: Mat4,
}

impl<'a, S: TextureStore, R: TileRenderer> Flythrough<'a, S, R> {
    /// Start a flythrough whose camera and ground tracker share `state`.
    pub fn new(
        grid: &'a TerrainGrid<S>,
        renderer: R,
        state: SimulationState,
        camera_distance: f32,
        scales: TerrainScales,
        features: RenderFeatures,
    ) -> Self {
        Self {
            grid,
            renderer,
            camera: OrbitCamera::new(camera_distance, &state),
            tracker: GroundTracker::new(),
            state,
            scales,
            features,
            projection: Mat4::perspective_rh_gl(60f32.to_radians(), ASPECT_RATIO, 0.01, 1000.0),
        }
    }

    #[must_use]
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Run one frame, moving the look-at point by `pan` first.
    pub fn frame(&mut self, pan: Vec2) -> FrameStats {
        self.camera.pan(pan);
        self.camera.update(&self.state);

        let ground = self.tracker.update(
            self.grid,
            &self.scales,
            self.camera.position(),
            &mut self.state,
        );
        if let GroundUpdate::Rebound { key, height } = ground {
            tracing::info!(?key, camera_ground_height = height, "camera over new tile");
        }

        let view_projection = self.projection * self.camera.view();
        let mut rendered_tiles = 0;
        for tile in self.grid.iterate() {
            let Some(params) = self.grid.draw_params(tile, &self.scales) else {
                continue;
            };
            draw_tile(&mut self.renderer, &params, view_projection, &self.features);
            rendered_tiles += 1;
        }

        FrameStats {
            rendered_tiles,
            ground,
        }
    }

    /// Run `frames` frames, returning the total number of tiles rendered.
    pub fn run(&mut self, frames: u32, pan: Vec2) -> usize {
        let mut rendered = 0;
        for frame in 0..frames {
            let stats = self.frame(pan);
            tracing::debug!(
                frame,
                tiles = stats.rendered_tiles,
                position = ?self.camera.position(),
                "frame"
            );
            rendered += stats.rendered_tiles;
        }
        rendered
    }
}

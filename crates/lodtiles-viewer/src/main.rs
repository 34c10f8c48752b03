//! Headless flythrough over a level-of-detail terrain grid.
//!
//! Loads a two-level tile dataset, then pans an orbital camera across it for
//! a fixed number of frames, keeping the camera above the terrain and handing
//! every leaf tile to a renderer each frame.

mod camera;
mod flythrough;
mod launch_params;
mod render;

use std::process::ExitCode;

use flythrough::Flythrough;
use lodtiles::{SimulationState, TerrainGrid};
use render::StatsRenderer;

fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let params = launch_params::parse();

    let mut grid = TerrainGrid::new().with_quad_size(params.quad_size);
    if let Err(e) = grid.load_tiles(&params.data_path) {
        tracing::error!(data_path = %params.data_path.display(), "failed to load terrain: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!(
        terrains = grid.len(),
        texture_bytes = grid.store().size(),
        "terrains loaded"
    );

    if params.info {
        tracing::info!(model_scale = params.scales.model_scale, "terrain grid");
        for (key, position) in grid.listing(params.scales.model_scale) {
            tracing::info!(
                level = key.level,
                column = key.coord.column,
                row = key.coord.row,
                x = position.x,
                y = position.y,
                "tile"
            );
        }
    }

    let mut flythrough = Flythrough::new(
        &grid,
        StatsRenderer::new(),
        SimulationState::default(),
        params.distance,
        params.scales,
        params.features,
    );
    flythrough.camera_mut().look_at = params.look_at;
    let rendered = flythrough.run(params.frames, params.pan);

    let counts = flythrough.renderer().counts();
    tracing::info!(
        frames = params.frames,
        rendered,
        terrain = counts.terrain,
        light_directions = counts.light_directions,
        outline = counts.outline,
        camera_ground_height = flythrough.state().camera_ground_height,
        camera_position = ?flythrough.camera().position(),
        camera_forward = ?flythrough.camera().forward(),
        "flythrough finished"
    );

    ExitCode::SUCCESS
}

//! Launch parameter parsing for the viewer.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use lodtiles::TerrainScales;

use crate::render::RenderFeatures;

/// Default dataset directory, holding `level1/` and `level2/`.
const DEFAULT_DATA_PATH: &str = "data/gen/more_details";
/// Default orbit distance from the look-at point.
const DEFAULT_DISTANCE: f32 = 20.0;
/// Default number of frames to run.
const DEFAULT_FRAMES: u32 = 120;
/// Default look-at movement per frame, in scene units.
const DEFAULT_PAN_STEP: f32 = 0.03;

/// Launch parameters for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParams {
    /// Dataset directory.
    pub data_path: PathBuf,
    /// Terrain scale factors.
    pub scales: TerrainScales,
    /// World edge length of a level-1 tile.
    pub quad_size: f32,
    /// Number of frames to run before exiting.
    pub frames: u32,
    /// Look-at movement per frame.
    pub pan: Vec2,
    /// Initial look-at point.
    pub look_at: Vec2,
    /// Orbit distance.
    pub distance: f32,
    /// Enabled render passes.
    pub features: RenderFeatures,
    /// Log the grid listing at startup.
    pub info: bool,
}

#[derive(Parser)]
#[command(about = "Headless flythrough over a level-of-detail terrain grid")]
struct CliArgs {
    /// Dataset directory containing level1/ and level2/.
    #[arg(default_value = DEFAULT_DATA_PATH)]
    data_path: PathBuf,

    /// Horizontal scale from grid units to scene units.
    #[arg(long, default_value_t = TerrainScales::default().model_scale)]
    model_scale: f32,

    /// Vertical exaggeration of elevations.
    #[arg(long, default_value_t = TerrainScales::default().height_scale)]
    height_scale: f32,

    /// World edge length of a level-1 tile.
    #[arg(long, default_value_t = 1.0)]
    quad_size: f32,

    /// Number of frames to run.
    #[arg(long, default_value_t = DEFAULT_FRAMES)]
    frames: u32,

    /// Look-at movement along X per frame.
    #[arg(long, default_value_t = DEFAULT_PAN_STEP, allow_negative_numbers = true)]
    pan_step: f32,

    /// Initial look-at X.
    #[arg(long, default_value_t = -1.9, allow_negative_numbers = true)]
    start_x: f32,

    /// Initial look-at Y.
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    start_y: f32,

    /// Orbit distance from the look-at point.
    #[arg(long, default_value_t = DEFAULT_DISTANCE)]
    distance: f32,

    /// Draw the shaded terrain surface.
    #[arg(long)]
    terrain: bool,

    /// Draw light direction vectors.
    #[arg(long)]
    lightdir: bool,

    /// Skip the wireframe outline.
    #[arg(long)]
    no_outline: bool,

    /// Skip the satellite texture.
    #[arg(long)]
    no_satellite: bool,

    /// Skip shading calculations.
    #[arg(long)]
    no_shades: bool,

    /// Log the grid listing at startup.
    #[arg(long)]
    info: bool,
}

impl From<CliArgs> for LaunchParams {
    fn from(args: CliArgs) -> Self {
        Self {
            data_path: args.data_path,
            scales: TerrainScales {
                model_scale: args.model_scale,
                height_scale: args.height_scale,
            },
            quad_size: args.quad_size,
            frames: args.frames,
            pan: Vec2::new(args.pan_step, 0.0),
            look_at: Vec2::new(args.start_x, args.start_y),
            distance: args.distance,
            features: RenderFeatures {
                show_terrain: args.terrain,
                show_lightdir: args.lightdir,
                show_outline: !args.no_outline,
                show_satellite: !args.no_satellite,
                calculate_shades: !args.no_shades,
            },
            info: args.info,
        }
    }
}

/// Parse launch parameters from command-line arguments.
pub fn parse() -> LaunchParams {
    CliArgs::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from(args: &[&str]) -> LaunchParams {
        CliArgs::try_parse_from(std::iter::once("lodtiles-viewer").chain(args.iter().copied()))
            .unwrap()
            .into()
    }

    #[test]
    fn test_defaults() {
        let params = parse_from(&[]);

        assert_eq!(params.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(params.scales, TerrainScales::default());
        assert_eq!(params.quad_size, 1.0);
        assert_eq!(params.frames, DEFAULT_FRAMES);
        assert_eq!(params.distance, DEFAULT_DISTANCE);
        assert_eq!(params.features, RenderFeatures::default());
        assert!(!params.info);
    }

    #[test]
    fn test_overrides() {
        let params = parse_from(&[
            "some/data",
            "--model-scale",
            "3",
            "--height-scale",
            "5",
            "--frames",
            "7",
            "--pan-step",
            "-0.5",
            "--start-x",
            "-1",
            "--terrain",
            "--no-outline",
            "--info",
        ]);

        assert_eq!(params.data_path, PathBuf::from("some/data"));
        assert_eq!(params.scales.model_scale, 3.0);
        assert_eq!(params.scales.height_scale, 5.0);
        assert_eq!(params.frames, 7);
        assert_eq!(params.pan, Vec2::new(-0.5, 0.0));
        assert_eq!(params.look_at.x, -1.0);
        assert!(params.features.show_terrain);
        assert!(!params.features.show_outline);
        assert!(params.info);
    }

    #[test]
    fn test_rejects_bad_number() {
        let result = CliArgs::try_parse_from(["lodtiles-viewer", "--frames", "many"]);
        assert!(result.is_err());
    }
}

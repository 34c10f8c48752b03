//! Render passes over terrain tiles.
//!
//! The grid core produces [`TileDrawParams`] per leaf; a [`TileRenderer`]
//! turns them into draw calls. [`StatsRenderer`] is the headless renderer: it
//! counts calls per pass and logs them.

use glam::Mat4;
use lodtiles::TileDrawParams;

/// Selected rendering features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderFeatures {
    /// Draw the shaded terrain surface.
    pub show_terrain: bool,
    /// Draw per-vertex light direction lines.
    pub show_lightdir: bool,
    /// Draw the wireframe outline.
    pub show_outline: bool,
    /// Texture the terrain with satellite imagery.
    pub show_satellite: bool,
    /// Apply shading.
    pub calculate_shades: bool,
}

impl Default for RenderFeatures {
    fn default() -> Self {
        Self {
            show_terrain: false,
            show_lightdir: false,
            show_outline: true,
            show_satellite: true,
            calculate_shades: true,
        }
    }
}

/// Consumer of per-tile draw calls.
pub trait TileRenderer {
    /// Draw the terrain surface of one tile.
    fn draw_terrain(
        &mut self,
        params: &TileDrawParams,
        local_to_screen: Mat4,
        features: &RenderFeatures,
    );

    /// Draw light direction vectors of one tile.
    fn draw_light_directions(&mut self, params: &TileDrawParams, local_to_screen: Mat4);

    /// Draw the wireframe outline of one tile.
    fn draw_outline(
        &mut self,
        params: &TileDrawParams,
        local_to_screen: Mat4,
        features: &RenderFeatures,
    );
}

/// Issue every enabled pass for one tile.
pub fn draw_tile<R: TileRenderer>(
    renderer: &mut R,
    params: &TileDrawParams,
    view_projection: Mat4,
    features: &RenderFeatures,
) {
    let local_to_screen = params.local_to_screen(view_projection);

    if features.show_terrain {
        renderer.draw_terrain(params, local_to_screen, features);
    }
    if features.show_lightdir {
        renderer.draw_light_directions(params, local_to_screen);
    }
    if features.show_outline {
        renderer.draw_outline(params, local_to_screen, features);
    }
}

/// Draw call counts per pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassCounts {
    pub terrain: usize,
    pub light_directions: usize,
    pub outline: usize,
}

/// Renderer that records draw calls instead of issuing them.
#[derive(Debug, Default)]
pub struct StatsRenderer {
    counts: PassCounts,
}

impl StatsRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls recorded so far.
    #[must_use]
    pub fn counts(&self) -> PassCounts {
        self.counts
    }
}

impl TileRenderer for StatsRenderer {
    fn draw_terrain(
        &mut self,
        params: &TileDrawParams,
        _local_to_screen: Mat4,
        features: &RenderFeatures,
    ) {
        self.counts.terrain += 1;
        tracing::trace!(
            key = ?params.key,
            elevation_scale = params.elevation_scale,
            satellite = features.show_satellite,
            shades = features.calculate_shades,
            "draw terrain"
        );
    }

    fn draw_light_directions(&mut self, params: &TileDrawParams, _local_to_screen: Mat4) {
        self.counts.light_directions += 1;
        tracing::trace!(
            key = ?params.key,
            normal_tile_size = params.normal_tile_size,
            "draw light directions"
        );
    }

    fn draw_outline(
        &mut self,
        params: &TileDrawParams,
        _local_to_screen: Mat4,
        _features: &RenderFeatures,
    ) {
        self.counts.outline += 1;
        tracing::trace!(key = ?params.key, "draw outline");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodtiles::{TextureHandle, TileCoord, TileKey};

    fn params() -> TileDrawParams {
        TileDrawParams {
            key: TileKey {
                level: 1,
                coord: TileCoord::new(0, 1),
            },
            elevation_texture: TextureHandle::from_raw(1),
            satellite_texture: TextureHandle::from_raw(2),
            world_transform: Mat4::IDENTITY,
            elevation_scale: 0.01,
            height_scale: 10.0,
            elevation_tile_size: 100,
            terrain_size: 2600.0,
            normal_tile_size: 96,
        }
    }

    #[test]
    fn test_default_features() {
        let mut renderer = StatsRenderer::new();

        draw_tile(&mut renderer, &params(), Mat4::IDENTITY, &RenderFeatures::default());

        assert_eq!(
            renderer.counts(),
            PassCounts {
                terrain: 0,
                light_directions: 0,
                outline: 1
            }
        );
    }

    #[test]
    fn test_all_passes() {
        let mut renderer = StatsRenderer::new();
        let features = RenderFeatures {
            show_terrain: true,
            show_lightdir: true,
            show_outline: true,
            ..RenderFeatures::default()
        };

        draw_tile(&mut renderer, &params(), Mat4::IDENTITY, &features);
        draw_tile(&mut renderer, &params(), Mat4::IDENTITY, &features);

        assert_eq!(
            renderer.counts(),
            PassCounts {
                terrain: 2,
                light_directions: 2,
                outline: 2
            }
        );
    }

    #[test]
    fn test_no_passes() {
        let mut renderer = StatsRenderer::new();
        let features = RenderFeatures {
            show_outline: false,
            ..RenderFeatures::default()
        };

        draw_tile(&mut renderer, &params(), Mat4::IDENTITY, &features);

        assert_eq!(renderer.counts(), PassCounts::default());
    }
}

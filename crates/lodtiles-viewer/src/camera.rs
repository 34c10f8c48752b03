//! Orbital camera over the terrain.
//!
//! The camera orbits a look-at point on the map at a fixed distance and is
//! kept above the ground height published in [`SimulationState`].

use glam::{Mat4, Vec2, Vec3, Vec4};
use lodtiles::SimulationState;

/// Minimum clearance above the ground.
pub const HEIGHT_OFFSET: f32 = 0.1;

/// Orbital camera looking at a point on the terrain.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Rotation around the camera X axis in radians.
    pub theta: f32,
    /// Rotation around the world Z axis in radians.
    pub phi: f32,
    /// Distance from the look-at point.
    pub distance: f32,
    /// Look-at point on the map.
    pub look_at: Vec2,
    position: Vec3,
    view: Mat4,
    prev_ground_height: f32,
}

impl OrbitCamera {
    /// Create a camera looking straight down at the origin.
    #[must_use]
    pub fn new(distance: f32, state: &SimulationState) -> Self {
        Self {
            theta: 0.0,
            phi: 0.0,
            distance,
            look_at: Vec2::ZERO,
            position: Vec3::ZERO,
            view: Mat4::IDENTITY,
            prev_ground_height: state.camera_ground_height,
        }
    }

    /// Camera position, valid after the first [`update`](Self::update).
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World to camera transform, valid after the first update.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Direction the camera looks in.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (-self.view.z_axis.truncate()).normalize()
    }

    /// Move the look-at point.
    pub fn pan(&mut self, delta: Vec2) {
        self.look_at += delta;
    }

    /// Recompute position and view from the orbit parameters.
    ///
    /// The ground height never decreases between updates, so the camera
    /// does not drop when it moves over lower terrain.
    pub fn update(&mut self, state: &SimulationState) {
        let ground_height = self.prev_ground_height.max(state.camera_ground_height);
        self.prev_ground_height = ground_height;

        self.distance = self.distance.max(0.0);

        let (sp, cp) = self.phi.sin_cos();
        let (st, ct) = self.theta.sin_cos();
        let cx = Vec3::new(cp, sp, 0.0);
        let cy = Vec3::new(-sp * ct, cp * ct, st);
        let cz = Vec3::new(sp * st, -cp * st, ct);

        let target = self.look_at.extend(ground_height);
        self.position = target + cz * self.distance;
        self.position.z = self.position.z.max(ground_height + HEIGHT_OFFSET);

        let rotation = Mat4::from_cols(
            Vec4::new(cx.x, cy.x, cz.x, 0.0),
            Vec4::new(cx.y, cy.y, cz.y, 0.0),
            Vec4::new(cx.z, cy.z, cz.z, 0.0),
            Vec4::W,
        );
        self.view = rotation * Mat4::from_translation(-self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(height: f32) -> SimulationState {
        SimulationState {
            camera_ground_height: height,
        }
    }

    #[test]
    fn test_top_down() {
        let mut camera = OrbitCamera::new(20.0, &state(0.0));
        camera.look_at = Vec2::new(1.0, -1.0);

        camera.update(&state(0.0));

        assert_eq!(camera.position(), Vec3::new(1.0, -1.0, 20.0));
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        // The look-at point lies straight ahead in view space.
        let target = camera.view().transform_point3(Vec3::new(1.0, -1.0, 0.0));
        assert!((target - Vec3::new(0.0, 0.0, -20.0)).length() < 1e-5);
    }

    #[test]
    fn test_clamps_above_ground() {
        let mut camera = OrbitCamera::new(0.0, &state(0.0));

        camera.update(&state(3.0));

        assert!((camera.position().z - 3.1).abs() < 1e-6);
    }

    #[test]
    fn test_negative_distance() {
        let mut camera = OrbitCamera::new(-5.0, &state(1.0));

        camera.update(&state(1.0));

        assert_eq!(camera.distance, 0.0);
        assert!((camera.position().z - (1.0 + HEIGHT_OFFSET)).abs() < 1e-6);
    }

    #[test]
    fn test_ground_never_drops() {
        let mut camera = OrbitCamera::new(2.0, &state(0.0));

        camera.update(&state(5.0));
        assert!((camera.position().z - 7.0).abs() < 1e-6);

        // Lower ground is ignored.
        camera.update(&state(1.0));
        assert!((camera.position().z - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_tilted_stays_above_ground() {
        let mut camera = OrbitCamera::new(10.0, &state(0.0));
        camera.theta = std::f32::consts::FRAC_PI_2 + 0.3;

        camera.update(&state(2.0));

        assert!(camera.position().z >= 2.0 + HEIGHT_OFFSET);
    }

    #[test]
    fn test_pan() {
        let mut camera = OrbitCamera::new(1.0, &state(0.0));

        camera.pan(Vec2::new(0.5, 0.25));
        camera.pan(Vec2::new(0.5, 0.25));
        camera.update(&state(0.0));

        assert_eq!(camera.look_at, Vec2::new(1.0, 0.5));
        assert_eq!(camera.position().truncate(), Vec2::new(1.0, 0.5));
    }
}

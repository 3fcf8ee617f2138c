use crate::engine::error::SceneError;
use crate::engine::picking::Ray;
use bevy::math::{Quat, Vec2, Vec3};
use constants::camera::{FAR_PLANE, NEAR_PLANE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CameraPose {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Perspective parameters tied to the current viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    viewport: Vec2,
}

impl Projection {
    pub fn new(width: f32, height: f32, fov_degrees: f32) -> Result<Self, SceneError> {
        check_viewport(width, height)?;
        if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
            return Err(SceneError::InvalidConfig(format!(
                "field of view {fov_degrees} out of range"
            )));
        }

        Ok(Self {
            fov_y: fov_degrees.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            viewport: Vec2::new(width, height),
        })
    }

    /// Update the viewport. A zero-sized viewport (minimised window) is
    /// rejected and the previous size kept.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SceneError> {
        check_viewport(width, height)?;
        self.viewport = Vec2::new(width, height);
        Ok(())
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    /// Pixel position (origin top-left) to normalised device coordinates.
    pub fn pixel_to_ndc(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            px.x / self.viewport.x * 2.0 - 1.0,
            -(px.y / self.viewport.y) * 2.0 + 1.0,
        )
    }

    pub fn ray_from_ndc(&self, ndc: Vec2, pose: &CameraPose) -> Option<Ray> {
        let half = (self.fov_y * 0.5).tan();
        let local = Vec3::new(ndc.x * half * self.aspect(), ndc.y * half, -1.0);
        Ray::new(pose.position, pose.rotation * local)
    }
}

fn check_viewport(width: f32, height: f32) -> Result<(), SceneError> {
    if width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidViewport { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_viewport() {
        assert!(matches!(
            Projection::new(0.0, 600.0, 75.0),
            Err(SceneError::InvalidViewport { .. })
        ));
        assert!(Projection::new(800.0, 600.0, 0.0).is_err());

        let mut p = Projection::new(800.0, 600.0, 75.0).unwrap();
        assert!(p.resize(0.0, 0.0).is_err());
        assert_eq!(p.viewport(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn ndc_corners() {
        let p = Projection::new(800.0, 600.0, 75.0).unwrap();
        assert_eq!(p.pixel_to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(p.pixel_to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_eq!(p.pixel_to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
    }

    #[test]
    fn centre_ray_follows_camera_forward() {
        let p = Projection::new(1280.0, 720.0, 75.0).unwrap();
        let pose = CameraPose {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
        };
        let ray = p.ray_from_ndc(Vec2::ZERO, &pose).unwrap();
        assert_eq!(ray.origin, pose.position);
        assert!(ray.direction.abs_diff_eq(pose.forward(), 1e-5));
    }

    #[test]
    fn top_edge_ray_matches_fov() {
        let p = Projection::new(800.0, 800.0, 90.0).unwrap();
        let pose = CameraPose {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        };
        let ray = p.ray_from_ndc(Vec2::new(0.0, 1.0), &pose).unwrap();
        // 45 degrees up from -Z.
        assert!((ray.direction.y - ray.direction.z.abs()).abs() < 1e-5);
    }
}

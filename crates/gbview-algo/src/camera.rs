//! Perspective camera framed on the building.

use crate::bounds::SceneBounds;
use crate::scene::plan_to_world;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

pub const FIELD_OF_VIEW_DEG: f64 = 45.0;
pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 1000.0;

const DISTANCE_FACTOR: f64 = 2.0;
const HEIGHT_FACTOR: f64 = 0.8;
const MIN_DISTANCE_FACTOR: f64 = 0.5;
const MAX_DISTANCE_FACTOR: f64 = 4.0;
// Keeps the view matrix well defined at the poles.
const POLAR_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFraming {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub min_distance: f64,
    pub max_distance: f64,
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl CameraFraming {
    pub fn from_bounds(bounds: &SceneBounds) -> Self {
        let max_dim = bounds.max_dimension();
        let d = DISTANCE_FACTOR * max_dim;
        Self {
            position: Point3::new(d, HEIGHT_FACTOR * d, d),
            target: plan_to_world(bounds.center.x, bounds.center.y, bounds.center.z),
            min_distance: MIN_DISTANCE_FACTOR * max_dim,
            max_distance: MAX_DISTANCE_FACTOR * max_dim,
            fov_deg: FIELD_OF_VIEW_DEG,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }
}

/// Orbiting camera. Position is kept in spherical form around `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    framing: CameraFraming,
    target: Point3<f64>,
    distance: f64,
    /// Azimuth around world +Y.
    yaw: f64,
    /// Angle from world +Y, `[0, pi/2]`.
    polar: f64,
    aspect: f64,
}

impl Camera {
    /// An unusable `aspect` (zero, negative, non-finite) starts the camera square.
    pub fn new(framing: CameraFraming, aspect: f64) -> Self {
        let mut camera = Self {
            framing,
            target: framing.target,
            distance: 0.0,
            yaw: 0.0,
            polar: 0.0,
            aspect: 1.0,
        };
        camera.set_aspect(aspect);
        camera.reset();
        camera
    }

    pub fn framing(&self) -> &CameraFraming {
        &self.framing
    }

    pub fn target(&self) -> Point3<f64> {
        self.target
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Ignores aspects the projection cannot use; the previous one stays.
    pub fn set_aspect(&mut self, aspect: f64) -> bool {
        if !(aspect.is_finite() && aspect > 0.0) {
            return false;
        }
        self.aspect = aspect;
        true
    }

    /// Back to the framed position. The framed distance is not clamped.
    pub fn reset(&mut self) {
        self.target = self.framing.target;
        let offset = self.framing.position - self.target;
        self.distance = offset.norm();
        self.yaw = offset.x.atan2(offset.z);
        self.polar = if self.distance > 0.0 {
            (offset.y / self.distance).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };
    }

    pub fn position(&self) -> Point3<f64> {
        let (sp, cp) = self.polar.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        self.target + Vector3::new(sp * sy, cp, sp * cy) * self.distance
    }

    pub fn orbit(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.polar = (self.polar - d_pitch).clamp(POLAR_EPSILON, FRAC_PI_2);
    }

    /// `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f64) {
        self.distance = (self.distance * factor).clamp(self.framing.min_distance, self.framing.max_distance);
    }

    pub fn view(&self) -> Matrix4<f64> {
        Isometry3::look_at_rh(&self.position(), &self.target, &Vector3::y()).to_homogeneous()
    }

    pub fn projection(&self) -> Matrix4<f64> {
        Perspective3::new(
            self.aspect,
            self.framing.fov_deg.to_radians(),
            self.framing.near,
            self.framing.far,
        )
        .to_homogeneous()
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn framing() -> CameraFraming {
        CameraFraming {
            position: Point3::new(20.0, 16.0, 20.0),
            target: Point3::new(0.0, 0.0, 0.0),
            min_distance: 5.0,
            max_distance: 40.0,
            fov_deg: FIELD_OF_VIEW_DEG,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    #[test]
    fn starts_at_framed_position() {
        let cam = Camera::new(framing(), 1.5);
        assert_relative_eq!(Point3::new(20.0, 16.0, 20.0), cam.position(), epsilon = 1e-9);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let mut cam = Camera::new(framing(), 0.0);
        assert_relative_eq!(1.0, cam.aspect());
        assert!(cam.set_aspect(2.0));
        assert!(!cam.set_aspect(0.0));
        assert!(!cam.set_aspect(f64::INFINITY));
        assert!(!cam.set_aspect(f64::NAN));
        assert_relative_eq!(2.0, cam.aspect());
        assert!(cam.view_projection().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn zoom_respects_limits() {
        let mut cam = Camera::new(framing(), 1.0);
        for _ in 0..100 {
            cam.zoom(0.5);
        }
        assert_relative_eq!(5.0, cam.distance());
        for _ in 0..100 {
            cam.zoom(2.0);
        }
        assert_relative_eq!(40.0, cam.distance());
    }

    #[test]
    fn orbit_stays_above_ground() {
        let mut cam = Camera::new(framing(), 1.0);
        cam.orbit(0.3, -10.0);
        assert!(cam.position().y >= -1e-9);
        cam.reset();
        assert_relative_eq!(Point3::new(20.0, 16.0, 20.0), cam.position(), epsilon = 1e-9);
    }
}

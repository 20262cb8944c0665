//! Smooth turning of the model toward the camera.
//!
//! Only yaw is followed: the model stays upright on the marker and turns
//! around the anchor's up axis. Smoothing is frame-rate independent
//! (exponential approach with `alpha = 1 - exp(-rate * dt)`).

use glam::{Quat, Vec3};

/// Below this horizontal distance the camera is straight above the anchor
/// and yaw is undefined.
const MIN_HORIZONTAL_DISTANCE: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct FacingSmoother {
    rate: f32,
    current: Quat,
}

impl FacingSmoother {
    /// `rate` is in 1/s; zero disables turning.
    pub fn new(rate: f32) -> Self {
        Self {
            rate: rate.max(0.0),
            current: Quat::IDENTITY,
        }
    }

    pub fn current(&self) -> Quat {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = Quat::IDENTITY;
    }

    /// Rotation that faces a camera at `camera_offset` (anchor space).
    pub fn target(camera_offset: Vec3) -> Option<Quat> {
        let horizontal = Vec3::new(camera_offset.x, 0.0, camera_offset.z);
        if horizontal.length() < MIN_HORIZONTAL_DISTANCE {
            return None;
        }
        Some(Quat::from_rotation_y(camera_offset.x.atan2(camera_offset.z)))
    }

    /// Move the current rotation toward the camera by one frame.
    ///
    /// Returns the new rotation, or `None` when nothing changed.
    pub fn step(&mut self, camera_offset: Vec3, dt: f32) -> Option<Quat> {
        if self.rate == 0.0 || dt <= 0.0 {
            return None;
        }
        let target = Self::target(camera_offset)?;
        let alpha = 1.0 - (-self.rate * dt).exp();
        self.current = self.current.slerp(target, alpha).normalize();
        Some(self.current)
    }
}

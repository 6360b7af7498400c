//! Slider-driven camera distance.

use glam::Vec3;

/// Maps a normalized slider value onto a camera distance range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceSlider {
    pub min_distance: f32,
    pub max_distance: f32,
}

impl DistanceSlider {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            min_distance,
            max_distance,
        }
    }

    /// Linear interpolation between the bounds; `value` is clamped to `0..=1`.
    pub fn distance(&self, value: f32) -> f32 {
        let t = value.clamp(0.0, 1.0);
        self.min_distance + (self.max_distance - self.min_distance) * t
    }
}

/// A camera orbiting a target at a fixed bearing and height.
#[derive(Clone, Copy, Debug)]
pub struct CameraRig {
    pub target: Vec3,
    /// Horizontal direction from the target to the camera.
    pub bearing: Vec3,
    pub height: f32,
    pub distance: f32,
}

impl CameraRig {
    pub fn new(target: Vec3, bearing: Vec3, height: f32, distance: f32) -> Self {
        Self {
            target,
            bearing: bearing.normalize_or_zero(),
            height,
            distance,
        }
    }

    pub fn on_slider_value_changed(&mut self, slider: &DistanceSlider, value: f32) {
        self.distance = slider.distance(value);
    }

    /// World-space camera position.
    pub fn position(&self) -> Vec3 {
        self.target + self.bearing * self.distance + Vec3::Y * self.height
    }
}

/// Triangle wave over the run: 0 at the first frame, 1 halfway, 0 at the last.
pub fn slider_value(frame: u32, frames: u32) -> f32 {
    if frames <= 1 {
        return 0.0;
    }
    let phase = frame.min(frames - 1) as f32 / (frames - 1) as f32;
    1.0 - (2.0 * phase - 1.0).abs()
}

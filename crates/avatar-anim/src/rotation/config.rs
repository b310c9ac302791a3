//! Rotation configuration

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rotation and zoom configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Degrees added to the y angle per auto-rotate interval
    pub auto_rotate_step_deg: f32,
    /// Auto-rotate interval in milliseconds
    pub tick_interval_ms: u64,
    /// Degrees of rotation per pixel of drag
    pub drag_sensitivity: f32,
    /// Scale multiplier per scroll step
    pub zoom_factor: f32,
    /// Smallest allowed scale
    pub min_scale: f32,
    /// Largest allowed scale
    pub max_scale: f32,
    /// Scale at startup and after a reset
    pub initial_scale: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            auto_rotate_step_deg: 0.3,
            tick_interval_ms: 33,
            drag_sensitivity: 0.5,
            zoom_factor: 1.1,
            min_scale: 0.1,
            max_scale: 5.0,
            initial_scale: 1.0,
        }
    }
}

impl RotationConfig {
    /// Auto-rotate speed in degrees per second
    pub fn auto_rotate_speed(&self) -> f32 {
        self.auto_rotate_step_deg * 1000.0 / self.tick_interval_ms.max(1) as f32
    }

    /// Scale bounds as `(min, max)`, falling back to the defaults when the
    /// configured pair is not finite, not positive or inverted
    pub fn scale_bounds(&self) -> (f32, f32) {
        let (min, max) = (self.min_scale, self.max_scale);
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            (min, max)
        } else {
            let defaults = Self::default();
            (defaults.min_scale, defaults.max_scale)
        }
    }

    /// Clamp a scale into the scale bounds. A non-finite scale maps to the
    /// lower bound.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        let (min, max) = self.scale_bounds();
        if scale.is_nan() {
            return min;
        }
        scale.max(min).min(max)
    }

    /// Replace unusable values with their defaults, logging each one
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let bounds = self.scale_bounds();
        if bounds != (self.min_scale, self.max_scale) {
            warn!(
                "Invalid scale bounds [{}, {}], using [{}, {}]",
                self.min_scale, self.max_scale, bounds.0, bounds.1
            );
            self.min_scale = bounds.0;
            self.max_scale = bounds.1;
        }
        if !self.initial_scale.is_finite() {
            warn!(
                "Invalid initial scale {}, using {}",
                self.initial_scale, defaults.initial_scale
            );
            self.initial_scale = defaults.initial_scale;
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor <= 0.0 {
            warn!(
                "Invalid zoom factor {}, using {}",
                self.zoom_factor, defaults.zoom_factor
            );
            self.zoom_factor = defaults.zoom_factor;
        }
        if !self.auto_rotate_step_deg.is_finite() {
            warn!(
                "Invalid auto-rotate step {}, using {}",
                self.auto_rotate_step_deg, defaults.auto_rotate_step_deg
            );
            self.auto_rotate_step_deg = defaults.auto_rotate_step_deg;
        }
        if !self.drag_sensitivity.is_finite() {
            warn!(
                "Invalid drag sensitivity {}, using {}",
                self.drag_sensitivity, defaults.drag_sensitivity
            );
            self.drag_sensitivity = defaults.drag_sensitivity;
        }
        self
    }
}

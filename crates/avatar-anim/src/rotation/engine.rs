//! Rotation transform engine with auto-rotate and drag/zoom input

use std::time::Duration;

use avatar_core::{wrap_degrees, EulerAngles, Normal, Position};
use glam::{Mat4, Vec3};
use tracing::debug;

use crate::input::PointerEvent;

use super::RotationConfig;

/// Who currently drives the orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// The tick advances the y angle
    AutoRotating,
    /// A pointer drag is in progress; ticks leave the angles alone
    ManualDragging,
}

/// Orientation and scale of the displayed mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Euler angles in degrees, each in `[0, 360)`
    pub angles: EulerAngles,
    /// Uniform scale, within the configured bounds
    pub scale: f32,
}

/// Rotate every vertex by `Rz * Ry * Rx`
pub fn rotate_vertices(vertices: &[Position], angles: EulerAngles) -> Vec<Position> {
    let rotation = angles.rotation_matrix();
    vertices
        .iter()
        .map(|v| (rotation * Vec3::from(*v)).to_array())
        .collect()
}

/// Rotate every normal by `Rz * Ry * Rx` and renormalize it to unit length.
///
/// Zero-length normals stay zero.
pub fn rotate_normals(normals: &[Normal], angles: EulerAngles) -> Vec<Normal> {
    let rotation = angles.rotation_matrix();
    normals
        .iter()
        .map(|n| (rotation * Vec3::from(*n)).normalize_or_zero().to_array())
        .collect()
}

/// Tracks orientation and scale, and applies them to vertex data on demand.
///
/// Confined to the tick thread: drag input and auto-rotate ticks are
/// serialized by the caller, and [`RotationMode`] decides which one wins.
pub struct RotationTransformEngine {
    /// Configuration
    pub config: RotationConfig,
    state: RotationState,
    mode: RotationMode,
}

impl RotationTransformEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(RotationConfig::default())
    }

    /// Create an engine with a custom configuration. Unusable values are
    /// replaced by their defaults.
    pub fn with_config(config: RotationConfig) -> Self {
        let config = config.sanitized();
        let scale = config.clamp_scale(config.initial_scale);
        Self {
            config,
            state: RotationState {
                angles: EulerAngles::ZERO,
                scale,
            },
            mode: RotationMode::AutoRotating,
        }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn angles(&self) -> EulerAngles {
        self.state.angles
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    /// Whether a manual drag currently suspends auto-rotation
    pub fn is_manual_active(&self) -> bool {
        self.mode == RotationMode::ManualDragging
    }

    /// Pointer pressed: suspend auto-rotation
    pub fn begin_drag(&mut self) {
        if self.mode != RotationMode::ManualDragging {
            debug!("Manual drag started, auto-rotate suspended");
            self.mode = RotationMode::ManualDragging;
        }
    }

    /// Pointer released: auto-rotation resumes on the next tick
    pub fn end_drag(&mut self) {
        if self.mode != RotationMode::AutoRotating {
            debug!("Manual drag ended, auto-rotate resumed");
            self.mode = RotationMode::AutoRotating;
        }
    }

    /// Apply a pointer drag delta in pixels.
    ///
    /// Vertical motion pitches around x, horizontal motion yaws around y.
    /// Implies [`begin_drag`](Self::begin_drag). Non-finite deltas are ignored.
    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        self.begin_drag();
        if !dx.is_finite() || !dy.is_finite() {
            debug!("Ignoring non-finite drag delta ({}, {})", dx, dy);
            return;
        }
        let angles = &mut self.state.angles;
        angles.x = wrap_degrees(angles.x + dy * self.config.drag_sensitivity);
        angles.y = wrap_degrees(angles.y + dx * self.config.drag_sensitivity);
    }

    /// Apply one discrete scroll step. Only the sign of `delta` matters;
    /// zero is ignored.
    pub fn apply_zoom(&mut self, delta: f32) {
        let scale = if delta > 0.0 {
            self.state.scale * self.config.zoom_factor
        } else if delta < 0.0 {
            self.state.scale / self.config.zoom_factor
        } else {
            return;
        };
        self.state.scale = self.config.clamp_scale(scale);
    }

    /// Advance auto-rotation by `dt`. No-op while dragging.
    pub fn tick(&mut self, dt: Duration) {
        if self.mode == RotationMode::ManualDragging {
            return;
        }
        let step = self.config.auto_rotate_speed() * dt.as_secs_f32();
        self.state.angles.y = wrap_degrees(self.state.angles.y + step);
    }

    /// Route a pointer gesture to the matching operation
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::DragStarted => self.begin_drag(),
            PointerEvent::Dragged { dx, dy } => self.apply_drag(dx, dy),
            PointerEvent::DragEnded => self.end_drag(),
            PointerEvent::Scrolled(delta) => self.apply_zoom(delta),
        }
    }

    /// Set the angles directly (wrapped into `[0, 360)`)
    pub fn set_angles(&mut self, angles: EulerAngles) {
        self.state.angles = angles.wrapped();
    }

    /// Return to the initial orientation and scale, auto-rotating
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// Vertices rotated by the current angles
    pub fn rotated_vertices(&self, vertices: &[Position]) -> Vec<Position> {
        rotate_vertices(vertices, self.state.angles)
    }

    /// Normals rotated by the current angles, unit length
    pub fn rotated_normals(&self, normals: &[Normal]) -> Vec<Normal> {
        rotate_normals(normals, self.state.angles)
    }

    /// Vertices rotated and then uniformly scaled
    pub fn transform_vertices(&self, vertices: &[Position]) -> Vec<Position> {
        let matrix = self.state.angles.rotation_matrix() * self.state.scale;
        vertices
            .iter()
            .map(|v| (matrix * Vec3::from(*v)).to_array())
            .collect()
    }

    /// Model matrix (scale and rotation) for renderers
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_mat3(self.state.angles.rotation_matrix() * self.state.scale)
    }
}

impl Default for RotationTransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn length(v: [f32; 3]) -> f32 {
        Vec3::from(v).length()
    }

    #[test]
    fn test_identity_rotation() {
        let vertices = vec![[1.0, 2.0, 3.0], [-0.5, 0.25, 8.0]];
        let rotated = rotate_vertices(&vertices, EulerAngles::ZERO);
        for (a, b) in vertices.iter().zip(&rotated) {
            assert!(Vec3::from(*a).abs_diff_eq(Vec3::from(*b), 1e-6));
        }
    }

    #[test]
    fn test_yaw_quarter_turn() {
        let rotated = rotate_vertices(&[[0.0, 0.0, 1.0]], EulerAngles::new(0.0, 90.0, 0.0));
        assert!(Vec3::from(rotated[0]).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_zero_normal_stays_zero() {
        let rotated = rotate_normals(&[[0.0, 0.0, 0.0]], EulerAngles::new(10.0, 20.0, 30.0));
        assert_eq!(rotated[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_non_unit_normal_renormalized() {
        let rotated = rotate_normals(&[[0.0, 3.0, 4.0]], EulerAngles::new(45.0, 0.0, 0.0));
        assert!((length(rotated[0]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tick_auto_rotates() {
        let mut engine = RotationTransformEngine::new();
        engine.tick(Duration::from_millis(33));
        assert!((engine.angles().y - 0.3).abs() < 1e-4);
        assert_eq!(engine.angles().x, 0.0);
    }

    #[test]
    fn test_drag_suspends_auto_rotate() {
        let mut engine = RotationTransformEngine::new();
        engine.apply_drag(10.0, 4.0);
        assert!(engine.is_manual_active());
        assert!((engine.angles().y - 5.0).abs() < 1e-4);
        assert!((engine.angles().x - 2.0).abs() < 1e-4);

        engine.tick(Duration::from_millis(330));
        assert!((engine.angles().y - 5.0).abs() < 1e-4);

        engine.end_drag();
        assert_eq!(engine.mode(), RotationMode::AutoRotating);
        engine.tick(Duration::from_millis(33));
        assert!((engine.angles().y - 5.3).abs() < 1e-4);
    }

    #[test]
    fn test_drag_wraps_angles() {
        let mut engine = RotationTransformEngine::new();
        engine.apply_drag(-20.0, 1000.0);
        let angles = engine.angles();
        assert!((angles.y - 350.0).abs() < 1e-3);
        assert!((angles.x - 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_handle_pointer_sequence() {
        let mut engine = RotationTransformEngine::new();
        engine.handle_pointer(PointerEvent::DragStarted);
        assert!(engine.is_manual_active());
        engine.handle_pointer(PointerEvent::Dragged { dx: 2.0, dy: 0.0 });
        engine.handle_pointer(PointerEvent::DragEnded);
        assert!(!engine.is_manual_active());
        engine.handle_pointer(PointerEvent::Scrolled(1.0));
        assert!((engine.scale() - 1.1).abs() < 1e-5);
        assert!((engine.angles().y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_in_and_out() {
        let mut engine = RotationTransformEngine::new();
        engine.apply_zoom(3.0);
        assert!((engine.scale() - 1.1).abs() < 1e-5);
        engine.apply_zoom(-1.0);
        assert!((engine.scale() - 1.0).abs() < 1e-5);
        engine.apply_zoom(0.0);
        assert!((engine.scale() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut engine = RotationTransformEngine::new();
        for _ in 0..200 {
            engine.apply_zoom(1.0);
        }
        assert_eq!(engine.scale(), 5.0);
        for _ in 0..200 {
            engine.apply_zoom(-1.0);
        }
        assert_eq!(engine.scale(), 0.1);
    }

    #[test]
    fn test_transform_applies_scale() {
        let mut engine = RotationTransformEngine::new();
        engine.apply_zoom(1.0);
        let out = engine.transform_vertices(&[[1.0, 0.0, 0.0]]);
        assert!((out[0][0] - 1.1).abs() < 1e-5);

        let m = engine.model_matrix();
        let p = m.transform_point3(Vec3::X);
        assert!((p.x - 1.1).abs() < 1e-5);
    }

    #[test]
    fn test_reset() {
        let mut engine = RotationTransformEngine::new();
        engine.apply_drag(30.0, 30.0);
        engine.apply_zoom(1.0);
        engine.reset();
        assert_eq!(engine.angles(), EulerAngles::ZERO);
        assert_eq!(engine.scale(), 1.0);
        assert_eq!(engine.mode(), RotationMode::AutoRotating);
    }

    #[test]
    fn test_non_finite_drag_ignored() {
        let mut engine = RotationTransformEngine::new();
        engine.apply_drag(20.0, 10.0);
        let before = engine.angles();
        engine.apply_drag(f32::NAN, 0.0);
        engine.apply_drag(0.0, f32::INFINITY);
        assert_eq!(engine.angles(), before);
        assert!(engine.is_manual_active());

        engine.end_drag();
        engine.tick(Duration::from_millis(33));
        let y = engine.angles().y;
        assert!(y.is_finite() && (0.0..360.0).contains(&y));
    }

    #[test]
    fn test_set_angles_non_finite() {
        let mut engine = RotationTransformEngine::new();
        engine.set_angles(EulerAngles {
            x: f32::NAN,
            y: 45.0,
            z: f32::NEG_INFINITY,
        });
        assert_eq!(engine.angles(), EulerAngles::new(0.0, 45.0, 0.0));
    }

    #[test]
    fn test_inverted_scale_bounds_do_not_panic() {
        let mut engine = RotationTransformEngine::with_config(RotationConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..Default::default()
        });
        assert_eq!(engine.scale(), 1.0);
        for _ in 0..200 {
            engine.apply_zoom(1.0);
        }
        assert_eq!(engine.scale(), 5.0);
    }

    proptest! {
        #[test]
        fn prop_rotated_normals_unit_length(
            x in -720.0f32..720.0,
            y in -720.0f32..720.0,
            z in -720.0f32..720.0,
            theta in 0.0f32..std::f32::consts::TAU,
            phi in 0.0f32..std::f32::consts::PI,
        ) {
            let normal = [phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()];
            let rotated = rotate_normals(&[normal], EulerAngles::new(x, y, z));
            prop_assert!((length(rotated[0]) - 1.0).abs() < 1e-4);
        }

        #[test]
        fn prop_zoom_stays_in_bounds(deltas in proptest::collection::vec(-3.0f32..3.0, 0..300)) {
            let mut engine = RotationTransformEngine::new();
            for delta in deltas {
                engine.apply_zoom(delta);
                prop_assert!(engine.scale() >= 0.1 && engine.scale() <= 5.0);
            }
        }
    }
}

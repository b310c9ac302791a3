//! Avatar Anim - Mesh animation and interactive viewing
//!
//! Provides the rotation/zoom transform applied for display, the viseme frame
//! synthesizer that approximates mouth movement, the timed frame player, and
//! the mapping from raw pointer input to drag and zoom gestures.

pub mod input;
pub mod player;
pub mod rotation;
pub mod viseme;

pub use input::{PointerEvent, PointerTracker};
pub use player::{AnimationPlayer, PlaybackEvent, PlaybackState, PlayerConfig};
pub use rotation::{
    rotate_normals, rotate_vertices, RotationConfig, RotationMode, RotationState,
    RotationTransformEngine,
};
pub use viseme::{
    AnimationFrame, AnimationSequence, SineViseme, VisemeConfig, VisemeFrameSynthesizer,
    VisemeGenerator,
};

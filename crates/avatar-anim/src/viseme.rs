//! Viseme frame synthesis
//!
//! Turns a reply text and a duration budget into a sequence of deformed
//! copies of the base vertex array. The bundled [`SineViseme`] is a single
//! oscillating "mouth open/close" approximation, not phoneme-accurate
//! lip-sync; other generators plug in through [`VisemeGenerator`].

use std::f64::consts::TAU;
use std::sync::Arc;

use avatar_assets::Mesh;
use avatar_core::{Axis, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One complete deformed copy of the base vertex array
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    vertices: Vec<Position>,
}

impl AnimationFrame {
    pub fn new(vertices: Vec<Position>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Position> {
        self.vertices
    }

    /// The vertex buffer as raw bytes, ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices.as_slice())
    }
}

/// An ordered, finite list of frames
pub type AnimationSequence = Vec<AnimationFrame>;

/// Produces mouth-movement frames for a piece of text
pub trait VisemeGenerator: Send {
    /// Build frames deforming `base` for `text` spoken over `duration_ms`.
    ///
    /// Empty text yields an empty sequence.
    fn generate(&self, base: &[Position], text: &str, duration_ms: u64) -> AnimationSequence;
}

/// Parameters of the sine-wave mouth model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisemeConfig {
    /// Upper bound on frames per character of text
    pub frames_per_char: usize,
    /// Milliseconds of duration budget per frame
    pub frame_interval_ms: u64,
    /// How many leading vertices form the mouth region
    pub mouth_vertex_count: usize,
    /// Peak displacement of the mouth region
    pub amplitude: f32,
    /// Axis the mouth region moves along
    pub axis: Axis,
}

impl Default for VisemeConfig {
    fn default() -> Self {
        Self {
            frames_per_char: 4,
            frame_interval_ms: 30,
            mouth_vertex_count: 10,
            amplitude: 0.1,
            axis: Axis::Y,
        }
    }
}

/// Placeholder viseme model: one sine period of vertical mouth motion
/// stretched over the whole utterance
#[derive(Debug, Clone, Default)]
pub struct SineViseme {
    pub config: VisemeConfig,
}

impl SineViseme {
    pub fn new(config: VisemeConfig) -> Self {
        Self { config }
    }

    /// `min(frames_per_char * chars, duration_ms / frame_interval_ms)`,
    /// or zero for empty text
    pub fn frame_count(&self, text: &str, duration_ms: u64) -> usize {
        let chars = text.chars().count();
        if chars == 0 {
            return 0;
        }
        let by_text = self.config.frames_per_char.saturating_mul(chars);
        let by_time = duration_ms / self.config.frame_interval_ms.max(1);
        by_text.min(usize::try_from(by_time).unwrap_or(usize::MAX))
    }

    /// Displacement applied to the mouth region in frame `index` of `count`
    pub fn amplitude_at(&self, index: usize, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let phase = TAU * index as f64 / count as f64;
        (phase.sin() * f64::from(self.config.amplitude)) as f32
    }
}

impl VisemeGenerator for SineViseme {
    fn generate(&self, base: &[Position], text: &str, duration_ms: u64) -> AnimationSequence {
        let count = self.frame_count(text, duration_ms);
        let mouth = self.config.mouth_vertex_count.min(base.len());
        let axis = self.config.axis.index();

        (0..count)
            .map(|index| {
                let amplitude = self.amplitude_at(index, count);
                let mut vertices = base.to_vec();
                for vertex in &mut vertices[..mouth] {
                    vertex[axis] += amplitude;
                }
                AnimationFrame::new(vertices)
            })
            .collect()
    }
}

/// Synthesizes frame sequences for the base mesh using a pluggable generator
pub struct VisemeFrameSynthesizer {
    mesh: Arc<Mesh>,
    generator: Box<dyn VisemeGenerator>,
}

impl VisemeFrameSynthesizer {
    pub fn new(mesh: Arc<Mesh>, generator: Box<dyn VisemeGenerator>) -> Self {
        Self { mesh, generator }
    }

    /// Synthesizer using the sine-wave placeholder model
    pub fn with_sine(mesh: Arc<Mesh>, config: VisemeConfig) -> Self {
        Self::new(mesh, Box::new(SineViseme::new(config)))
    }

    /// Frames for `text` over `duration_ms`. Empty when the text is empty or
    /// no mesh is loaded.
    pub fn synthesize(&self, text: &str, duration_ms: u64) -> AnimationSequence {
        if !self.mesh.is_loaded() {
            return Vec::new();
        }
        let frames = self.generator.generate(self.mesh.vertices(), text, duration_ms);
        debug!(
            "Synthesized {} viseme frames for {} chars over {} ms",
            frames.len(),
            text.chars().count(),
            duration_ms
        );
        frames
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_mesh(count: usize) -> Arc<Mesh> {
        let vertices = (0..count).map(|i| [i as f32, 0.0, 0.0]).collect();
        Arc::new(Mesh::new(vertices, Vec::new(), Vec::new(), Vec::new()))
    }

    #[test]
    fn test_frame_count_formula() {
        let sine = SineViseme::default();
        assert_eq!(sine.frame_count("Merhaba!", 400), 13);
        assert_eq!(sine.frame_count("hi", 10_000), 8);
        assert_eq!(sine.frame_count("hi", 29), 0);
        assert_eq!(sine.frame_count("", 10_000), 0);
    }

    #[test]
    fn test_frame_count_counts_chars_not_bytes() {
        let sine = SineViseme::default();
        // 4 chars, 8 bytes
        assert_eq!(sine.frame_count("çğış", 10_000), 16);
    }

    #[test]
    fn test_synthesize_concrete_case() {
        let synth = VisemeFrameSynthesizer::with_sine(grid_mesh(20), VisemeConfig::default());
        let frames = synth.synthesize("Merhaba!", 400);
        assert_eq!(frames.len(), 13);
        assert_eq!(synth.synthesize("Merhaba!", 400).len(), 13);
        for frame in &frames {
            assert_eq!(frame.vertices().len(), 20);
        }
    }

    #[test]
    fn test_empty_text_is_no_op() {
        let synth = VisemeFrameSynthesizer::with_sine(grid_mesh(5), VisemeConfig::default());
        assert!(synth.synthesize("", 5000).is_empty());
    }

    #[test]
    fn test_unloaded_mesh_yields_nothing() {
        let synth =
            VisemeFrameSynthesizer::with_sine(Arc::new(Mesh::empty()), VisemeConfig::default());
        assert!(synth.synthesize("hello", 5000).is_empty());
    }

    #[test]
    fn test_only_mouth_region_moves() {
        let mesh = grid_mesh(15);
        let synth = VisemeFrameSynthesizer::with_sine(Arc::clone(&mesh), VisemeConfig::default());
        let frames = synth.synthesize("abcd", 120);
        assert_eq!(frames.len(), 4);

        // frame 1 of 4 sits at the sine peak
        let frame = &frames[1];
        for (i, (moved, base)) in frame.vertices().iter().zip(mesh.vertices()).enumerate() {
            assert_eq!(moved[0], base[0]);
            assert_eq!(moved[2], base[2]);
            if i < 10 {
                assert!((moved[1] - 0.1).abs() < 1e-6);
            } else {
                assert_eq!(moved[1], base[1]);
            }
        }

        // frame 0 has zero amplitude
        assert_eq!(frames[0].vertices(), mesh.vertices());
        // the base mesh is untouched
        assert!(mesh.vertices().iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn test_small_mesh_mouth_region() {
        let mesh = grid_mesh(3);
        let synth = VisemeFrameSynthesizer::with_sine(mesh, VisemeConfig::default());
        let frames = synth.synthesize("abcd", 120);
        assert!(frames[1].vertices().iter().all(|v| (v[1] - 0.1).abs() < 1e-6));
    }

    #[test]
    fn test_custom_axis() {
        let config = VisemeConfig {
            axis: Axis::Z,
            ..Default::default()
        };
        let frames = SineViseme::new(config).generate(&[[0.0; 3]], "abcd", 120);
        assert!((frames[1].vertices()[0][2] - 0.1).abs() < 1e-6);
        assert_eq!(frames[1].vertices()[0][1], 0.0);
    }

    #[test]
    fn test_frame_bytes() {
        let frame = AnimationFrame::new(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(frame.as_bytes().len(), 24);
    }

    struct FixedGenerator;

    impl VisemeGenerator for FixedGenerator {
        fn generate(&self, base: &[Position], _text: &str, _duration_ms: u64) -> AnimationSequence {
            vec![AnimationFrame::new(base.to_vec())]
        }
    }

    #[test]
    fn test_custom_generator() {
        let synth = VisemeFrameSynthesizer::new(grid_mesh(2), Box::new(FixedGenerator));
        assert_eq!(synth.synthesize("anything", 0).len(), 1);
    }
}

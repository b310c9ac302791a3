//! Avatar application composition
//!
//! Owns every component and drives them from a single tick thread: speech
//! events are drained here, rotation and playback are ticked here, and
//! pointer gestures are routed here.

use std::sync::Arc;
use std::time::Duration;

use avatar_anim::{
    AnimationFrame, AnimationPlayer, PlaybackEvent, PointerEvent, RotationTransformEngine,
    VisemeFrameSynthesizer,
};
use avatar_assets::Mesh;
use avatar_core::{Normal, Position, TickClock};
use avatar_speech::{
    SpeechConfig, SpeechEngine, SpeechError, SpeechEvent, SpeechHandle, SpeechOutcome,
    SpeechSynthesisBridge,
};
use tracing::{debug, info, warn};

use crate::settings::AppSettings;

/// Something the display layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    SpeechStarted(SpeechHandle),
    SpeechFinished {
        handle: SpeechHandle,
        outcome: SpeechOutcome,
    },
    FrameChanged(usize),
    AnimationCompleted,
}

/// The animated, speaking avatar
pub struct AvatarApp {
    mesh: Arc<Mesh>,
    rotation: RotationTransformEngine,
    rotation_clock: TickClock,
    synthesizer: VisemeFrameSynthesizer,
    player: AnimationPlayer,
    speech: SpeechSynthesisBridge,
    speech_config: SpeechConfig,
    /// Frame currently on display; the base mesh when `None`
    displayed: Option<AnimationFrame>,
}

impl AvatarApp {
    pub fn new(
        settings: &AppSettings,
        mesh: Mesh,
        engine: impl SpeechEngine,
    ) -> Result<Self, SpeechError> {
        let mesh = Arc::new(mesh);
        let rotation = RotationTransformEngine::with_config(settings.viewer.clone());
        let rotation_clock =
            TickClock::new(Duration::from_millis(settings.viewer.tick_interval_ms));

        Ok(Self {
            synthesizer: VisemeFrameSynthesizer::with_sine(
                Arc::clone(&mesh),
                settings.viseme.clone(),
            ),
            mesh,
            rotation,
            rotation_clock,
            player: AnimationPlayer::with_config(settings.player.clone()),
            speech: SpeechSynthesisBridge::new(engine)?,
            speech_config: settings.speech.clone(),
            displayed: None,
        })
    }

    /// Speak `text` and animate the mouth along with it.
    ///
    /// The animation length comes from the per-character duration estimate,
    /// not from the synthesized audio.
    pub fn say(&mut self, text: &str) -> Result<SpeechHandle, SpeechError> {
        let duration_ms = self.speech_config.estimate_duration_ms(text);
        let frames = self.synthesizer.synthesize(text, duration_ms);
        info!(
            "Speaking {} chars, ~{} ms, {} frames",
            text.chars().count(),
            duration_ms,
            frames.len()
        );

        self.player.start(frames);
        self.speech.speak(text)
    }

    /// Advance everything by `dt` and report what happened
    pub fn update(&mut self, dt: Duration) -> Vec<AppEvent> {
        let mut events = Vec::new();

        for event in self.speech.poll_events() {
            match event {
                SpeechEvent::Started(handle) => {
                    debug!("Speech {} started", handle.id());
                    events.push(AppEvent::SpeechStarted(handle));
                }
                SpeechEvent::Finished { handle, outcome } => {
                    if let SpeechOutcome::Failed(reason) = &outcome {
                        warn!("Speech {} failed: {}", handle.id(), reason);
                    }
                    events.push(AppEvent::SpeechFinished { handle, outcome });
                }
            }
        }

        let interval = self.rotation_clock.interval();
        for _ in 0..self.rotation_clock.advance(dt) {
            self.rotation.tick(interval);
        }

        for event in self.player.update(dt) {
            match event {
                PlaybackEvent::FrameChanged { index, frame } => {
                    self.displayed = Some(frame);
                    events.push(AppEvent::FrameChanged(index));
                }
                PlaybackEvent::Completed => {
                    self.displayed = None;
                    events.push(AppEvent::AnimationCompleted);
                }
            }
        }

        events
    }

    /// Route a pointer gesture to the rotation engine
    pub fn pointer(&mut self, event: PointerEvent) {
        self.rotation.handle_pointer(event);
    }

    /// Vertices to draw now: the current frame (or base mesh), rotated and
    /// scaled
    pub fn displayed_vertices(&self) -> Vec<Position> {
        let source = match &self.displayed {
            Some(frame) => frame.vertices(),
            None => self.mesh.vertices(),
        };
        self.rotation.transform_vertices(source)
    }

    /// Base mesh normals under the current rotation
    pub fn displayed_normals(&self) -> Vec<Normal> {
        self.rotation.rotated_normals(self.mesh.normals())
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn rotation(&self) -> &RotationTransformEngine {
        &self.rotation
    }

    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    /// Whether speech is queued or in progress
    pub fn is_speaking(&self) -> bool {
        self.speech.is_busy()
    }

    /// Stop the mouth animation; speech already handed to the engine runs on
    pub fn stop_animation(&mut self) {
        self.player.stop();
        self.displayed = None;
    }
}

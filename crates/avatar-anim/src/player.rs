//! Timed frame playback

use std::time::Duration;

use avatar_core::TickClock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::viseme::{AnimationFrame, AnimationSequence};

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Frames per second
    pub fps: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

/// Player state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

/// Emitted by the player as ticks elapse
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A new frame should be displayed
    FrameChanged { index: usize, frame: AnimationFrame },
    /// The sequence ran to its end; the player is idle again
    Completed,
}

/// Steps through one frame sequence at a fixed rate.
///
/// Starting a new sequence while one is playing replaces it: the old
/// sequence is dropped without a [`PlaybackEvent::Completed`].
pub struct AnimationPlayer {
    config: PlayerConfig,
    state: PlaybackState,
    frames: AnimationSequence,
    cursor: usize,
    /// Present only while a sequence is scheduled
    clock: Option<TickClock>,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        Self {
            config,
            state: PlaybackState::Idle,
            frames: Vec::new(),
            cursor: 0,
            clock: None,
        }
    }

    /// Start playing `frames` at the configured rate
    pub fn start(&mut self, frames: AnimationSequence) {
        let fps = self.config.fps;
        self.start_with_fps(frames, fps);
    }

    /// Start playing `frames` at `fps`.
    ///
    /// An empty sequence is a silent no-op: nothing is scheduled, no event
    /// fires, and any sequence already playing continues.
    pub fn start_with_fps(&mut self, frames: AnimationSequence, fps: u32) {
        if frames.is_empty() {
            debug!("Ignoring empty animation sequence");
            return;
        }
        if self.state == PlaybackState::Playing {
            debug!(
                "Replacing animation at frame {}/{}",
                self.cursor,
                self.frames.len()
            );
        }

        debug!("Playing {} frames at {} fps", frames.len(), fps);
        self.frames = frames;
        self.cursor = 0;
        self.clock = Some(TickClock::from_rate(fps));
        self.state = PlaybackState::Playing;
    }

    /// Cancel playback without emitting [`PlaybackEvent::Completed`]
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            debug!("Animation stopped at frame {}/{}", self.cursor, self.frames.len());
        }
        self.reset_to_idle();
    }

    /// Run one scheduled tick.
    ///
    /// Emits the frame under the cursor and advances; the tick that finds
    /// the cursor past the last frame emits `Completed` and goes idle.
    pub fn tick(&mut self) -> Option<PlaybackEvent> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        match self.frames.get(self.cursor) {
            Some(frame) => {
                let event = PlaybackEvent::FrameChanged {
                    index: self.cursor,
                    frame: frame.clone(),
                };
                self.cursor += 1;
                Some(event)
            }
            None => {
                debug!("Animation completed after {} frames", self.frames.len());
                self.reset_to_idle();
                Some(PlaybackEvent::Completed)
            }
        }
    }

    /// Advance the schedule by `dt` and run every tick that became due
    pub fn update(&mut self, dt: Duration) -> Vec<PlaybackEvent> {
        let Some(clock) = self.clock.as_mut() else {
            return Vec::new();
        };

        let steps = clock.advance(dt);
        let mut events = Vec::new();
        for _ in 0..steps {
            match self.tick() {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Whether a periodic tick is currently scheduled
    pub fn is_scheduled(&self) -> bool {
        self.clock.is_some()
    }

    /// Tick interval of the current schedule
    pub fn tick_interval(&self) -> Option<Duration> {
        self.clock.as_ref().map(TickClock::interval)
    }

    /// Number of frames in the current sequence
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The most recently emitted frame
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.cursor.checked_sub(1).and_then(|i| self.frames.get(i))
    }

    /// Fraction of frames emitted, in `[0, 1]`. Zero when idle.
    pub fn progress(&self) -> f32 {
        if self.frames.is_empty() {
            return 0.0;
        }
        self.cursor as f32 / self.frames.len() as f32
    }

    fn reset_to_idle(&mut self) {
        self.frames = Vec::new();
        self.cursor = 0;
        self.clock = None;
        self.state = PlaybackState::Idle;
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which engine performs the synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SpeechBackend {
    /// An espeak-compatible command line synthesizer
    Command { program: String },
    /// No audio; each utterance just takes its estimated duration
    Silent,
}

/// Speech configuration. Maps to the `[speech]` table of the app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speaking rate in words per minute
    pub rate: u32,
    /// Volume multiplier (0.0–1.0)
    pub volume: f32,
    /// Preferred voice name, engine default when `None`
    pub voice: Option<String>,
    /// Milliseconds of speech assumed per character of text
    pub ms_per_char: u64,
    pub backend: SpeechBackend,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 150,
            volume: 1.0,
            voice: Some("tr".into()),
            ms_per_char: 50,
            backend: SpeechBackend::Command {
                program: "espeak-ng".into(),
            },
        }
    }
}

impl SpeechConfig {
    /// Volume clamped to `[0, 1]`
    pub fn effective_volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }

    /// Heuristic speaking time for `text`: characters times `ms_per_char`.
    ///
    /// Not measured from synthesized audio, so animation sized from it only
    /// roughly tracks the voice.
    pub fn estimate_duration_ms(&self, text: &str) -> u64 {
        (text.chars().count() as u64).saturating_mul(self.ms_per_char)
    }

    pub fn estimate_duration(&self, text: &str) -> Duration {
        Duration::from_millis(self.estimate_duration_ms(text))
    }
}

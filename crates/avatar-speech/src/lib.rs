//! Avatar Speech - Text-to-speech off the tick thread
//!
//! Runs blocking TTS calls on a dedicated worker and reports their lifecycle
//! back through a queue drained by the tick loop.

mod bridge;
mod config;
mod engine;
mod error;

pub use bridge::{SpeechEvent, SpeechHandle, SpeechOutcome, SpeechSynthesisBridge};
pub use config::{SpeechBackend, SpeechConfig};
pub use engine::{engine_from_config, CommandSpeechEngine, SilentSpeechEngine, SpeechEngine};
pub use error::SpeechError;

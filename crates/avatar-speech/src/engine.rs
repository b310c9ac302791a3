use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{SpeechBackend, SpeechConfig};
use crate::error::SpeechError;

/// A blocking text-to-speech engine.
///
/// `say` returns once the utterance has finished playing. Engines are moved
/// onto the speech worker thread, hence `Send`.
pub trait SpeechEngine: Send + 'static {
    fn say(&mut self, text: &str) -> Result<(), SpeechError>;
}

/// Build the engine selected by `config.backend`
pub fn engine_from_config(config: &SpeechConfig) -> Box<dyn SpeechEngine> {
    match &config.backend {
        SpeechBackend::Command { program } => {
            Box::new(CommandSpeechEngine::new(program.clone(), config))
        }
        SpeechBackend::Silent => Box::new(SilentSpeechEngine::new(config.ms_per_char)),
    }
}

impl SpeechEngine for Box<dyn SpeechEngine> {
    fn say(&mut self, text: &str) -> Result<(), SpeechError> {
        (**self).say(text)
    }
}

/// Speaks through an espeak-compatible program (`espeak`, `espeak-ng`),
/// feeding the text on stdin
#[derive(Debug, Clone)]
pub struct CommandSpeechEngine {
    program: String,
    rate: u32,
    volume: f32,
    voice: Option<String>,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>, config: &SpeechConfig) -> Self {
        Self {
            program: program.into(),
            rate: config.rate,
            volume: config.effective_volume(),
            voice: config.voice.clone(),
        }
    }

    /// Command line arguments for one utterance
    fn args(&self) -> Vec<String> {
        // espeak amplitude runs 0..=200 with 100 as the nominal level
        let amplitude = (self.volume * 100.0).round() as u32;
        let mut args = vec![
            "-s".to_string(),
            self.rate.to_string(),
            "-a".to_string(),
            amplitude.to_string(),
        ];
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("--stdin".to_string());
        args
    }
}

impl SpeechEngine for CommandSpeechEngine {
    fn say(&mut self, text: &str) -> Result<(), SpeechError> {
        debug!("Running '{}' for {} chars", self.program, text.chars().count());

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(SpeechError::Spawn)?;

        // The child is always waited on, even when it stops reading early
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| SpeechError::EngineFailed(e.to_string()))?;

        if !output.status.success() {
            return Err(SpeechError::EngineExit {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        write_result.map_err(|e| {
            warn!("'{}' stopped reading its input: {}", self.program, e);
            SpeechError::EngineFailed(e.to_string())
        })
    }
}

/// Produces no audio; blocks for the estimated speaking time so the
/// started/finished lifecycle still spans the utterance
#[derive(Debug, Clone)]
pub struct SilentSpeechEngine {
    ms_per_char: u64,
}

impl SilentSpeechEngine {
    pub fn new(ms_per_char: u64) -> Self {
        Self { ms_per_char }
    }
}

impl SpeechEngine for SilentSpeechEngine {
    fn say(&mut self, text: &str) -> Result<(), SpeechError> {
        let ms = (text.chars().count() as u64).saturating_mul(self.ms_per_char);
        thread::sleep(Duration::from_millis(ms));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args() {
        let engine = CommandSpeechEngine::new("espeak-ng", &SpeechConfig::default());
        assert_eq!(engine.args(), ["-s", "150", "-a", "100", "-v", "tr", "--stdin"]);
    }

    #[test]
    fn test_command_args_without_voice() {
        let config = SpeechConfig {
            voice: None,
            volume: 0.5,
            rate: 180,
            ..Default::default()
        };
        let engine = CommandSpeechEngine::new("espeak", &config);
        assert_eq!(engine.args(), ["-s", "180", "-a", "50", "--stdin"]);
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let mut engine =
            CommandSpeechEngine::new("definitely-not-a-tts-binary", &SpeechConfig::default());
        assert!(matches!(engine.say("hello"), Err(SpeechError::Spawn(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_status() {
        // `false` never reads its input and exits with status 1
        let mut engine = CommandSpeechEngine::new("false", &SpeechConfig::default());
        let text = "a".repeat(1 << 20);
        match engine.say(&text) {
            Err(SpeechError::EngineExit { status, .. }) => assert_eq!(status, Some(1)),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unread_input_is_an_error() {
        let mut engine = CommandSpeechEngine::new("true", &SpeechConfig::default());
        let text = "a".repeat(1 << 20);
        assert!(matches!(engine.say(&text), Err(SpeechError::EngineFailed(_))));
    }

    #[test]
    fn test_silent_engine() {
        let mut engine = SilentSpeechEngine::new(0);
        assert!(engine.say("hello").is_ok());
    }

    #[test]
    fn test_engine_from_config() {
        let config = SpeechConfig {
            backend: SpeechBackend::Silent,
            ms_per_char: 0,
            ..Default::default()
        };
        let mut engine = engine_from_config(&config);
        assert!(engine.say("quiet").is_ok());
    }
}

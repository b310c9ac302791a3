/// Errors that can occur in the speech system.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech worker is not running")]
    WorkerUnavailable,

    #[error("failed to start speech process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("speech process exited with {status:?}: {stderr}")]
    EngineExit { status: Option<i32>, stderr: String },

    #[error("speech engine failed: {0}")]
    EngineFailed(String),
}

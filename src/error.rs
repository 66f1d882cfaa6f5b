use std::io;

/// Errors raised while talking to the scheduler or the external tools.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("dependency missing: {0}")]
    DependencyMissing(String),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("scheduler exited with {code:?}: {stderr}")]
    SchedulerExit { code: Option<i32>, stderr: String },
    #[error("scheduler returned an invalid count: {0:?}")]
    InvalidCount(String),
    #[error("scheduler returned an unexpected response: {0:?}")]
    MalformedResponse(String),
    #[error("scheduler returned a malformed item: {0}")]
    MalformedItem(String),
    #[error("an item needs at least one question and one answer")]
    EmptyItem,
    #[error("unknown grade: {0:?}")]
    UnknownGrade(String),
    #[error("capture cancelled")]
    CaptureCancelled,
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

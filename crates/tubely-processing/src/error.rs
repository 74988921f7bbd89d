use std::time::Duration;
use tubely_core::AppError;

/// Failures of the external media tools.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Invalid media path: {0}")]
    InvalidPath(String),

    #[error("Failed to execute {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} did not finish within {}s", .timeout.as_secs())]
    Timeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("ffprobe failed: {0}")]
    ProbeExecution(String),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(String),

    #[error("No video stream found")]
    NoStreamFound,

    #[error("ffmpeg failed: {0}")]
    RemuxExecution(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        AppError::MediaProcessing(err.to_string())
    }
}

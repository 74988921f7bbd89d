use super::command::{run_to_completion, validate_executable, validate_media_path};
use crate::error::ProcessingError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    display_aspect_ratio: Option<String>,
}

/// Extract the display aspect ratio of the first stream from ffprobe's JSON.
///
/// A stream without `display_aspect_ratio` yields an empty string, which the
/// classifier files under "other".
pub fn parse_probe_output(stdout: &[u8]) -> Result<String, ProcessingError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProcessingError::ProbeParse(e.to_string()))?;

    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or(ProcessingError::NoStreamFound)?;

    Ok(stream.display_aspect_ratio.unwrap_or_default())
}

/// Runs ffprobe against a staged file.
#[derive(Debug, Clone)]
pub struct VideoProbe {
    ffprobe_path: String,
    timeout: Option<Duration>,
}

impl VideoProbe {
    pub fn new(ffprobe_path: String, timeout: Option<Duration>) -> Result<Self, ProcessingError> {
        validate_executable("ffprobe", &ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn aspect_ratio(&self, video_path: &Path) -> Result<String, ProcessingError> {
        let start = std::time::Instant::now();
        validate_media_path(video_path)?;

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(video_path);

        let output = run_to_completion("ffprobe", command, self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(status = %output.status, stderr = %stderr.trim(), "ffprobe exited with failure");
            return Err(ProcessingError::ProbeExecution(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let aspect_ratio = parse_probe_output(&output.stdout)?;

        tracing::debug!(
            aspect_ratio = %aspect_ratio,
            duration_ms = start.elapsed().as_millis() as u64,
            "Probed video"
        );

        Ok(aspect_ratio)
    }
}

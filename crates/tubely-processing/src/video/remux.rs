use super::command::{run_to_completion, validate_executable, validate_media_path};
use crate::error::ProcessingError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Where the fast-start copy of `input` is written: `<input>-faststart.mp4`.
pub fn faststart_output_path(input: &Path) -> PathBuf {
    let mut output = input.as_os_str().to_owned();
    output.push("-faststart.mp4");
    PathBuf::from(output)
}

/// Moves the MP4 index (moov atom) to the front of the file with ffmpeg,
/// copying every stream without re-encoding.
#[derive(Debug, Clone)]
pub struct FastStartRemuxer {
    ffmpeg_path: String,
    timeout: Option<Duration>,
}

impl FastStartRemuxer {
    pub fn new(ffmpeg_path: String, timeout: Option<Duration>) -> Result<Self, ProcessingError> {
        validate_executable("ffmpeg", &ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    /// Returns the path of the new file. The input is left untouched.
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input_path: &Path) -> Result<PathBuf, ProcessingError> {
        let start = std::time::Instant::now();
        validate_media_path(input_path)?;
        let output_path = faststart_output_path(input_path);

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(["-nostdin", "-v", "error", "-y", "-i"])
            .arg(input_path)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path);

        let output = run_to_completion("ffmpeg", command, self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(status = %output.status, stderr = %stderr.trim(), "ffmpeg exited with failure");
            return Err(ProcessingError::RemuxExecution(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::debug!(
            output = %output_path.display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Remuxed video for fast start"
        );

        Ok(output_path)
    }
}

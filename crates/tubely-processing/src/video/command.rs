use crate::error::ProcessingError;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

/// Reject media paths that could be misread by the tools: shell metacharacters,
/// directory traversal, or a file name that looks like a command-line option.
pub(crate) fn validate_media_path(path: &Path) -> Result<(), ProcessingError> {
    let path_str = path.to_string_lossy();

    if path_str.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(ProcessingError::InvalidPath(format!(
            "path contains dangerous characters: {}",
            path_str
        )));
    }

    if path_str.contains("..") {
        return Err(ProcessingError::InvalidPath(format!(
            "path contains directory traversal: {}",
            path_str
        )));
    }

    let starts_with_dash = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('-'))
        .unwrap_or(true);
    if starts_with_dash {
        return Err(ProcessingError::InvalidPath(format!(
            "path has no usable file name: {}",
            path_str
        )));
    }

    Ok(())
}

/// Executable paths come from configuration; only plain path characters are allowed.
pub(crate) fn validate_executable(tool: &'static str, executable: &str) -> Result<(), ProcessingError> {
    let safe = !executable.is_empty()
        && executable
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '\\'));

    if !safe {
        return Err(ProcessingError::InvalidPath(format!(
            "invalid {} executable path: {}",
            tool, executable
        )));
    }
    Ok(())
}

/// Run a tool to completion, killing it if the deadline passes first.
pub(crate) async fn run_to_completion(
    tool: &'static str,
    mut command: Command,
    deadline: Option<Duration>,
) -> Result<Output, ProcessingError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match deadline {
        Some(timeout) => tokio::time::timeout(timeout, command.output())
            .await
            .map_err(|_| {
                tracing::warn!(tool, timeout_secs = timeout.as_secs(), "Media tool timed out, killing process");
                ProcessingError::Timeout { tool, timeout }
            })?,
        None => command.output().await,
    };

    output.map_err(|source| ProcessingError::Spawn { tool, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_media_path() {
        assert!(validate_media_path(Path::new("/tmp/.tmpA1b2C3")).is_ok());
        assert!(validate_media_path(Path::new("/tmp/upload-faststart.mp4")).is_ok());
        assert!(validate_media_path(Path::new("/tmp/a;rm -rf")).is_err());
        assert!(validate_media_path(Path::new("/tmp/../etc/passwd")).is_err());
        assert!(validate_media_path(Path::new("/tmp/-version")).is_err());
        assert!(validate_media_path(&PathBuf::from("/")).is_err());
    }

    #[test]
    fn test_validate_executable() {
        assert!(validate_executable("ffprobe", "ffprobe").is_ok());
        assert!(validate_executable("ffmpeg", "/usr/local/bin/ffmpeg").is_ok());
        assert!(validate_executable("ffmpeg", "ffmpeg; curl evil").is_err());
        assert!(validate_executable("ffmpeg", "").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let command = Command::new("tubely-definitely-not-installed");
        let result = run_to_completion("ffprobe", command, None).await;
        assert!(matches!(result, Err(ProcessingError::Spawn { tool: "ffprobe", .. })));
    }

    #[tokio::test]
    async fn test_deadline_kills_slow_tool() {
        let mut command = Command::new("sleep");
        command.arg("5");

        let start = std::time::Instant::now();
        let result = run_to_completion("ffmpeg", command, Some(Duration::from_millis(100))).await;

        assert!(matches!(result, Err(ProcessingError::Timeout { tool: "ffmpeg", .. })));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fast_tool_finishes_within_deadline() {
        let command = Command::new("true");
        let output = run_to_completion("ffprobe", command, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(output.status.success());
    }
}

use tempfile::TempPath;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tubely_core::{AppError, UploadLimits};

const CHUNK_SIZE: usize = 64 * 1024;

/// An upload copied to local disk. The file is removed when this is dropped.
pub(crate) struct StagedUpload {
    pub path: TempPath,
    pub size: u64,
}

/// Copy `body` into a fresh temporary file under the configured temp dir,
/// enforcing the size ceiling while streaming.
pub(crate) async fn stage_upload<R>(body: &mut R, limits: &UploadLimits) -> Result<StagedUpload, AppError>
where
    R: AsyncRead + Unpin,
{
    let temp_file = tempfile::Builder::new()
        .prefix("tubely-upload-")
        .tempfile_in(&limits.temp_dir)
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;

    // From here on, dropping `path` deletes the staged file on every return path.
    let (std_file, path) = temp_file.into_parts();
    let mut file = tokio::fs::File::from_std(std_file);

    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut size: u64 = 0;

    loop {
        let read = body
            .read(&mut buffer)
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload body: {}", e)))?;
        if read == 0 {
            break;
        }

        size += read as u64;
        if size > limits.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Video exceeds the maximum size of {} bytes",
                limits.max_upload_bytes
            )));
        }

        file.write_all(&buffer[..read]).await?;
    }

    file.flush().await?;

    Ok(StagedUpload { path, size })
}

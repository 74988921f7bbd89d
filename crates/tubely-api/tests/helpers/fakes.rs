//! In-process stand-ins for the external collaborators.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncReadExt;
use tubely_core::{AppError, StorageBackend, Video};
use tubely_db::VideoStore;
use tubely_processing::{faststart_output_path, MediaToolkit, ProcessingError};
use tubely_storage::{ObjectReader, Storage, StorageError, StorageResult};
use uuid::Uuid;

pub const PUBLIC_BASE_URL: &str = "https://tubely-test.s3.us-east-1.amazonaws.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Probe(PathBuf),
    Remux(PathBuf),
}

enum ProbeOutcome {
    AspectRatio(String),
    Fail,
}

/// Canned ffprobe/ffmpeg behavior. Remuxing copies the staged file to the
/// fast-start path, exactly where the real tool would write it.
pub struct FakeToolkit {
    probe: ProbeOutcome,
    remux_fails: bool,
    custom_output: bool,
    calls: Mutex<Vec<ToolCall>>,
}

impl FakeToolkit {
    pub fn with_aspect_ratio(aspect_ratio: &str) -> Self {
        Self {
            probe: ProbeOutcome::AspectRatio(aspect_ratio.to_string()),
            remux_fails: false,
            custom_output: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_probe() -> Self {
        Self {
            probe: ProbeOutcome::Fail,
            remux_fails: false,
            custom_output: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Probes fine, then ffmpeg "crashes" after writing a partial output file.
    pub fn failing_remux(aspect_ratio: &str) -> Self {
        Self {
            remux_fails: true,
            ..Self::with_aspect_ratio(aspect_ratio)
        }
    }

    /// Remuxes successfully but writes next to the input under its own name.
    pub fn with_custom_output(aspect_ratio: &str) -> Self {
        Self {
            custom_output: true,
            ..Self::with_aspect_ratio(aspect_ratio)
        }
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ToolCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaToolkit for FakeToolkit {
    async fn probe_aspect_ratio(&self, path: &Path) -> Result<String, ProcessingError> {
        self.record(ToolCall::Probe(path.to_path_buf()));
        assert!(path.exists(), "probe must run against a staged file");

        match &self.probe {
            ProbeOutcome::AspectRatio(ratio) => Ok(ratio.clone()),
            ProbeOutcome::Fail => Err(ProcessingError::ProbeExecution(
                "exit status: 1: Invalid data found when processing input".to_string(),
            )),
        }
    }

    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        self.record(ToolCall::Remux(input.to_path_buf()));
        let output = if self.custom_output {
            PathBuf::from(format!("{}.remuxed.mp4", input.display()))
        } else {
            faststart_output_path(input)
        };

        if self.remux_fails {
            tokio::fs::write(&output, b"partial")
                .await
                .map_err(|e| ProcessingError::RemuxExecution(e.to_string()))?;
            return Err(ProcessingError::RemuxExecution(
                "exit status: 1: moov atom not found".to_string(),
            ));
        }

        tokio::fs::copy(input, &output)
            .await
            .map_err(|e| ProcessingError::RemuxExecution(e.to_string()))?;
        Ok(output)
    }
}

#[derive(Debug, Clone)]
pub struct PutCall {
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Object store that keeps every `put` in memory.
#[derive(Default)]
pub struct RecordingStorage {
    puts: Mutex<Vec<PutCall>>,
    fail_puts: bool,
}

impl RecordingStorage {
    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        mut reader: ObjectReader,
    ) -> StorageResult<u64> {
        if self.fail_puts {
            return Err(StorageError::UploadFailed("connection reset by peer".to_string()));
        }

        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;
        let size = body.len() as u64;

        self.puts.lock().unwrap().push(PutCall {
            key: storage_key.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(size)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE_URL, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Record store backed by a map.
#[derive(Default)]
pub struct InMemoryVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: bool,
}

impl InMemoryVideoStore {
    pub fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Video, AppError> {
        self.get(id)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates {
            return Err(AppError::Internal("record store unavailable".to_string()));
        }

        let mut videos = self.videos.lock().unwrap();
        if !videos.contains_key(&video.id) {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }
}

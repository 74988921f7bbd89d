use super::probe::VideoProbe;
use super::remux::FastStartRemuxer;
use crate::error::ProcessingError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tubely_core::Config;

/// The external media capabilities the upload pipeline relies on.
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Display aspect ratio of the first video stream, e.g. `"16:9"`.
    async fn probe_aspect_ratio(&self, path: &Path) -> Result<String, ProcessingError>;

    /// Write a fast-start copy of `input` and return its path.
    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, ProcessingError>;
}

/// [`MediaToolkit`] backed by the ffprobe and ffmpeg binaries.
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    probe: VideoProbe,
    remuxer: FastStartRemuxer,
}

impl FfmpegToolkit {
    pub fn new(probe: VideoProbe, remuxer: FastStartRemuxer) -> Self {
        Self { probe, remuxer }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProcessingError> {
        Ok(Self::new(
            VideoProbe::new(config.ffprobe_path.clone(), config.media_tool_timeout)?,
            FastStartRemuxer::new(config.ffmpeg_path.clone(), config.media_tool_timeout)?,
        ))
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn probe_aspect_ratio(&self, path: &Path) -> Result<String, ProcessingError> {
        self.probe.aspect_ratio(path).await
    }

    async fn remux_faststart(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        self.remuxer.remux(input).await
    }
}

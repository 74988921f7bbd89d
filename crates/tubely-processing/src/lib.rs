//! Media processing for uploaded videos
//!
//! Wraps the external `ffprobe` and `ffmpeg` binaries. The upload pipeline only
//! depends on the [`MediaToolkit`] trait so that tests can swap in canned
//! results instead of spawning real processes.

pub mod error;
pub mod video;

pub use error::ProcessingError;
pub use video::{
    faststart_output_path, parse_probe_output, FastStartRemuxer, FfmpegToolkit, MediaToolkit,
    VideoProbe,
};

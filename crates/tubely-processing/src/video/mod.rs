//! Video inspection and fast-start remuxing

mod command;
mod probe;
mod remux;
mod toolkit;

pub use probe::{parse_probe_output, VideoProbe};
pub use remux::{faststart_output_path, FastStartRemuxer};
pub use toolkit::{FfmpegToolkit, MediaToolkit};

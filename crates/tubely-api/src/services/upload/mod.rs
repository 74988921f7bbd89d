//! Video upload pipeline
//!
//! Validate, stage, probe, classify, remux, store and record an uploaded
//! video within a single request.

mod orchestrator;
mod staging;

pub use orchestrator::{UploadOrchestrator, UploadRequest, UploadStage};

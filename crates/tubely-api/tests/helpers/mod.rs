//! Test helpers: build the router around in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p tubely-api`.

#![allow(dead_code)]

pub mod fakes;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use fakes::{FakeToolkit, InMemoryVideoStore, RecordingStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtAuthenticator;
use tubely_api::services::upload::UploadOrchestrator;
use tubely_api::setup::routes::setup_routes;
use tubely_api::state::AppState;
use tubely_core::{UploadLimits, Video};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "tubely-integration-test-secret-0123456789";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Bytes that stand in for an MP4; the fake toolkit never parses them.
pub const FAKE_MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42\x00\x00\x00\x00mp42isomfake-video-payload";

pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoStore>,
    pub storage: Arc<RecordingStorage>,
    pub toolkit: Arc<FakeToolkit>,
    pub auth: JwtAuthenticator,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.auth
            .issue_token(user_id, chrono::Duration::hours(1))
            .expect("Failed to issue test token")
    }

    /// Seed a video record owned by `user_id`.
    pub fn seed_video(&self, user_id: Uuid) -> Video {
        let video = Video::new(user_id, "Boots", "Some boots");
        self.videos.insert(video.clone());
        video
    }

    /// Everything left in the upload temp dir.
    pub fn temp_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.temp_dir.path())
            .expect("Failed to read temp dir")
            .map(|entry| entry.expect("Failed to read dir entry").path())
            .collect()
    }
}

pub struct TestAppBuilder {
    toolkit: FakeToolkit,
    storage: RecordingStorage,
    videos: InMemoryVideoStore,
    max_upload_bytes: u64,
    production: bool,
}

impl TestAppBuilder {
    pub fn toolkit(mut self, toolkit: FakeToolkit) -> Self {
        self.toolkit = toolkit;
        self
    }

    pub fn storage(mut self, storage: RecordingStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn videos(mut self, videos: InMemoryVideoStore) -> Self {
        self.videos = videos;
        self
    }

    pub fn max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn build(self) -> TestApp {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let videos = Arc::new(self.videos);
        let storage = Arc::new(self.storage);
        let toolkit = Arc::new(self.toolkit);
        let auth = JwtAuthenticator::new(TEST_JWT_SECRET);

        let uploads = UploadOrchestrator::new(
            videos.clone(),
            storage.clone(),
            toolkit.clone(),
            UploadLimits::new(self.max_upload_bytes, temp_dir.path()),
        );
        let state = Arc::new(AppState::new(auth.clone(), uploads, self.production));

        let server = TestServer::new(setup_routes(state).into_make_service())
            .expect("Failed to create test server");

        TestApp {
            server,
            videos,
            storage,
            toolkit,
            auth,
            temp_dir,
        }
    }
}

pub fn test_app() -> TestAppBuilder {
    TestAppBuilder {
        toolkit: FakeToolkit::with_aspect_ratio("16:9"),
        storage: RecordingStorage::default(),
        videos: InMemoryVideoStore::default(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        production: false,
    }
}

pub fn upload_path(video_id: Uuid) -> String {
    format!("/api/video_upload/{}", video_id)
}

pub fn video_form(data: &[u8], mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data.to_vec()))
        .file_name("boots.mp4")
        .mime_type(mime_type);
    MultipartForm::new().add_part("video", part)
}

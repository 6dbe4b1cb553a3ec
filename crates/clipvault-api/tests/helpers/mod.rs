//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p clipvault-api`. Records live in the in-process
//! repository and the S3 backend talks to an in-memory object store, so no external
//! services are needed.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::{TestResponse, TestServer};
use bytes::Bytes;
use clipvault_api::auth::JwtService;
use clipvault_api::setup::{routes, services};
use clipvault_api::state::SlotState;
use clipvault_core::{AssetSlot, Config, StorageBackend, Video};
use clipvault_db::{InMemoryVideoRepository, VideoRepository};
use clipvault_storage::{create_storage, AssetStorage, S3Storage, STAGING_DIR};
use futures::TryStreamExt;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore, ObjectStoreExt};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const TEST_PUBLIC_BASE_URL: &str = "http://localhost:8091";
pub const TEST_BUCKET: &str = "clipvault-test";
pub const TEST_REGION: &str = "us-east-1";

/// Both slot ceilings are lowered to 1 MiB in tests.
pub const TEST_CEILING_BYTES: usize = 1024 * 1024;

/// Test application: server, record store, remote store and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<InMemoryVideoRepository>,
    pub jwt: JwtService,
    pub remote: Arc<InMemory>,
    pub asset_root: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a video owned by `owner` and return it.
    pub async fn seed_video(&self, owner: Uuid) -> Video {
        self.videos
            .create(&Video::new(owner, "Test video", None))
            .await
            .expect("Failed to seed video")
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.videos
            .get(id)
            .await
            .expect("Failed to read video")
            .expect("Video should exist")
    }

    /// Files currently waiting in the staging area.
    pub fn staged_files(&self) -> usize {
        match std::fs::read_dir(self.asset_root.join(STAGING_DIR)) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    pub async fn remote_objects(&self) -> Vec<ObjectMeta> {
        self.remote
            .list(None)
            .try_collect()
            .await
            .expect("Failed to list remote objects")
    }

    pub async fn remote_object(&self, key: &str) -> Bytes {
        self.remote
            .get(&ObjectPath::from(key))
            .await
            .expect("Remote object should exist")
            .bytes()
            .await
            .expect("Failed to read remote object")
    }
}

/// POST a multipart body, optionally with an `Authorization` header value.
pub async fn post_multipart(
    server: &TestServer,
    path: &str,
    authorization: Option<String>,
    parts: &[fixtures::Part<'_>],
) -> TestResponse {
    let mut request = server
        .post(path)
        .content_type(&fixtures::multipart_content_type())
        .bytes(fixtures::multipart_body(parts));
    if let Some(value) = authorization {
        request = request.add_header("Authorization", value);
    }
    request.await
}

/// App with the default slot backends: thumbnails in memory, videos staged to S3.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// App with extra configuration on top of the test defaults.
pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let asset_root = temp_dir.path().join("assets");

    let config = create_test_config(&asset_root, overrides);
    let videos = Arc::new(InMemoryVideoRepository::new());
    let remote = Arc::new(InMemory::new());

    let thumbnail = slot_state(&config, AssetSlot::Thumbnail, &remote).await;
    let video = slot_state(&config, AssetSlot::Video, &remote).await;

    let state = services::initialize_services(&config, videos.clone(), thumbnail, video);
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        jwt: JwtService::new(TEST_JWT_SECRET, 1),
        remote,
        asset_root,
        _temp_dir: temp_dir,
    }
}

/// S3 slots get the in-memory object store; everything else is built from config.
async fn slot_state(config: &Config, slot: AssetSlot, remote: &Arc<InMemory>) -> SlotState {
    let slot_config = config.slot(slot).clone();
    let storage: Arc<dyn AssetStorage> = match slot_config.backend {
        StorageBackend::S3 => Arc::new(
            S3Storage::with_store(
                remote.clone() as Arc<dyn ObjectStore>,
                TEST_BUCKET.to_string(),
                TEST_REGION.to_string(),
                None,
                config.asset_root().join(STAGING_DIR),
            )
            .await
            .expect("Failed to create S3 storage"),
        ),
        _ => create_storage(config, &slot_config)
            .await
            .expect("Failed to create storage"),
    };
    SlotState::new(slot_config, storage)
}

fn create_test_config(asset_root: &std::path::Path, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PUBLIC_BASE_URL", TEST_PUBLIC_BASE_URL),
        ("THUMBNAIL_STORAGE_BACKEND", "memory"),
        ("VIDEO_STORAGE_BACKEND", "s3"),
        ("S3_BUCKET", TEST_BUCKET),
        ("S3_REGION", TEST_REGION),
        ("MAX_THUMBNAIL_SIZE_MB", "1"),
        ("MAX_VIDEO_SIZE_MB", "1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.insert(
        "ASSET_ROOT".to_string(),
        asset_root.to_string_lossy().into_owned(),
    );
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    let config = Config::from_lookup(move |key| vars.get(key).cloned())
        .expect("Failed to build test config");
    config.validate().expect("Test config should be valid");
    config
}

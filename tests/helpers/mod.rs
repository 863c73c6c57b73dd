//! Test helpers: build AppState and router with in-memory collaborators.
//!
//! Nothing here spawns ffmpeg or talks to S3/Postgres. Each `TestApp` owns its
//! own upload directory so tests can assert that no artifact outlives a request.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use clipstore::app::create_app;
use clipstore::config::settings::AppConfig;
use clipstore::infrastructure::media::{MediaError, MediaToolkit, ProbeReport};
use clipstore::infrastructure::storage::{ObjectStore, StorageError, StorageResult};
use clipstore::middleware::auth::TokenClaims;
use clipstore::modules::video::model::Video;
use clipstore::modules::video::repository::{RepositoryResult, VideoRepository};
use clipstore::state::AppState;
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_BUCKET: &str = "test-bucket";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const BOUNDARY: &str = "clipstore-test-boundary";

// --- repository ---

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    /// Conditional updates match no row, as if the record was deleted right
    /// after the ownership check.
    pub updates_miss: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create(&self, video: &Video) -> RepositoryResult<Video> {
        self.insert(video.clone());
        Ok(video.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Video>> {
        Ok(self.get(id))
    }

    async fn list_by_owner(&self, user_id: Uuid) -> RepositoryResult<Vec<Video>> {
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by_key(|v| v.created_at);
        Ok(videos)
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        owner: Uuid,
        locator: &str,
    ) -> RepositoryResult<Option<Video>> {
        if self.updates_miss.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut videos = self.videos.lock().unwrap();
        Ok(videos.get_mut(&id).filter(|v| v.user_id == owner).map(|v| {
            v.video_url = Some(locator.to_string());
            v.clone()
        }))
    }

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        owner: Uuid,
        url: &str,
    ) -> RepositoryResult<Option<Video>> {
        if self.updates_miss.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let mut videos = self.videos.lock().unwrap();
        Ok(videos.get_mut(&id).filter(|v| v.user_id == owner).map(|v| {
            v.thumbnail_url = Some(url.to_string());
            v.clone()
        }))
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> RepositoryResult<bool> {
        let mut videos = self.videos.lock().unwrap();
        match videos.get(&id) {
            Some(v) if v.user_id == owner => {
                videos.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// --- media toolkit ---

#[derive(Clone, Debug)]
pub enum ProbeScript {
    Report(ProbeReport),
    NoVideoStream,
    Fails,
}

/// Remux copies input to output (or fails); probe returns a canned report.
pub struct ScriptedMedia {
    pub remux_fails: bool,
    pub remux_hangs: bool,
    pub probe: ProbeScript,
    pub remux_calls: AtomicUsize,
    pub probe_calls: AtomicUsize,
    pub seen_paths: Mutex<Vec<PathBuf>>,
}

impl ScriptedMedia {
    pub fn with_dimensions(width: u32, height: u32) -> Self {
        Self::new(false, ProbeScript::Report(ProbeReport::single_video(width, height)))
    }

    pub fn new(remux_fails: bool, probe: ProbeScript) -> Self {
        Self {
            remux_fails,
            remux_hangs: false,
            probe,
            remux_calls: AtomicUsize::new(0),
            probe_calls: AtomicUsize::new(0),
            seen_paths: Mutex::new(Vec::new()),
        }
    }

    /// Remux never completes, like an ffmpeg run stuck on a huge file.
    pub fn hanging() -> Self {
        Self {
            remux_hangs: true,
            ..Self::with_dimensions(1920, 1080)
        }
    }

    pub fn remux_calls(&self) -> usize {
        self.remux_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaToolkit for ScriptedMedia {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        self.remux_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_paths
            .lock()
            .unwrap()
            .extend([input.to_path_buf(), output.to_path_buf()]);

        if self.remux_hangs {
            std::future::pending::<()>().await;
        }
        if self.remux_fails {
            return Err(MediaError::Exit {
                tool: "ffmpeg".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "moov atom not found".to_string(),
            });
        }
        tokio::fs::copy(input, output)
            .await
            .map_err(|source| MediaError::Spawn {
                tool: "ffmpeg".to_string(),
                source,
            })?;
        Ok(())
    }

    async fn probe(&self, input: &Path) -> Result<ProbeReport, MediaError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_paths.lock().unwrap().push(input.to_path_buf());

        match &self.probe {
            ProbeScript::Report(report) => Ok(report.clone()),
            ProbeScript::NoVideoStream => ProbeReport::from_json(
                br#"{"streams": [{"codec_type": "audio", "sample_rate": "44100"}]}"#,
            ),
            ProbeScript::Fails => Err(MediaError::Exit {
                tool: "ffprobe".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            }),
        }
    }
}

// --- object store ---

#[derive(Clone, Debug)]
pub struct PutRecord {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Default)]
pub struct RecordingStore {
    pub fail_puts: bool,
    pub puts: Mutex<Vec<PutRecord>>,
    pub presigned: AtomicUsize,
    pub last_ttl: Mutex<Option<Duration>>,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub fn puts(&self) -> Vec<PutRecord> {
        self.puts.lock().unwrap().clone()
    }

    pub fn presign_count(&self) -> usize {
        self.presigned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.fail_puts {
            return Err(StorageError::UploadFailed {
                key: key.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        let body = tokio::fs::read(source)
            .await
            .map_err(|e| StorageError::Body(e.to_string()))?;
        self.puts.lock().unwrap().push(PutRecord {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, ttl: Duration) -> StorageResult<String> {
        let n = self.presigned.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_ttl.lock().unwrap() = Some(ttl);
        Ok(format!(
            "https://signed.example/{bucket}/{key}?X-Amz-Expires={}&sig={n}",
            ttl.as_secs()
        ))
    }
}

// --- app ---

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub repo: Arc<InMemoryVideoRepository>,
    pub media: Arc<ScriptedMedia>,
    pub store: Arc<RecordingStore>,
    pub upload_dir: TempDir,
}

pub fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        server_port: 0,
        database_url: "postgres://unused".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        s3_bucket: TEST_BUCKET.to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        s3_access_key: "test".to_string(),
        s3_secret_key: "test".to_string(),
        ffmpeg_bin: "ffmpeg".to_string(),
        ffprobe_bin: "ffprobe".to_string(),
        upload_tmp_dir: upload_dir.to_path_buf(),
        thumbnail_cache_capacity: 8,
        thumbnail_cache_ttl_secs: 3600,
    }
}

impl TestApp {
    pub fn new(media: ScriptedMedia, store: RecordingStore) -> Self {
        let upload_dir = TempDir::new().unwrap();
        Self::with_config(media, store, test_config(upload_dir.path()), upload_dir)
    }

    pub fn with_config(
        media: ScriptedMedia,
        store: RecordingStore,
        config: AppConfig,
        upload_dir: TempDir,
    ) -> Self {
        let repo = Arc::new(InMemoryVideoRepository::default());
        let media = Arc::new(media);
        let store = Arc::new(store);
        let state = AppState::new(config, repo.clone(), store.clone(), media.clone());

        Self {
            router: create_app(state.clone()),
            state,
            repo,
            media,
            store,
            upload_dir,
        }
    }

    pub fn landscape() -> Self {
        Self::new(ScriptedMedia::with_dimensions(1920, 1080), RecordingStore::default())
    }

    /// A video record owned by `owner`, optionally with a stored locator.
    pub fn seed_video(&self, owner: Uuid, locator: Option<&str>) -> Video {
        let mut video = Video::new(owner, "Sample clip".to_string(), None);
        video.video_url = locator.map(str::to_string);
        self.repo.insert(video.clone());
        video
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn send_raw(&self, req: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(req).await.unwrap()
    }

    pub fn upload_dir_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    pub fn assert_no_artifacts(&self) {
        let left = self.upload_dir_entries();
        assert!(left.is_empty(), "ephemeral artifacts left behind: {left:?}");
    }
}

// --- requests ---

pub fn token_for(user_id: Uuid) -> String {
    let now = get_current_timestamp() as usize;
    let claims = TokenClaims {
        sub: user_id,
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, user_id: Uuid, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn upload_request(video_id: Uuid, user_id: Uuid, content_type: &str, data: &[u8]) -> Request<Body> {
    multipart_request(
        &format!("/api/v1/videos/{video_id}/upload"),
        user_id,
        multipart_body("video", "clip.mp4", content_type, data),
    )
}

pub fn authed(method: &str, uri: &str, user_id: Uuid) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)))
        .body(Body::empty())
        .unwrap()
}

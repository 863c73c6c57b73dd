use serde::Deserialize;
use std::path::PathBuf;
use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    pub upload_tmp_dir: PathBuf,
    pub thumbnail_cache_capacity: usize,
    pub thumbnail_cache_ttl_secs: u64,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            s3_bucket: env::get(EnvKey::S3Bucket)?,
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            s3_endpoint: env::get_optional(EnvKey::S3Endpoint),
            s3_access_key: env::get(EnvKey::S3AccessKey)?,
            s3_secret_key: env::get(EnvKey::S3SecretKey)?,
            ffmpeg_bin: env::get_or(EnvKey::FfmpegBin, "ffmpeg"),
            ffprobe_bin: env::get_or(EnvKey::FfprobeBin, "ffprobe"),
            upload_tmp_dir: env::get_optional(EnvKey::UploadTmpDir)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            thumbnail_cache_capacity: env::get_parsed(EnvKey::ThumbnailCacheCapacity, 512),
            thumbnail_cache_ttl_secs: env::get_parsed(EnvKey::ThumbnailCacheTtlSecs, 3600),
        })
    }
}

//! Post-intake processing of an uploaded video: fast-start remux, geometry
//! classification, key derivation and the single atomic upload.
//!
//! Every temp artifact is a [`TempPath`] owned by the stage that created it or
//! by its caller, so an early return from any stage unwinds them in reverse
//! order of creation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempPath;
use tracing::{Level, debug, error, info, warn};

use super::aspect::AspectRatio;
use super::keys::video_object_key;
use super::locator::StorageLocator;
use crate::common::error::{AppError, AppResult};
use crate::common::upload::StagedUpload;
use crate::infrastructure::media::MediaToolkit;
use crate::infrastructure::storage::ObjectStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intake,
    Transcode,
    Classify,
    Upload,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Intake => "intake",
            Stage::Transcode => "transcode",
            Stage::Classify => "classify",
            Stage::Upload => "upload",
            Stage::Persist => "persist",
        })
    }
}

/// Tag a stage result, logging failures with the stage name. Rejected client
/// input is a warning; anything else is an error.
pub fn gate<T, E>(stage: Stage, result: Result<T, E>) -> AppResult<T>
where
    E: Into<AppError>,
{
    result.map_err(|e| {
        let e = e.into();
        if failure_level(&e) == Level::ERROR {
            error!(%stage, error = %e, "Upload pipeline stage failed");
        } else {
            warn!(%stage, error = %e, "Upload rejected");
        }
        e
    })
}

fn failure_level(e: &AppError) -> Level {
    if e.status().is_server_error() {
        Level::ERROR
    } else {
        Level::WARN
    }
}

#[derive(Debug, Clone)]
pub struct StoredVideo {
    pub locator: StorageLocator,
    pub aspect: AspectRatio,
}

pub struct UploadPipeline {
    media: Arc<dyn MediaToolkit>,
    store: Arc<dyn ObjectStore>,
    bucket: String,
    work_dir: PathBuf,
}

impl UploadPipeline {
    pub fn new(
        media: Arc<dyn MediaToolkit>,
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            media,
            store,
            bucket: bucket.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Transcode → Classify → Upload. The remuxed artifact is gone by the time
    /// this returns, whatever the outcome.
    pub async fn process(&self, staged: &StagedUpload) -> AppResult<StoredVideo> {
        debug!(stage = %Stage::Transcode, bytes = staged.size, "Stage started");
        let remuxed = gate(Stage::Transcode, self.relocate_metadata(&staged.path).await)?;

        debug!(stage = %Stage::Classify, "Stage started");
        let aspect = gate(Stage::Classify, self.classify(&remuxed).await)?;

        debug!(stage = %Stage::Upload, "Stage started");
        let locator = gate(
            Stage::Upload,
            self.store_object(aspect, &remuxed, staged.media_type.essence_str())
                .await,
        )?;

        Ok(StoredVideo { locator, aspect })
    }

    pub async fn relocate_metadata(&self, input: &Path) -> AppResult<TempPath> {
        let output = tempfile::Builder::new()
            .prefix("faststart-")
            .suffix(".mp4")
            .tempfile_in(&self.work_dir)?
            .into_temp_path();

        self.media.remux_faststart(input, &output).await?;
        Ok(output)
    }

    pub async fn classify(&self, path: &Path) -> AppResult<AspectRatio> {
        let report = self.media.probe(path).await?;
        let (width, height) = report.video_dimensions()?;
        let aspect = AspectRatio::classify(width, height);

        info!(width, height, %aspect, "📐 Classified video geometry");
        Ok(aspect)
    }

    pub async fn store_object(
        &self,
        aspect: AspectRatio,
        source: &Path,
        content_type: &str,
    ) -> AppResult<StorageLocator> {
        let key = video_object_key(aspect);
        self.store
            .put_object(&self.bucket, &key, source, content_type)
            .await?;

        Ok(StorageLocator::compact(self.bucket.clone(), key))
    }
}

//! External media tooling behind a trait so the upload pipeline can run
//! against canned output in tests.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub mod ffmpeg;

pub use ffmpeg::FfmpegToolkit;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Exit {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("failed to parse probe output: {0}")]
    MalformedProbe(#[from] serde_json::Error),

    #[error("no video stream found")]
    NoVideoStream,

    #[error("video stream has no width/height")]
    MissingDimensions,
}

#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Copy every stream of `input` into `output` untouched, with the container
    /// index moved in front of the media data.
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), MediaError>;

    async fn probe(&self, input: &Path) -> Result<ProbeReport, MediaError>;
}

/// The subset of `ffprobe -print_format json -show_streams` we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ProbeReport {
    pub fn from_json(raw: &[u8]) -> Result<Self, MediaError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Report with a single video stream of the given size.
    pub fn single_video(width: u32, height: u32) -> Self {
        Self {
            streams: vec![ProbeStream {
                codec_type: Some("video".to_string()),
                width: Some(width),
                height: Some(height),
            }],
        }
    }

    /// Width and height of the first video stream.
    pub fn video_dimensions(&self) -> Result<(u32, u32), MediaError> {
        let stream = self
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or(MediaError::NoVideoStream)?;

        match (stream.width, stream.height) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(MediaError::MissingDimensions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_video_stream_after_audio() {
        let raw = br#"{
            "streams": [
                {"index": 0, "codec_type": "audio", "sample_rate": "48000"},
                {"index": 1, "codec_type": "video", "width": 1080, "height": 1920},
                {"index": 2, "codec_type": "video", "width": 320, "height": 240}
            ]
        }"#;
        let report = ProbeReport::from_json(raw).unwrap();
        assert_eq!(report.video_dimensions().unwrap(), (1080, 1920));
    }

    #[test]
    fn empty_streams_is_an_error_not_a_default() {
        let report = ProbeReport::from_json(br#"{"streams": []}"#).unwrap();
        assert!(matches!(report.video_dimensions(), Err(MediaError::NoVideoStream)));

        let report = ProbeReport::from_json(b"{}").unwrap();
        assert!(matches!(report.video_dimensions(), Err(MediaError::NoVideoStream)));
    }

    #[test]
    fn video_stream_without_geometry() {
        let raw = br#"{"streams": [{"codec_type": "video"}]}"#;
        let report = ProbeReport::from_json(raw).unwrap();
        assert!(matches!(report.video_dimensions(), Err(MediaError::MissingDimensions)));
    }

    #[test]
    fn garbage_output() {
        assert!(matches!(
            ProbeReport::from_json(b"not json"),
            Err(MediaError::MalformedProbe(_))
        ));
    }
}

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use super::{MediaError, MediaToolkit, ProbeReport};

const STDERR_TAIL: usize = 512;

/// Shells out to `ffmpeg` / `ffprobe`.
///
/// Children are spawned with `kill_on_drop`, so dropping the request future
/// (client disconnect) terminates the process.
#[derive(Clone, Debug)]
pub struct FfmpegToolkit {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg_bin: impl Into<String>, ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    async fn run<I, S>(&self, bin: &str, args: I) -> Result<Output, MediaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| MediaError::Spawn {
                tool: bin.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(MediaError::Exit {
                tool: bin.to_string(),
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> Result<(), MediaError> {
        let start = Instant::now();
        self.run(
            &self.ffmpeg_bin,
            [
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-c"),
                OsStr::new("copy"),
                OsStr::new("-movflags"),
                OsStr::new("faststart"),
                OsStr::new("-f"),
                OsStr::new("mp4"),
                OsStr::new("-y"),
                output.as_os_str(),
            ],
        )
        .await?;

        info!(
            input = %input.display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "🎬 Remuxed for fast start"
        );
        Ok(())
    }

    async fn probe(&self, input: &Path) -> Result<ProbeReport, MediaError> {
        let output = self
            .run(
                &self.ffprobe_bin,
                [
                    OsStr::new("-v"),
                    OsStr::new("error"),
                    OsStr::new("-print_format"),
                    OsStr::new("json"),
                    OsStr::new("-show_streams"),
                    input.as_os_str(),
                ],
            )
            .await?;

        debug!(bytes = output.stdout.len(), "ffprobe output received");
        ProbeReport::from_json(&output.stdout)
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    match text.char_indices().rev().nth(STDERR_TAIL) {
        Some((idx, _)) => text[idx..].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_tail_keeps_the_end() {
        let long = "x".repeat(2000) + "moov atom not found";
        let tail = stderr_tail(long.as_bytes());
        assert!(tail.ends_with("moov atom not found"));
        assert!(tail.chars().count() <= STDERR_TAIL + 1);
        assert_eq!(stderr_tail(b"  short \n"), "short");
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let toolkit = FfmpegToolkit::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let err = toolkit.probe(Path::new("/tmp/none.mp4")).await.unwrap_err();
        assert!(matches!(err, MediaError::Spawn { .. }));
    }
}

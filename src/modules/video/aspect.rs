use serde::Serialize;
use std::fmt;

const WIDESCREEN: f64 = 16.0 / 9.0;
const TOLERANCE: f64 = 0.1;

/// Orientation bucket of an uploaded video. Only picks the storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "other")]
    Other,
}

impl AspectRatio {
    pub fn classify(width: u32, height: u32) -> Self {
        let (long, short) = (width.max(height), width.min(height));
        if short == 0 {
            return AspectRatio::Other;
        }
        let near_widescreen = (long as f64 / short as f64 - WIDESCREEN).abs() < TOLERANCE;

        match (width.cmp(&height), near_widescreen) {
            (std::cmp::Ordering::Greater, true) => AspectRatio::Landscape,
            (std::cmp::Ordering::Less, true) => AspectRatio::Portrait,
            _ => AspectRatio::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        }
    }

    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

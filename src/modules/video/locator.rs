//! Durable reference to a stored video object.
//!
//! Writers only ever produce the compact `bucket,key` encoding. Records written
//! before that encoding existed hold a full virtual-hosted S3 URL, which stays
//! readable but is never produced anew.

use std::fmt;
use thiserror::Error;

const LEGACY_DELIMITER: &str = ".amazonaws.com/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("locator is empty")]
    Empty,

    #[error("locator matches neither compact nor legacy encoding: {0:?}")]
    Unrecognized(String),

    #[error("legacy locator is malformed: {0:?}")]
    MalformedLegacy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocator {
    Compact { bucket: String, key: String },
    Legacy { raw: String, bucket: String, key: String },
}

impl StorageLocator {
    pub fn compact(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        StorageLocator::Compact {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Compact encoding first, then legacy. Anything else is rejected.
    pub fn parse(raw: &str) -> Result<Self, LocatorError> {
        if raw.is_empty() {
            return Err(LocatorError::Empty);
        }
        if let Some(locator) = Self::parse_compact(raw) {
            return Ok(locator);
        }
        if raw.contains(LEGACY_DELIMITER) {
            return Self::parse_legacy(raw);
        }
        Err(LocatorError::Unrecognized(raw.to_string()))
    }

    fn parse_compact(raw: &str) -> Option<Self> {
        let mut fields = raw.split(',');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(bucket), Some(key), None) if !bucket.is_empty() && !key.is_empty() => {
                Some(Self::compact(bucket, key))
            }
            _ => None,
        }
    }

    fn parse_legacy(raw: &str) -> Result<Self, LocatorError> {
        let malformed = || LocatorError::MalformedLegacy(raw.to_string());

        let parts: Vec<&str> = raw.split(LEGACY_DELIMITER).collect();
        let [origin, key] = parts.as_slice() else {
            return Err(malformed());
        };
        let scheme_host: Vec<&str> = origin.split("//").collect();
        let [_scheme, host] = scheme_host.as_slice() else {
            return Err(malformed());
        };
        if key.is_empty() {
            return Err(malformed());
        }
        let bucket = bucket_from_host(host).ok_or_else(malformed)?;

        Ok(StorageLocator::Legacy {
            raw: raw.to_string(),
            bucket,
            key: key.to_string(),
        })
    }

    pub fn bucket(&self) -> &str {
        match self {
            StorageLocator::Compact { bucket, .. } | StorageLocator::Legacy { bucket, .. } => bucket,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            StorageLocator::Compact { key, .. } | StorageLocator::Legacy { key, .. } => key,
        }
    }

    /// The string persisted on the video record.
    pub fn encode(&self) -> String {
        match self {
            StorageLocator::Compact { bucket, key } => format!("{bucket},{key}"),
            StorageLocator::Legacy { raw, .. } => raw.clone(),
        }
    }
}

impl fmt::Display for StorageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// `mybucket.s3` / `mybucket.s3.us-east-2` / `mybucket.s3-us-west-1` -> `mybucket`.
///
/// The host segment left over once `.amazonaws.com/` is split off still carries
/// the service label; everything before the last `s3` label is the bucket.
/// A host without such a label is taken whole. A host that *starts* with the
/// service label is path-style and carries no bucket.
fn bucket_from_host(host: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    let labels: Vec<&str> = host.split('.').collect();
    let service = labels
        .iter()
        .rposition(|label| *label == "s3" || label.starts_with("s3-"));

    match service {
        Some(0) => None,
        Some(idx) => Some(labels[..idx].join(".")),
        None => Some(host.to_string()),
    }
}

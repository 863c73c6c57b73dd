use axum::{
    body::Bytes,
    extract::{Multipart, multipart::Field},
};
use futures_util::StreamExt;
use mime::Mime;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::common::error::{AppError, AppResult};

/// What a multipart file field must look like to be accepted.
pub struct FieldSpec {
    pub name: &'static str,
    pub allowed_types: &'static [&'static str],
    pub max_bytes: u64,
    pub suffix: &'static str,
}

/// An uploaded file staged on local disk. The file is removed when this value
/// is dropped.
pub struct StagedUpload {
    pub path: TempPath,
    pub media_type: Mime,
    pub size: u64,
}

/// Find `spec.name` in the form and stream it to a fresh temp file in `dir`.
///
/// The declared content type is validated before the temp file is created.
pub async fn stage_file_field(
    multipart: &mut Multipart,
    spec: &FieldSpec,
    dir: &Path,
) -> AppResult<StagedUpload> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(spec.name) {
            continue;
        }
        let media_type = accepted_media_type(&field, spec)?;

        let staged = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(spec.suffix)
            .tempfile_in(dir)?;
        let (file, path) = staged.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut size: u64 = 0;
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            size += chunk.len() as u64;
            if size > spec.max_bytes {
                return Err(too_large(spec));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!(
            field = spec.name,
            path = %path.display(),
            bytes = size,
            media_type = %media_type,
            "📥 Upload staged"
        );
        return Ok(StagedUpload {
            path,
            media_type,
            size,
        });
    }

    Err(missing_field(spec))
}

/// Find `spec.name` in the form and buffer it in memory.
pub async fn read_file_field(
    multipart: &mut Multipart,
    spec: &FieldSpec,
) -> AppResult<(Bytes, Mime)> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(spec.name) {
            continue;
        }
        let media_type = accepted_media_type(&field, spec)?;

        let mut buffer = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if (buffer.len() + chunk.len()) as u64 > spec.max_bytes {
                return Err(too_large(spec));
            }
            buffer.extend_from_slice(&chunk);
        }

        debug!(field = spec.name, bytes = buffer.len(), "Field buffered");
        return Ok((Bytes::from(buffer), media_type));
    }

    Err(missing_field(spec))
}

fn accepted_media_type(field: &Field<'_>, spec: &FieldSpec) -> AppResult<Mime> {
    let declared = field
        .content_type()
        .ok_or_else(|| AppError::BadRequest("Missing Content-Type header".to_string()))?;

    let media_type: Mime = declared
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid Content-Type header: {declared}")))?;

    if !spec
        .allowed_types
        .iter()
        .any(|allowed| *allowed == media_type.essence_str())
    {
        return Err(AppError::BadRequest(format!(
            "Invalid media type {}. Supported: {}",
            media_type.essence_str(),
            spec.allowed_types.join(", ")
        )));
    }

    Ok(media_type)
}

fn missing_field(spec: &FieldSpec) -> AppError {
    AppError::BadRequest(format!("No `{}` field found in multipart request", spec.name))
}

fn too_large(spec: &FieldSpec) -> AppError {
    AppError::PayloadTooLarge(format!(
        "`{}` exceeds the {} byte limit",
        spec.name, spec.max_bytes
    ))
}

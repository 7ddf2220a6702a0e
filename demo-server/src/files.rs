//! File download, single-file upload and the composite multipart form.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::dto::{ComplexFormSummary, FileMeta, UploadedFile, UserForm};
use crate::error::AppError;
use crate::SharedConfig;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub filename: String,
}

/// Find a downloadable file. `base_dir` is tried first, then the name as a
/// path relative to the working directory.
pub fn resolve_download(base_dir: &Path, filename: &str) -> Result<PathBuf, AppError> {
    let relative = Path::new(filename.trim_start_matches('/'));
    let is_plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if relative.as_os_str().is_empty() || !is_plain {
        return Err(AppError::BadRequest(format!("invalid file name `{filename}`")));
    }

    [base_dir.join(relative), relative.to_path_buf()]
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| AppError::NotFound(filename.to_string()))
}

pub async fn download(
    State(config): State<SharedConfig>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let path = resolve_download(&config.file_path, &query.filename)?;
    let file = tokio::fs::File::open(&path).await?;
    let length = file.metadata().await.ok().map(|meta| meta.len());

    let name = query.filename.trim_start_matches('/');
    let disposition = HeaderValue::from_str(&format!("attachment;filename={name}"))
        .map_err(|_| AppError::BadRequest(format!("file name `{name}` is not a valid header value")))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    if let Some(length) = length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    tracing::info!(path = %path.display(), length = ?length, "streaming download");
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

pub async fn upload(mut multipart: Multipart) -> Result<Json<FileMeta>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file = UploadedFile::from_field(field).await?;
        let meta = FileMeta::from(&file);
        tracing::info!(
            filename = %meta.filename,
            content_type = %meta.content_type,
            size = meta.size,
            "received upload"
        );
        return Ok(Json(meta));
    }
    Err(AppError::MissingField("file"))
}

pub async fn complex_form(multipart: Multipart) -> Result<Json<ComplexFormSummary>, AppError> {
    let form = UserForm::from_multipart(multipart).await?;
    tracing::info!(
        name = %form.name,
        id_images = form.id_image_list.len(),
        "received complex form"
    );
    Ok(Json(ComplexFormSummary::from(&form)))
}

//! Payload types for the `/rest` endpoints.
//!
//! `RestDto` is the universal round-trip payload. The upload types carry the
//! data pulled out of multipart bodies; they live only for one request.

use std::fmt;

use axum::extract::multipart::{Field, Multipart, MultipartError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A `(id, name)` pair. Both fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RestDto {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
        }
    }
}

/// Renders as compact JSON, e.g. `{"id":1,"name":"Hello World"}`.
impl fmt::Display for RestDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A file part received in a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub async fn from_field(field: Field<'_>) -> Result<Self, MultipartError> {
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Metadata returned by the single-file upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

impl From<&UploadedFile> for FileMeta {
    fn from(file: &UploadedFile) -> Self {
        Self {
            filename: file.file_name.clone().unwrap_or_default(),
            content_type: file.content_type.clone().unwrap_or_default(),
            size: file.size(),
        }
    }
}

/// The composite form: one text field, one file, one or more files.
#[derive(Debug, Clone)]
pub struct UserForm {
    pub name: String,
    pub head_image: UploadedFile,
    pub id_image_list: Vec<UploadedFile>,
}

impl UserForm {
    /// Drain a multipart body into a `UserForm`. Unknown parts are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut name = None;
        let mut head_image = None;
        let mut id_image_list = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "name" => name = Some(field.text().await?),
                "headImage" => head_image = Some(UploadedFile::from_field(field).await?),
                "idImageList" => id_image_list.push(UploadedFile::from_field(field).await?),
                _ => {}
            }
        }

        if id_image_list.is_empty() {
            return Err(AppError::MissingField("idImageList"));
        }
        Ok(Self {
            name: name.ok_or(AppError::MissingField("name"))?,
            head_image: head_image.ok_or(AppError::MissingField("headImage"))?,
            id_image_list,
        })
    }
}

/// What the complex form endpoint reports back. File lists render as
/// `[a.jpg, b.jpg]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexFormSummary {
    pub name: String,
    pub head_image: String,
    pub id_image_list: String,
}

impl From<&UserForm> for ComplexFormSummary {
    fn from(form: &UserForm) -> Self {
        let names: Vec<&str> = form
            .id_image_list
            .iter()
            .map(|file| file.file_name.as_deref().unwrap_or_default())
            .collect();
        Self {
            name: form.name.clone(),
            head_image: form.head_image.file_name.clone().unwrap_or_default(),
            id_image_list: format!("[{}]", names.join(", ")),
        }
    }
}

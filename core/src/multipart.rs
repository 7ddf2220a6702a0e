//! Minimal multipart/form-data encoder.
//!
//! Only what the upload and form endpoints need: text parts and file parts,
//! framed with a random boundary.

use uuid::Uuid;

/// A single part of a multipart form.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl Part {
    /// A text part. No content type is sent, so servers treat it as a plain
    /// form field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            data: value.into().into_bytes(),
        }
    }

    /// A file part. The content type is guessed from the extension.
    pub fn file(name: impl Into<String>, filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename).to_string();
        Self {
            name: name.into(),
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

fn guess_content_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "json" => "application/json",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// A multipart form under construction.
#[derive(Debug, Clone)]
pub struct Form {
    parts: Vec<Part>,
    boundary: String,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        Self::with_boundary(format!("----RestCoreBoundary{}", Uuid::new_v4().simple()))
    }

    /// The boundary must not occur inside any part's data.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            parts: Vec::new(),
            boundary: boundary.into(),
        }
    }

    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.part(Part::text(name, value))
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Returns `(content-type header value, body bytes)`.
    pub fn into_body(self) -> (String, Vec<u8>) {
        let content_type = self.content_type();
        (content_type, self.encode())
    }

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for part in &self.parts {
            buf.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            buf.extend_from_slice(b"Content-Disposition: form-data; name=\"");
            buf.extend_from_slice(escape_quoted(&part.name).as_bytes());
            buf.push(b'"');
            if let Some(filename) = &part.filename {
                buf.extend_from_slice(b"; filename=\"");
                buf.extend_from_slice(escape_quoted(filename).as_bytes());
                buf.push(b'"');
            }
            buf.extend_from_slice(b"\r\n");
            if let Some(content_type) = &part.content_type {
                buf.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
            }
            buf.extend_from_slice(b"\r\n");
            buf.extend_from_slice(&part.data);
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        buf
    }
}

// Quotes and line breaks would end the header parameter early.
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

//! Stateless request builder and response parser for the `/rest` API.
//!
//! # Design
//! `RestClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the host executes the round-trip in
//! between.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::{Form, Part};
use crate::types::{Attachment, ComplexFormSummary, Download, FileMeta, GetAllEcho, HeaderEcho, RestDto};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const JSON: &str = "application/json";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless client for the REST demo API.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest{path}", self.base_url)
    }

    // --- GET ---

    pub fn build_get(&self) -> HttpRequest {
        HttpRequest::get(self.url("/get"))
    }

    pub fn build_get_by_path(&self, id: i32, name: &str) -> HttpRequest {
        HttpRequest::get(self.url(&format!("/get/{id}/{}", segment(name))))
    }

    pub fn build_get_list(&self) -> HttpRequest {
        HttpRequest::get(self.url("/getList"))
    }

    pub fn build_download(&self, filename: &str) -> Result<HttpRequest, ApiError> {
        let query = serde_urlencoded::to_string([("filename", filename)])
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::get(self.url(&format!("/download?{query}"))))
    }

    /// `headers` are sent in the given order; repeated names are allowed.
    pub fn build_header(&self, headers: &[(&str, &str)]) -> HttpRequest {
        let mut request = HttpRequest::get(self.url("/header"));
        request.headers.extend(owned_headers(headers));
        request
    }

    pub fn build_get_all(&self, path1: &str, path2: &str, headers: &[(&str, &str)]) -> HttpRequest {
        let mut request = HttpRequest::get(self.url(&format!("/getAll/{}/{}", segment(path1), segment(path2))));
        request.headers.extend(owned_headers(headers));
        request
    }

    // --- POST ---

    pub fn build_post_form(&self, dto: &RestDto) -> Result<HttpRequest, ApiError> {
        let body = serde_urlencoded::to_string(dto).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::post(self.url("/post1"), FORM_URLENCODED, body.into_bytes()))
    }

    /// Same form as `build_post_form`, sent as multipart text parts.
    pub fn build_post_form_multipart(&self, dto: &RestDto) -> HttpRequest {
        let mut form = Form::new();
        if let Some(id) = dto.id {
            form = form.text("id", id.to_string());
        }
        if let Some(name) = &dto.name {
            form = form.text("name", name.clone());
        }
        let (content_type, body) = form.into_body();
        HttpRequest::post(self.url("/post1"), &content_type, body)
    }

    pub fn build_upload(&self, file: &Attachment) -> HttpRequest {
        let (content_type, body) = Form::new().part(file_part("file", file)).into_body();
        HttpRequest::post(self.url("/upload"), &content_type, body)
    }

    pub fn build_complex_form(&self, name: &str, head_image: &Attachment, id_images: &[Attachment]) -> HttpRequest {
        let form = id_images.iter().fold(
            Form::new().text("name", name).part(file_part("headImage", head_image)),
            |form, image| form.part(file_part("idImageList", image)),
        );
        let (content_type, body) = form.into_body();
        HttpRequest::post(self.url("/complexForm"), &content_type, body)
    }

    pub fn build_post_request_body(&self, dto: &RestDto) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(dto).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::post(self.url("/postRequestBody"), JSON, body))
    }

    pub fn build_post_for_list(&self, list: &[RestDto]) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(list).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::post(self.url("/postForList"), JSON, body))
    }

    // --- parse ---

    pub fn parse_get(&self, response: HttpResponse) -> Result<RestDto, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_by_path(&self, response: HttpResponse) -> Result<RestDto, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_list(&self, response: HttpResponse) -> Result<Vec<RestDto>, ApiError> {
        parse_json(response)
    }

    pub fn parse_download(&self, response: HttpResponse) -> Result<Download, ApiError> {
        check_status(&response, 200)?;
        let file_name = response
            .header("content-disposition")
            .and_then(disposition_filename);
        let content_length = response
            .header("content-length")
            .and_then(|value| value.trim().parse().ok());
        Ok(Download {
            file_name,
            content_length,
            bytes: response.body,
        })
    }

    pub fn parse_header(&self, response: HttpResponse) -> Result<HeaderEcho, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_all(&self, response: HttpResponse) -> Result<GetAllEcho, ApiError> {
        parse_json(response)
    }

    /// Parses both the url-encoded and the multipart form echo.
    pub fn parse_post_form(&self, response: HttpResponse) -> Result<RestDto, ApiError> {
        parse_json(response)
    }

    pub fn parse_upload(&self, response: HttpResponse) -> Result<FileMeta, ApiError> {
        parse_json(response)
    }

    pub fn parse_complex_form(&self, response: HttpResponse) -> Result<ComplexFormSummary, ApiError> {
        parse_json(response)
    }

    pub fn parse_post_request_body(&self, response: HttpResponse) -> Result<RestDto, ApiError> {
        parse_json(response)
    }

    pub fn parse_post_for_list(&self, response: HttpResponse) -> Result<Vec<RestDto>, ApiError> {
        parse_json(response)
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn owned_headers<'a>(headers: &'a [(&'a str, &'a str)]) -> impl Iterator<Item = (String, String)> + 'a {
    headers
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
}

fn file_part(name: &str, file: &Attachment) -> Part {
    Part::file(name, file.filename.clone(), file.data.clone())
}

/// Pull `filename` out of `attachment;filename=test.txt` (quotes optional).
fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("filename"))
        .map(|(_, name)| name.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response, 200)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body_text(),
    })
}

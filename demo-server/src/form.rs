//! Extractor for `RestDto` submitted as an HTML form.
//!
//! Clients send the same `id`/`name` pair either url-encoded or as
//! multipart text parts, so both encodings are accepted.

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::Deserialize;

use crate::dto::RestDto;
use crate::error::AppError;

pub struct RestDtoForm(pub RestDto);

/// Url-encoded fields before `id` is parsed, so `id=` reads as absent.
#[derive(Deserialize)]
struct RawForm {
    id: Option<String>,
    name: Option<String>,
}

/// A blank `id` is absent; anything else must be an integer.
fn parse_id(text: &str) -> Result<Option<i32>, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("`id` is not an integer: {text}")))
}

impl<S> FromRequest<S> for RestDtoForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(raw) = Form::<RawForm>::from_request(req, state).await?;
            let id = match raw.id.as_deref() {
                Some(text) => parse_id(text)?,
                None => None,
            };
            return Ok(Self(RestDto { id, name: raw.name }));
        }

        let mut multipart = Multipart::from_request(req, state).await?;
        let mut dto = RestDto::default();
        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "id" => dto.id = parse_id(&field.text().await?)?,
                "name" => dto.name = Some(field.text().await?),
                _ => {}
            }
        }
        Ok(Self(dto))
    }
}

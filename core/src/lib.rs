//! Synchronous client core for the REST demo server.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! HTTP round-trip, so the core stays deterministic and testable.
//!
//! # Design
//! - `RestClient` is stateless; it holds only `base_url`.
//! - Every endpoint has a `build_*` / `parse_*` pair.
//! - Multipart bodies are encoded here, since the host only moves bytes.
//! - DTOs are defined independently from the demo-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod multipart;
pub mod types;

pub use client::RestClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::{Form, Part};
pub use types::{Attachment, ComplexFormSummary, Download, FileMeta, GetAllEcho, HeaderEcho, RestDto};

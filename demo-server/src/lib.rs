//! Demo REST server.
//!
//! Every endpoint under `/rest` is stateless: it echoes its input, returns a
//! fixed literal, or streams a file from disk. The only shared state is the
//! immutable `ServerConfig`.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
pub mod files;
pub mod form;
pub mod headers;

pub use config::{ConfigError, ServerConfig};
pub use dto::{ComplexFormSummary, FileMeta, RestDto, UploadedFile, UserForm};
pub use error::AppError;
pub use headers::{collect_headers, GetAllEcho, HeaderEcho};

pub type SharedConfig = Arc<ServerConfig>;

pub fn app(config: ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes;
    let rest = Router::new()
        .route("/get", get(get_default))
        .route("/get/{id}/{name}", get(get_by_path))
        .route("/getList", get(get_list))
        .route("/download", get(files::download))
        .route("/header", get(header))
        .route("/getAll/{path1}/{path2}", get(get_all))
        .route("/post1", post(post1))
        .route("/upload", post(files::upload))
        .route("/complexForm", post(files::complex_form))
        .route("/postRequestBody", post(post_request_body))
        .route("/postForList", post(post_for_list));

    Router::new()
        .nest("/rest", rest)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config))
}

pub async fn run(listener: TcpListener, config: ServerConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

async fn get_default() -> Json<RestDto> {
    Json(RestDto::new(1, "Hello World"))
}

async fn get_by_path(Path((id, name)): Path<(i32, String)>) -> Json<RestDto> {
    Json(RestDto::new(id, name))
}

async fn get_list() -> Json<Vec<RestDto>> {
    Json(vec![RestDto::new(1, "Hello World"), RestDto::new(2, "Hello China")])
}

async fn header(headers: HeaderMap) -> Json<HeaderEcho> {
    Json(collect_headers(&headers))
}

async fn get_all(Path((path1, path2)): Path<(String, String)>, headers: HeaderMap) -> Json<GetAllEcho> {
    Json(GetAllEcho {
        path1,
        path2,
        header: collect_headers(&headers),
    })
}

async fn post1(form::RestDtoForm(dto): form::RestDtoForm) -> Json<RestDto> {
    tracing::debug!(%dto, "form echo");
    Json(dto)
}

async fn post_request_body(Json(dto): Json<RestDto>) -> Json<RestDto> {
    Json(dto)
}

async fn post_for_list(Json(list): Json<Vec<RestDto>>) -> Json<Vec<RestDto>> {
    tracing::debug!(len = list.len(), "list echo");
    Json(list)
}

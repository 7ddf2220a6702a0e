//! Host side of the REST demo: executes `rest-core` requests with ureq and
//! walks through every endpoint, printing what comes back.

use std::fs::File;
use std::path::{Path, PathBuf};

use rest_core::{
    ApiError, Attachment, ComplexFormSummary, Download, FileMeta, GetAllEcho, HeaderEcho, HttpMethod,
    HttpRequest, HttpResponse, RestClient, RestDto,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("{endpoint}: {source}")]
    Api {
        endpoint: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Build an agent that hands 4xx/5xx back as data.
pub fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Cap on bodies `execute` reads into memory. Larger files go through
/// `download_to`.
pub const MAX_BUFFERED_BYTES: u64 = 1024 * 1024 * 1024;

type RawResponse = ureq::http::Response<ureq::Body>;

fn send(agent: &ureq::Agent, req: &HttpRequest) -> Result<RawResponse, ureq::Error> {
    tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");

    let response = match req.method {
        HttpMethod::Get => {
            let mut builder = agent.get(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            builder.call()?
        }
        HttpMethod::Post => {
            let mut builder = agent.post(&req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            match &req.body {
                Some(body) => builder.send(&body[..])?,
                None => builder.send_empty()?,
            }
        }
    };
    Ok(response)
}

/// Status and headers as an `HttpResponse` with an empty body.
fn response_head(response: &RawResponse) -> HttpResponse {
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    HttpResponse {
        status: response.status().as_u16(),
        headers,
        body: Vec::new(),
    }
}

/// Execute an `HttpRequest` and collect the full response.
pub fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let mut response = send(agent, &req)?;
    let mut head = response_head(&response);
    head.body = response
        .body_mut()
        .with_config()
        .limit(MAX_BUFFERED_BYTES)
        .read_to_vec()?;

    tracing::debug!(status = head.status, bytes = head.body.len(), "received response");
    Ok(head)
}

/// A download written to disk instead of memory.
#[derive(Debug, Clone)]
pub struct SavedDownload {
    pub file_name: Option<String>,
    pub content_length: Option<u64>,
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Stream `/rest/download?filename=..` into `dest` chunk by chunk.
///
/// Only the error body of a non-200 response is buffered, so it can be
/// reported through `ApiError`.
pub fn download_to(
    agent: &ureq::Agent,
    client: &RestClient,
    filename: &str,
    dest: &Path,
) -> Result<SavedDownload, DemoError> {
    let api = |source| DemoError::Api {
        endpoint: "download",
        source,
    };
    let io = |source| DemoError::Io {
        path: dest.display().to_string(),
        source,
    };

    let req = client.build_download(filename).map_err(api)?;
    let mut response = send(agent, &req)?;
    let mut head = response_head(&response);
    if head.status != 200 {
        head.body = response
            .body_mut()
            .with_config()
            .limit(MAX_BUFFERED_BYTES)
            .read_to_vec()?;
    }
    let meta = client.parse_download(head).map_err(api)?;

    let mut file = File::create(dest).map_err(io)?;
    let bytes_written = std::io::copy(&mut response.body_mut().as_reader(), &mut file).map_err(io)?;
    tracing::debug!(dest = %dest.display(), bytes_written, "download saved");

    Ok(SavedDownload {
        file_name: meta.file_name,
        content_length: meta.content_length,
        path: dest.to_path_buf(),
        bytes_written,
    })
}

/// Inputs for the file steps of the walkthrough.
#[derive(Debug, Clone)]
pub struct WalkthroughOptions {
    pub download: String,
    pub upload: Attachment,
    /// Also stream the download into this file.
    pub save_to: Option<PathBuf>,
}

impl Default for WalkthroughOptions {
    fn default() -> Self {
        Self {
            download: "test.txt".to_string(),
            upload: Attachment::new("hello.txt", b"Hello from rest-demo\n".to_vec()),
            save_to: None,
        }
    }
}

impl WalkthroughOptions {
    /// Upload a file from disk instead of the built-in sample.
    pub fn with_upload_path(mut self, path: &Path) -> Result<Self, DemoError> {
        let data = std::fs::read(path).map_err(|source| DemoError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        self.upload = Attachment::new(filename, data);
        Ok(self)
    }
}

/// Everything the walkthrough got back, one field per endpoint.
#[derive(Debug, Clone)]
pub struct WalkthroughReport {
    pub get_status: u16,
    pub get: RestDto,
    pub get_by_path: RestDto,
    pub get_list: Vec<RestDto>,
    pub download: Download,
    pub saved_download: Option<SavedDownload>,
    pub header: HeaderEcho,
    pub get_all: GetAllEcho,
    pub post_form: RestDto,
    pub post_form_multipart: RestDto,
    pub upload: FileMeta,
    pub complex_form: ComplexFormSummary,
    pub post_request_body: RestDto,
    pub post_for_list: Vec<RestDto>,
}

/// Runs each endpoint once, in the order a reader would learn them.
pub struct Walkthrough {
    client: RestClient,
    agent: ureq::Agent,
}

const DEMO_HEADERS: [(&str, &str); 3] = [("header1", "Hello"), ("header2", "World"), ("header3", "Hello World")];

impl Walkthrough {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: RestClient::new(base_url),
            agent: agent(),
        }
    }

    fn call<T>(
        &self,
        endpoint: &'static str,
        req: HttpRequest,
        parse: impl FnOnce(&RestClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, DemoError> {
        let response = execute(&self.agent, req)?;
        let status = response.status;
        let value = parse(&self.client, response).map_err(|source| DemoError::Api { endpoint, source })?;
        tracing::info!(endpoint, status, "call succeeded");
        Ok(value)
    }

    fn build<T>(endpoint: &'static str, built: Result<T, ApiError>) -> Result<T, DemoError> {
        built.map_err(|source| DemoError::Api { endpoint, source })
    }

    pub fn run(&self, options: &WalkthroughOptions) -> Result<WalkthroughReport, DemoError> {
        let c = &self.client;

        let get_response = execute(&self.agent, c.build_get())?;
        let get_status = get_response.status;
        println!(
            "get: status={get_status} headers={}",
            render_pairs(&get_response.headers)
        );
        let get = Self::build("get", c.parse_get(get_response))?;
        tracing::info!(endpoint = "get", status = get_status, "call succeeded");
        println!("get: {get}");

        let get_by_path = self.call(
            "get/{id}/{name}",
            c.build_get_by_path(1, "HelloWorld"),
            RestClient::parse_get_by_path,
        )?;
        println!("get/{{id}}/{{name}}: {get_by_path}");

        let get_list = self.call("getList", c.build_get_list(), RestClient::parse_get_list)?;
        println!("getList: {}", render_list(&get_list));

        let download_req = Self::build("download", c.build_download(&options.download))?;
        let download = self.call("download", download_req, RestClient::parse_download)?;
        println!(
            "download: {} ({} bytes)\n{}",
            download.file_name.as_deref().unwrap_or(&options.download),
            download.bytes.len(),
            String::from_utf8_lossy(&download.bytes)
        );

        let saved_download = match &options.save_to {
            Some(dest) => {
                let saved = download_to(&self.agent, c, &options.download, dest)?;
                println!(
                    "download (streamed): {} bytes -> {}",
                    saved.bytes_written,
                    saved.path.display()
                );
                Some(saved)
            }
            None => None,
        };

        let header = self.call("header", c.build_header(&DEMO_HEADERS), RestClient::parse_header)?;
        println!("header: {}", render_headers(&header));

        let get_all = self.call(
            "getAll",
            c.build_get_all("hello", "world", &DEMO_HEADERS),
            RestClient::parse_get_all,
        )?;
        println!(
            "getAll: path1={} path2={} header={}",
            get_all.path1,
            get_all.path2,
            render_headers(&get_all.header)
        );

        let form = RestDto::new(1, "Hello World");
        let post_req = Self::build("post1", c.build_post_form(&form))?;
        let post_form = self.call("post1", post_req, RestClient::parse_post_form)?;
        println!("post1 (urlencoded): {post_form}");

        let post_form_multipart = self.call(
            "post1",
            c.build_post_form_multipart(&form),
            RestClient::parse_post_form,
        )?;
        println!("post1 (multipart): {post_form_multipart}");

        let upload = self.call("upload", c.build_upload(&options.upload), RestClient::parse_upload)?;
        println!(
            "upload: filename={} contentType={} size={}",
            upload.filename, upload.content_type, upload.size
        );

        let head_image = Attachment::new("1.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        let id_images = [
            Attachment::new("2.jpg", vec![0xFF, 0xD8, 0x01]),
            Attachment::new("3.jpg", vec![0xFF, 0xD8, 0x02]),
        ];
        let complex_form = self.call(
            "complexForm",
            c.build_complex_form("hello", &head_image, &id_images),
            RestClient::parse_complex_form,
        )?;
        println!(
            "complexForm: name={} headImage={} idImageList={}",
            complex_form.name, complex_form.head_image, complex_form.id_image_list
        );

        let body_req = Self::build("postRequestBody", c.build_post_request_body(&form))?;
        let post_request_body = self.call("postRequestBody", body_req, RestClient::parse_post_request_body)?;
        println!("postRequestBody: {post_request_body}");

        let list = [RestDto::new(1, "Hello"), RestDto::new(2, "World")];
        let list_req = Self::build("postForList", c.build_post_for_list(&list))?;
        let post_for_list = self.call("postForList", list_req, RestClient::parse_post_for_list)?;
        println!("postForList: {}", render_list(&post_for_list));

        Ok(WalkthroughReport {
            get_status,
            get,
            get_by_path,
            get_list,
            download,
            saved_download,
            header,
            get_all,
            post_form,
            post_form_multipart,
            upload,
            complex_form,
            post_request_body,
            post_for_list,
        })
    }
}

fn render_list(list: &[RestDto]) -> String {
    let items: Vec<String> = list.iter().map(RestDto::to_string).collect();
    format!("[{}]", items.join(", "))
}

fn render_pairs(pairs: &[(String, String)]) -> String {
    let items: Vec<String> = pairs.iter().map(|(name, value)| format!("{name}={value}")).collect();
    format!("{{{}}}", items.join(", "))
}

fn render_headers(echo: &HeaderEcho) -> String {
    let items: Vec<String> = echo
        .0
        .iter()
        .map(|(name, values)| format!("{name}={values:?}"))
        .collect();
    format!("{{{}}}", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_list_joins_compact_json() {
        let rendered = render_list(&[RestDto::new(1, "a"), RestDto::new(2, "b")]);
        assert_eq!(rendered, r#"[{"id":1,"name":"a"}, {"id":2,"name":"b"}]"#);
    }

    #[test]
    fn render_headers_keeps_order() {
        let echo = HeaderEcho(vec![
            ("b".to_string(), vec!["1".to_string()]),
            ("a".to_string(), vec!["2".to_string(), "3".to_string()]),
        ]);
        assert_eq!(render_headers(&echo), r#"{b=["1"], a=["2", "3"]}"#);
    }

    #[test]
    fn render_pairs_prints_response_headers() {
        let pairs = vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("content-length".to_string(), "27".to_string()),
        ];
        assert_eq!(
            render_pairs(&pairs),
            "{content-type=application/json, content-length=27}"
        );
    }

    #[test]
    fn upload_path_reads_file_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# notes").unwrap();

        let options = WalkthroughOptions::default().with_upload_path(&path).unwrap();
        assert_eq!(options.upload.filename, "notes.md");
        assert_eq!(options.upload.data, b"# notes");
    }

    #[test]
    fn missing_upload_path_is_io_error() {
        let err = WalkthroughOptions::default()
            .with_upload_path(Path::new("/no/such/file"))
            .unwrap_err();
        assert!(matches!(err, DemoError::Io { .. }));
    }
}

//! Runs the full walkthrough against a live demo server.

use demo_client::{agent, download_to, execute, DemoError, Walkthrough, WalkthroughOptions};
use rest_core::{ApiError, Attachment, RestClient, RestDto};

const LARGE_FILE_BYTES: usize = 11 * 1024 * 1024;

fn spawn_server(dir: &std::path::Path) -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let config = demo_server::ServerConfig {
        bind_address: addr.to_string(),
        file_path: dir.to_path_buf(),
        ..demo_server::ServerConfig::default()
    };

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            demo_server::run(listener, config).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn walkthrough_collects_every_response() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("test.txt"), "downloaded content").unwrap();
    let addr = spawn_server(dir.path());

    let options = WalkthroughOptions {
        upload: Attachment::new("data.csv", b"a,b\n1,2\n".to_vec()),
        ..WalkthroughOptions::default()
    };
    let report = Walkthrough::new(&format!("http://{addr}/")).run(&options).unwrap();

    assert_eq!(report.get_status, 200);
    assert_eq!(report.get, RestDto::new(1, "Hello World"));
    assert_eq!(report.get_by_path, RestDto::new(1, "HelloWorld"));
    assert_eq!(report.get_list.len(), 2);
    assert_eq!(report.download.bytes, b"downloaded content");
    assert!(report.saved_download.is_none());
    assert_eq!(report.header.get("header3").unwrap(), ["Hello World"]);
    assert_eq!(report.get_all.path2, "world");
    assert_eq!(report.post_form, report.post_form_multipart);
    assert_eq!(report.upload.filename, "data.csv");
    assert_eq!(report.upload.content_type, "text/csv");
    assert_eq!(report.upload.size, 8);
    assert_eq!(report.complex_form.id_image_list, "[2.jpg, 3.jpg]");
    assert_eq!(report.post_request_body, RestDto::new(1, "Hello World"));
    assert_eq!(report.post_for_list, vec![RestDto::new(1, "Hello"), RestDto::new(2, "World")]);
}

#[test]
fn walkthrough_stops_on_missing_download() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(dir.path());

    let options = WalkthroughOptions {
        download: "not-there.txt".to_string(),
        ..WalkthroughOptions::default()
    };
    let err = Walkthrough::new(&format!("http://{addr}")).run(&options).unwrap_err();
    assert!(matches!(
        err,
        DemoError::Api {
            endpoint: "download",
            source: ApiError::NotFound
        }
    ));
}

#[test]
fn walkthrough_saves_streamed_download() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("test.txt"), "downloaded content").unwrap();
    let addr = spawn_server(dir.path());

    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("saved.txt");
    let options = WalkthroughOptions {
        save_to: Some(dest.clone()),
        ..WalkthroughOptions::default()
    };
    let report = Walkthrough::new(&format!("http://{addr}")).run(&options).unwrap();

    let saved = report.saved_download.unwrap();
    assert_eq!(saved.file_name.as_deref(), Some("test.txt"));
    assert_eq!(saved.bytes_written, 18);
    assert_eq!(std::fs::read(&dest).unwrap(), b"downloaded content");
}

#[test]
fn large_download_streams_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let content: Vec<u8> = (0..LARGE_FILE_BYTES).map(|i| (i % 251) as u8).collect();
    std::fs::write(dir.path().join("large.bin"), &content).unwrap();
    let addr = spawn_server(dir.path());

    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("large.bin");
    let client = RestClient::new(&format!("http://{addr}"));
    let saved = download_to(&agent(), &client, "large.bin", &dest).unwrap();

    assert_eq!(saved.bytes_written, LARGE_FILE_BYTES as u64);
    assert_eq!(saved.content_length, Some(LARGE_FILE_BYTES as u64));
    assert_eq!(std::fs::read(&dest).unwrap(), content);
}

#[test]
fn large_download_fits_in_buffered_execute() {
    let dir = tempfile::tempdir().unwrap();
    let content = vec![b'x'; LARGE_FILE_BYTES];
    std::fs::write(dir.path().join("large.bin"), &content).unwrap();
    let addr = spawn_server(dir.path());

    let client = RestClient::new(&format!("http://{addr}"));
    let req = client.build_download("large.bin").unwrap();
    let download = client.parse_download(execute(&agent(), req).unwrap()).unwrap();

    assert_eq!(download.bytes.len(), LARGE_FILE_BYTES);
    assert_eq!(download.content_length, Some(LARGE_FILE_BYTES as u64));
}

#[test]
fn streamed_download_of_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(dir.path());

    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("missing.txt");
    let client = RestClient::new(&format!("http://{addr}"));
    let err = download_to(&agent(), &client, "missing.txt", &dest).unwrap_err();

    assert!(matches!(
        err,
        DemoError::Api {
            endpoint: "download",
            source: ApiError::NotFound
        }
    ));
    assert!(!dest.exists());
}

//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Bodies are compared as parsed JSON so field
//! ordering inside objects cannot cause false negatives.

use rest_core::{ApiError, HttpMethod, HttpResponse, RestClient, RestDto};

const BASE_URL: &str = "http://localhost:8080";

fn client() -> RestClient {
    RestClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: sim.get("headers").map(string_pairs).unwrap_or_default(),
        body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Path variables
// ---------------------------------------------------------------------------

#[test]
fn get_by_path_test_vectors() {
    let raw = include_str!("../../test-vectors/get_by_path.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input"]["id"].as_i64().unwrap() as i32;
        let dto_name = case["input"]["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_get_by_path(id, dto_name);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        let dto = c.parse_get_by_path(simulated(case)).unwrap();
        let expected: RestDto = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(dto, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Header echo
// ---------------------------------------------------------------------------

#[test]
fn header_test_vectors() {
    let raw = include_str!("../../test-vectors/header.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = string_pairs(&case["input_headers"]);
        let borrowed: Vec<(&str, &str)> = input.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let expected_req = &case["expected_request"];

        let req = c.build_header(&borrowed);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, input, "{name}: headers");

        let echo = c.parse_header(simulated(case)).unwrap();
        let expected_names: Vec<&str> = case["expected_names"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n.as_str().unwrap())
            .collect();
        assert_eq!(echo.names().collect::<Vec<_>>(), expected_names, "{name}: header order");

        // Every value we sent appears under its name, in sending order.
        for (header, _) in &input {
            let sent: Vec<&str> = input
                .iter()
                .filter(|(k, _)| k == header)
                .map(|(_, v)| v.as_str())
                .collect();
            assert_eq!(echo.get(header).unwrap(), sent.as_slice(), "{name}: values of {header}");
        }
    }
}

// ---------------------------------------------------------------------------
// JSON list round-trip
// ---------------------------------------------------------------------------

#[test]
fn post_for_list_test_vectors() {
    let raw = include_str!("../../test-vectors/post_for_list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: Vec<RestDto> = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_post_for_list(&input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected_req["headers"]), "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        let list = c.parse_post_for_list(simulated(case)).unwrap();
        let expected: Vec<RestDto> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(list, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

#[test]
fn download_test_vectors() {
    let raw = include_str!("../../test-vectors/download.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let filename = case["input_filename"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_download(filename).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

        let result = c.parse_download(simulated(case));
        match case.get("expected_error").and_then(|e| e.as_str()) {
            Some("not_found") => {
                assert!(matches!(result, Err(ApiError::NotFound)), "{name}: expected NotFound");
            }
            Some(other) => panic!("unknown expected_error: {other}"),
            None => {
                let download = result.unwrap();
                let expected = &case["expected_result"];
                assert_eq!(download.file_name.as_deref(), expected["file_name"].as_str(), "{name}: file name");
                assert_eq!(download.content_length, expected["content_length"].as_u64(), "{name}: length");
                assert_eq!(download.bytes, expected["body"].as_str().unwrap().as_bytes(), "{name}: body");
            }
        }
    }
}

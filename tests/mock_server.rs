//! Integration tests against an in-process mock conversion server.
//!
//! The mock is a bare tokio TCP listener speaking just enough HTTP/1.1 to
//! capture each request and answer with a canned status and body, so the
//! tests need no network access and no real server.
//!
//! Run with:
//!   cargo test --test mock_server -- --nocapture

use img2ascii_client::{
    about, convert, convert_bytes, ClientConfig, ConvertError, ConvertParams, ErrorClass,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ── Mock server ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CapturedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

/// Start a server answering every request with `status` and `body`.
/// Returns a client config pointing at it and the captured-request log.
async fn spawn_server(status: u16, body: &'static str) -> (ClientConfig, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&captured);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut stream = stream;
                // Record before replying so the client never observes a
                // response whose request is not logged yet.
                if let Some(req) = read_request(&mut stream).await {
                    log.lock().unwrap().push(req);
                    write_reply(&mut stream, status, body).await;
                }
            });
        }
    });

    let config = ClientConfig::builder()
        .endpoint(format!("http://{addr}"))
        .timeout_secs(10)
        .build()
        .unwrap();
    (config, captured)
}

async fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let header = |name: &str| {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };
    let chunked = header("transfer-encoding")
        .map(|v| v.eq_ignore_ascii_case("chunked"))
        .unwrap_or(false);
    let content_length: usize = header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut raw_body = buf[header_end + 4..].to_vec();
    loop {
        let complete = if chunked {
            raw_body.ends_with(b"0\r\n\r\n")
        } else {
            raw_body.len() >= content_length
        };
        if complete {
            break;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        raw_body.extend_from_slice(&chunk[..n]);
    }
    let body_bytes = if chunked {
        decode_chunked(&raw_body)
    } else {
        raw_body
    };

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: body_bytes,
    })
}

async fn write_reply(stream: &mut TcpStream, status: u16, body: &str) {
    let reply = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    if stream.write_all(reply.as_bytes()).await.is_ok() {
        stream.shutdown().await.ok();
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn decode_chunked(mut raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(line_end) = find(raw, b"\r\n") {
        let size_str = String::from_utf8_lossy(&raw[..line_end]);
        let size = usize::from_str_radix(size_str.trim(), 16).unwrap_or(0);
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        out.extend_from_slice(&raw[start..start + size]);
        raw = &raw[start + size + 2..];
    }
    out
}

// ── Multipart helpers ────────────────────────────────────────────────────────

struct FormPart {
    headers: String,
    body: Vec<u8>,
}

/// Split a multipart/form-data body into (field name, part).
fn parse_multipart(req: &CapturedRequest) -> Vec<(String, FormPart)> {
    let content_type = req.header("content-type").expect("content-type header");
    assert!(
        content_type.starts_with("multipart/form-data"),
        "unexpected content type: {content_type}"
    );
    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .expect("boundary")
        .trim_matches('"');
    let delimiter = format!("--{boundary}");

    let mut parts = Vec::new();
    let mut rest = req.body.as_slice();
    while let Some(start) = find(rest, delimiter.as_bytes()) {
        rest = &rest[start + delimiter.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        let rest_part = rest.strip_prefix(b"\r\n").unwrap_or(rest);
        let Some(end) = find(rest_part, delimiter.as_bytes()) else {
            break;
        };
        let part = &rest_part[..end];
        let split = find(part, b"\r\n\r\n").expect("part header terminator");
        let headers = String::from_utf8_lossy(&part[..split]).to_string();
        let mut body = part[split + 4..].to_vec();
        if body.ends_with(b"\r\n") {
            body.truncate(body.len() - 2);
        }
        let name = headers
            .split("name=\"")
            .nth(1)
            .and_then(|s| s.split('"').next())
            .unwrap_or_default()
            .to_string();
        parts.push((name, FormPart { headers, body }));
        rest = rest_part;
    }
    parts
}

fn part<'a>(parts: &'a [(String, FormPart)], name: &str) -> &'a FormPart {
    parts
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, p)| p)
        .unwrap_or_else(|| panic!("no '{name}' part"))
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-pixels";

fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn smoke_params() -> ConvertParams {
    ConvertParams::new(300, "@%#*+=-:. ")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn returns_ascii_and_first_line_width() {
    let (config, captured) = spawn_server(200, r#"{"ascii": "AB\nCD"}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    let output = convert(&image, &smoke_params(), &config)
        .await
        .expect("conversion should succeed");

    assert_eq!(output.ascii, "AB\nCD");
    assert_eq!(output.status, 200);
    assert_eq!(output.first_line_width(), 2);
    assert_eq!(captured.lock().unwrap().len(), 1, "exactly one request");
}

#[tokio::test]
async fn sends_multipart_with_file_and_params() {
    let (config, captured) = spawn_server(200, r#"{"ascii": "@"}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    convert(&image, &smoke_params(), &config).await.unwrap();

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/convert");

    let parts = parse_multipart(req);
    assert_eq!(parts.len(), 2, "file + params");

    let params = part(&parts, "params");
    assert!(
        params.headers.to_lowercase().contains("application/json"),
        "params headers: {}",
        params.headers
    );
    let decoded: Value = serde_json::from_slice(&params.body).expect("params is JSON");
    assert_eq!(decoded, json!({"size": 300, "charSet": "@%#*+=-:. "}));

    let file = part(&parts, "file");
    assert!(file.headers.contains("filename=\"images.png\""), "{}", file.headers);
    assert!(file.headers.to_lowercase().contains("image/png"), "{}", file.headers);
    assert_eq!(file.body, PNG_BYTES);
}

#[tokio::test]
async fn jpeg_is_labelled_as_jpeg() {
    let (config, captured) = spawn_server(200, r##"{"ascii": "#"}"##).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.jpg", &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0]);

    convert(&image, &ConvertParams::new(50, "#. "), &config)
        .await
        .unwrap();

    let requests = captured.lock().unwrap().clone();
    let parts = parse_multipart(&requests[0]);
    let file = part(&parts, "file");
    assert!(file.headers.contains("filename=\"images.jpg\""));
    assert!(file.headers.to_lowercase().contains("image/jpeg"));

    let decoded: Value = serde_json::from_slice(&part(&parts, "params").body).unwrap();
    assert_eq!(decoded, json!({"size": 50, "charSet": "#. "}));
}

#[tokio::test]
async fn convert_bytes_sends_given_filename() {
    let (config, captured) = spawn_server(200, r#"{"ascii": "xy"}"#).await;

    let output = convert_bytes("upload.png", PNG_BYTES.to_vec(), &smoke_params(), &config)
        .await
        .unwrap();
    assert_eq!(output.ascii, "xy");

    let requests = captured.lock().unwrap().clone();
    let parts = parse_multipart(&requests[0]);
    assert!(part(&parts, "file").headers.contains("filename=\"upload.png\""));
}

#[tokio::test]
async fn non_json_body_is_a_format_error() {
    let (config, _) = spawn_server(200, "definitely not json").await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    let err = convert(&image, &smoke_params(), &config).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::ResponseFormat);
    assert!(matches!(err, ConvertError::MalformedResponse { status: 200, .. }));
}

#[tokio::test]
async fn server_error_reply_is_missing_field() {
    let (config, _) = spawn_server(400, r#"{"error": "Unsupported image type"}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    let err = convert(&image, &smoke_params(), &config).await.unwrap_err();
    match err {
        ConvertError::MissingAsciiField {
            status,
            server_error,
        } => {
            assert_eq!(status, 400);
            assert_eq!(server_error.as_deref(), Some("Unsupported image type"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_success_status_with_ascii_still_succeeds() {
    let (config, _) = spawn_server(500, r#"{"ascii": "@@\n.."}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    let output = convert(&image, &smoke_params(), &config).await.unwrap();
    assert_eq!(output.status, 500);
    assert_eq!(output.ascii, "@@\n..");
}

#[tokio::test]
async fn missing_image_sends_nothing() {
    let (config, captured) = spawn_server(200, r#"{"ascii": "x"}"#).await;

    let err = convert("/definitely/not/a/real/image.png", &smoke_params(), &config)
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::FileAccess);
    assert!(matches!(err, ConvertError::FileNotFound { .. }));
    assert!(captured.lock().unwrap().is_empty(), "no request expected");
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    // Bind then drop to obtain a port nobody is listening on.
    let addr = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let config = ClientConfig::builder()
        .endpoint(format!("http://{addr}"))
        .build()
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    let err = convert(&image, &smoke_params(), &config).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::Network, "got: {err}");
}

#[tokio::test]
async fn about_route() {
    let (config, captured) = spawn_server(
        200,
        r#"{"about": "Project of image translation to ASCII", "tip": "Use contrasting images."}"#,
    )
    .await;

    let info = about(&config).await.unwrap();
    assert_eq!(info.about, "Project of image translation to ASCII");
    assert_eq!(info.tip.as_deref(), Some("Use contrasting images."));

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/about");
}

#[tokio::test]
async fn convert_then_save_round_trips() {
    let (config, _) = spawn_server(200, r#"{"ascii": "@%#\n*+=\n-:.\n"}"#).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);
    let out = dir.path().join("temp.txt");

    let output = convert(&image, &smoke_params(), &config).await.unwrap();
    img2ascii_client::save_to(&out, &output.ascii).unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "@%#\n*+=\n-:.\n");
}

#[tokio::test]
async fn about_rejects_array_body() {
    let (config, _) = spawn_server(200, r#"["Project of image translation", "tip"]"#).await;

    let err = about(&config).await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::ResponseFormat);
    assert!(matches!(err, ConvertError::MalformedResponse { .. }), "got: {err}");
}

#[tokio::test]
async fn array_body_is_not_a_conversion() {
    let (config, _) = spawn_server(200, r#"["AB\nCD", null]"#).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(dir.path(), "images.png", PNG_BYTES);

    let err = convert(&image, &smoke_params(), &config).await.unwrap_err();
    assert!(matches!(err, ConvertError::MalformedResponse { status: 200, .. }), "got: {err}");
}

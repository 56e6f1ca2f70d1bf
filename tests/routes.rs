//! Route integration tests against a `wiremock` stand-in for Gotenberg.
//!
//! Each test mounts the endpoint it exercises, sends a real multipart
//! request, and inspects what arrived on the wire.
//!
//! Run with:
//!   cargo test --test routes -- --nocapture

use gotenberg_client::{
    ChromiumPage, ChromiumRender, ClientConfig, GotenbergClient, GotenbergError, IndexFiles,
    Metadata, MetadataOptions, OfficeMerge, PageOrientation, PageSize, PdfAFormat, PdfOutput,
    Response, RetryPolicy, Route, ServiceStatus, SplitMode, SplitOptions,
};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ── Test helpers ─────────────────────────────────────────────────────────────

const PDF_BYTES: &[u8] = b"%PDF-1.7\n%fake\n";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn pdf_reply() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(PDF_BYTES.to_vec(), "application/pdf")
}

fn zip_reply(members: &[(&str, &[u8])]) -> ResponseTemplate {
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut zw = zip::ZipWriter::new(&mut buf);
        let opts = zip::write::SimpleFileOptions::default();
        for (name, data) in members {
            zw.start_file(*name, opts).unwrap();
            zw.write_all(data).unwrap();
        }
        zw.finish().unwrap();
    }
    ResponseTemplate::new(200).set_body_raw(buf.into_inner(), "application/zip")
}

fn write_file(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, data).unwrap();
    p
}

async fn only_request(server: &MockServer) -> Request {
    let mut received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1, "expected exactly one request");
    received.remove(0)
}

fn body_text(req: &Request) -> String {
    String::from_utf8_lossy(&req.body).into_owned()
}

/// Form field `name` with `value` appears as its own multipart section.
fn assert_field(body: &str, name: &str, value: &str) {
    let marker = format!("name=\"{name}\"\r\n\r\n{value}\r\n");
    assert!(body.contains(&marker), "missing field {name}={value} in:\n{body}");
}

fn assert_upload(body: &str, name: &str) {
    let marker = format!("filename=\"{name}\"");
    assert!(body.contains(&marker), "missing upload {name} in:\n{body}");
}

// ── Chromium ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn html_to_pdf_sends_fields_and_files() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/html"))
        .respond_with(pdf_reply())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let css = write_file(dir.path(), "style.css", b"body { color: red }");

    let client = GotenbergClient::new(server.uri()).unwrap();
    let response = client
        .chromium()
        .html_to_pdf()
        .string_index("<h1>Hello</h1>")
        .resource(&css)
        .size(PageSize::A4)
        .orient(PageOrientation::Landscape)
        .pdf_format(PdfAFormat::A2b)
        .run()
        .await
        .unwrap();

    assert!(!response.is_archive());
    assert_eq!(response.body().as_ref(), PDF_BYTES);

    let req = only_request(&server).await;
    let content_type = req.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = body_text(&req);
    assert_field(&body, "paperWidth", "8.27in");
    assert_field(&body, "paperHeight", "11.7in");
    assert_field(&body, "landscape", "true");
    assert_field(&body, "pdfa", "PDF/A-2b");
    assert_upload(&body, "index.html");
    assert_upload(&body, "style.css");
    assert!(body.contains("<h1>Hello</h1>"));
    assert!(body.contains("body { color: red }"));
}

#[tokio::test]
async fn url_route_without_files_is_still_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/url"))
        .respond_with(pdf_reply())
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .render_wait(1.5)
        .unwrap()
        .run()
        .await
        .unwrap();

    let req = only_request(&server).await;
    let content_type = req.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = body_text(&req);
    assert_field(&body, "url", "https://example.com");
    assert_field(&body, "waitDelay", "1.5s");
}

#[tokio::test]
async fn non_ascii_upload_is_renamed_with_identical_bytes() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/html"))
        .respond_with(pdf_reply())
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let content = "résumé image bytes \u{1F600}".as_bytes();
    let image = write_file(dir.path(), "résumé.png", content);

    let client = GotenbergClient::new(server.uri()).unwrap();
    client
        .chromium()
        .html_to_pdf()
        .string_index("<img src=\"r_sum_.png\">")
        .resource(&image)
        .run()
        .await
        .unwrap();

    let req = only_request(&server).await;
    let body = body_text(&req);
    assert_upload(&body, "r_sum_.png");
    assert!(!body.contains("filename=\"résumé.png\""));
    assert!(req
        .body
        .windows(content.len())
        .any(|window| window == content));
    // The original stays where it was.
    assert!(image.exists());
}

#[tokio::test]
async fn non_ascii_upload_in_subfolder_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/html"))
        .respond_with(pdf_reply())
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let image = write_file(dir.path(), "a.png", b"nested image bytes");

    let client = GotenbergClient::new(server.uri()).unwrap();
    client
        .chromium()
        .html_to_pdf()
        .string_index("<img src=\"img/_.png\">")
        .resource_named(&image, "img/ü.png")
        .run()
        .await
        .unwrap();

    let body = body_text(&only_request(&server).await);
    // reqwest percent-encodes the separator inside the filename parameter.
    assert!(
        body.contains("filename=\"img/_.png\"") || body.contains("filename*=utf-8''img%2F_.png"),
        "missing nested upload in:\n{body}"
    );
    assert!(!body.contains('ü'));
    assert!(body.contains("nested image bytes"));
}

#[tokio::test]
async fn missing_attachment_is_reported_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(pdf_reply())
        .expect(0)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let err = client
        .chromium()
        .html_to_pdf()
        .index("/definitely/not/here/index.html")
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, GotenbergError::AttachmentIo { .. }));
    assert!(!err.was_sent());
}

#[tokio::test]
async fn reset_route_can_be_reused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/html"))
        .respond_with(pdf_reply())
        .expect(2)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let mut route = client
        .chromium()
        .html_to_pdf()
        .string_index("<p>first</p>")
        .print_background(true)
        .trace("first-trace");
    route.run().await.unwrap();

    route.reset();
    let route = route.string_index("<p>second</p>");
    route.run().await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    let second = body_text(&received[1]);
    assert!(second.contains("<p>second</p>"));
    assert!(!second.contains("<p>first</p>"));
    assert!(!second.contains("printBackground"));
    assert!(received[1].headers.get("gotenberg-trace").is_none());
}

// ── Headers ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn client_and_route_headers_reach_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/html"))
        .and(header("Gotenberg-Trace", "req-123"))
        .and(header("Gotenberg-Output-Filename", "report"))
        .and(header("Gotenberg-Webhook-Url", "http://hooks.local/ok"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .basic_auth("user", Some("pass"))
        .build()
        .unwrap();
    let mut client = GotenbergClient::from_config(config).unwrap();
    client.add_webhook_url("http://hooks.local/ok");

    let raw = client
        .chromium()
        .html_to_pdf()
        .string_index("<p/>")
        .trace("req-123")
        .output_filename("report")
        .execute()
        .await
        .unwrap();
    assert_eq!(raw.status().as_u16(), 204);
}

#[tokio::test]
async fn invalid_header_value_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(pdf_reply())
        .expect(0)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let err = client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .trace("bad\nvalue")
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, GotenbergError::InvalidHeader { .. }));
}

// ── Retry ────────────────────────────────────────────────────────────────────

fn quick_policy(attempts: u32) -> RetryPolicy {
    RetryPolicy::new(attempts, Duration::from_millis(10), 1.0).unwrap()
}

#[tokio::test]
async fn persistent_503_exhausts_attempts() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/url"))
        .respond_with(ResponseTemplate::new(503).set_body_string("chromium restarting"))
        .expect(3)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let err = client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .run_with_retry(&quick_policy(3))
        .await
        .unwrap_err();

    match &err {
        GotenbergError::MaxRetriesExceeded { attempts, response } => {
            assert_eq!(*attempts, 3);
            assert_eq!(response.status().as_u16(), 503);
            assert_eq!(response.text(), "chromium restarting");
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
    assert!(!err.is_server_error());
}

#[tokio::test]
async fn transient_503_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/url"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/url"))
        .respond_with(pdf_reply())
        .expect(1)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let response = client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .run_with_retry(&quick_policy(5))
        .await
        .unwrap();
    assert_eq!(response.body().as_ref(), PDF_BYTES);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/chromium/convert/url"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid form data"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let err = client
        .chromium()
        .url_to_pdf()
        .url("not a url")
        .run_with_retry(&quick_policy(5))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert_eq!(err.response().unwrap().text(), "Invalid form data");
}

#[tokio::test]
async fn single_503_without_retry_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let err = client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .run()
        .await
        .unwrap_err();
    assert!(err.is_server_error());
}

// ── LibreOffice and PDF engines ──────────────────────────────────────────────

#[tokio::test]
async fn office_documents_come_back_as_archive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/libreoffice/convert"))
        .respond_with(zip_reply(&[("a.pdf", PDF_BYTES), ("b.pdf", PDF_BYTES)]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.docx", b"docx");
    let b = write_file(dir.path(), "b.odt", b"odt");

    let client = GotenbergClient::new(server.uri()).unwrap();
    let response = client
        .libre_office()
        .to_pdf()
        .convert_files([&a, &b])
        .run()
        .await
        .unwrap();

    let archive = match response {
        Response::Archive(archive) => archive,
        Response::SingleFile(_) => panic!("expected a zip"),
    };
    let out = TempDir::new().unwrap();
    let mut written = archive.extract_to(out.path()).unwrap();
    written.sort();
    assert_eq!(written, vec![out.path().join("a.pdf"), out.path().join("b.pdf")]);
    assert_eq!(std::fs::read(out.path().join("b.pdf")).unwrap(), PDF_BYTES);

    let body = body_text(&only_request(&server).await);
    assert_upload(&body, "a.docx");
    assert_upload(&body, "b.odt");
}

#[tokio::test]
async fn merged_office_documents_are_single_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/libreoffice/convert"))
        .respond_with(pdf_reply())
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.docx", b"docx");
    let b = write_file(dir.path(), "b.docx", b"docx");

    let client = GotenbergClient::new(server.uri()).unwrap();
    let response = client
        .libre_office()
        .to_pdf()
        .convert(&a)
        .convert(&b)
        .merge(true)
        .run()
        .await
        .unwrap();
    assert!(!response.is_archive());

    let body = body_text(&only_request(&server).await);
    assert_field(&body, "merge", "true");
}

#[tokio::test]
async fn merge_uploads_carry_order_prefixes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/pdfengines/merge"))
        .respond_with(pdf_reply())
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let z = write_file(dir.path(), "z.pdf", PDF_BYTES);
    let a = write_file(dir.path(), "a.pdf", PDF_BYTES);

    let client = GotenbergClient::new(server.uri()).unwrap();
    let metadata = Metadata::new().author("Merge Bot");
    client
        .merge()
        .merge()
        .merge([&z, &a])
        .metadata(&metadata)
        .unwrap()
        .run()
        .await
        .unwrap();

    let body = body_text(&only_request(&server).await);
    assert_upload(&body, "0001_z.pdf");
    assert_upload(&body, "0002_a.pdf");
    assert!(body.contains(r#""Author":"Merge Bot""#));
}

#[tokio::test]
async fn split_returns_archive_of_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/pdfengines/split"))
        .respond_with(zip_reply(&[("big_0.pdf", PDF_BYTES), ("big_1.pdf", PDF_BYTES)]))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let big = write_file(dir.path(), "big.pdf", PDF_BYTES);

    let client = GotenbergClient::new(server.uri()).unwrap();
    let response = client
        .split()
        .split()
        .split(&big)
        .split_mode(SplitMode::Intervals)
        .split_span("1")
        .run()
        .await
        .unwrap();

    let archive = response.into_archive().unwrap();
    assert_eq!(archive.file_names().unwrap(), vec!["big_0.pdf", "big_1.pdf"]);

    let body = body_text(&only_request(&server).await);
    assert_field(&body, "splitMode", "intervals");
    assert_field(&body, "splitSpan", "1");
}

#[tokio::test]
async fn flatten_sends_each_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/pdfengines/flatten"))
        .respond_with(pdf_reply())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let form = write_file(dir.path(), "form.pdf", PDF_BYTES);

    let client = GotenbergClient::new(server.uri()).unwrap();
    let response = client.flatten().flatten().flatten(&form).run().await.unwrap();
    assert!(!response.is_archive());

    let body = body_text(&only_request(&server).await);
    assert_upload(&body, "form.pdf");
}

#[tokio::test]
async fn read_metadata_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/forms/pdfengines/metadata/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "doc.pdf": { "Author": "Ada", "PageCount": 2 }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let doc = write_file(dir.path(), "doc.pdf", PDF_BYTES);

    let client = GotenbergClient::new(server.uri()).unwrap();
    let map = client.metadata().read().file(&doc).fetch().await.unwrap();
    assert_eq!(map["doc.pdf"]["Author"], "Ada");
    assert_eq!(map["doc.pdf"]["PageCount"], 2);
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_down_module_on_503() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "status": "down",
            "details": {
                "chromium": {"status": "up", "timestamp": "2024-05-01T08:00:00Z"},
                "libreoffice": {"status": "down", "timestamp": "2024-05-01T08:00:01Z"}
            }
        })))
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let health = client.health().check().await.unwrap();
    assert_eq!(health.overall, ServiceStatus::Down);
    assert!(health.chromium.unwrap().is_up());
    assert!(!health.libreoffice.unwrap().is_up());
}

#[tokio::test]
async fn health_other_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = GotenbergClient::new(server.uri()).unwrap();
    let err = client.health().check().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
}

// ── Blocking ─────────────────────────────────────────────────────────────────

#[test]
fn blocking_client_runs_from_plain_thread() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/forms/chromium/convert/url"))
            .respond_with(pdf_reply())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "up", "details": {}
            })))
            .mount(&server)
            .await;
        server
    });

    let client = GotenbergClient::blocking(ClientConfig::new(server.uri()).unwrap()).unwrap();
    let response = client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .run_blocking()
        .unwrap();
    assert_eq!(response.body().as_ref(), PDF_BYTES);
    assert!(client.health().check_blocking().unwrap().is_up());

    drop(client);
    rt.block_on(async move { drop(server) });
}

#[tokio::test]
async fn async_client_refuses_blocking_calls() {
    let client = GotenbergClient::new("http://localhost:3000").unwrap();
    let err = client
        .chromium()
        .url_to_pdf()
        .url("https://example.com")
        .run_blocking()
        .unwrap_err();
    assert!(matches!(err, GotenbergError::BlockingUnavailable));
}

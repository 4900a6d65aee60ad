mod common;

use std::sync::Arc;

use courier::http::request::{Method, Request, RequestBuilder};
use courier::http::encoding::CompressionError;
use courier::http::response::{Response, ResponseBuilder, StatusCode};
use courier::http::router::{OCTET_STREAM, Router, TEXT_PLAIN, finalize};
use courier::storage::{FileStore, Storage, StorageError};

fn get(path: &str) -> RequestBuilder {
    RequestBuilder::new().method(Method::GET).path(path)
}

fn post(path: &str, body: &str) -> RequestBuilder {
    RequestBuilder::new().method(Method::POST).path(path).body(body)
}

fn no_files() -> Router<FileStore> {
    Router::new(None)
}

fn files_in(name: &str) -> (Router<FileStore>, std::path::PathBuf) {
    let dir = common::temp_dir(name);
    (Router::new(Some(Arc::new(FileStore::new(&dir)))), dir)
}

async fn respond(router: &Router<impl Storage>, req: Request) -> Response {
    router.respond(&req).await
}

#[tokio::test]
async fn test_root_is_empty_ok() {
    let res = respond(&no_files(), get("/").build().unwrap()).await;

    assert_eq!(res.code(), 200);
    assert!(res.body.is_empty());
    assert_eq!(res.headers.get("Content-Length"), Some("0"));
    assert!(!res.headers.contains_key("Content-Type"));
}

#[tokio::test]
async fn test_echo_returns_path_remainder() {
    let res = respond(&no_files(), get("/echo/abc%20def").build().unwrap()).await;

    assert_eq!(res.code(), 200);
    assert_eq!(res.headers.get("Content-Type"), Some(TEXT_PLAIN));
    assert_eq!(res.body, b"abc%20def".to_vec());
    assert_eq!(res.headers.get("Content-Length"), Some("9"));
}

#[tokio::test]
async fn test_echo_without_trailing_slash_is_not_found() {
    let res = respond(&no_files(), get("/echo").build().unwrap()).await;
    assert_eq!(res.code(), 404);
}

#[tokio::test]
async fn test_user_agent_is_echoed() {
    let req = get("/user-agent").header("User-Agent", "curl/8.0").build().unwrap();
    let res = respond(&no_files(), req).await;

    assert_eq!(res.code(), 200);
    assert_eq!(res.headers.get("Content-Type"), Some(TEXT_PLAIN));
    assert_eq!(res.body, b"curl/8.0".to_vec());
}

#[tokio::test]
async fn test_user_agent_missing_header_is_not_found() {
    let res = respond(&no_files(), get("/user-agent").build().unwrap()).await;
    assert_eq!(res.code(), 404);
}

#[tokio::test]
async fn test_unknown_path_is_bare_not_found() {
    let res = respond(&no_files(), get("/nonexistent").build().unwrap()).await;

    assert_eq!(res.code(), 404);
    assert_eq!(res.status.reason, "Not Found");
    assert!(res.body.is_empty());
    assert!(!res.headers.contains_key("Content-Type"));
    let keys: Vec<&str> = res.headers.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["Content-Length"]);
}

#[tokio::test]
async fn test_other_methods_are_not_found() {
    for method in [Method::PUT, Method::DELETE, Method::Other("BREW".into())] {
        let req = RequestBuilder::new().method(method).path("/").build().unwrap();
        let res = respond(&no_files(), req).await;
        assert_eq!(res.code(), 404);
    }

    let res = respond(&no_files(), post("/echo/x", "").build().unwrap()).await;
    assert_eq!(res.code(), 404);
}

#[tokio::test]
async fn test_files_without_directory_are_not_found() {
    let router = no_files();

    let res = respond(&router, post("/files/foo.txt", "hello").build().unwrap()).await;
    assert_eq!(res.code(), 404);

    let res = respond(&router, get("/files/foo.txt").build().unwrap()).await;
    assert_eq!(res.code(), 404);
}

#[tokio::test]
async fn test_file_round_trip() {
    let (router, dir) = files_in("round-trip");

    let res = respond(&router, post("/files/foo.txt", "hello").build().unwrap()).await;
    assert_eq!(res.code(), 201);
    assert_eq!(res.status.reason, "Created");
    assert_eq!(std::fs::read(dir.join("foo.txt")).unwrap(), b"hello");

    let res = respond(&router, get("/files/foo.txt").build().unwrap()).await;
    assert_eq!(res.code(), 200);
    assert_eq!(res.headers.get("Content-Type"), Some(OCTET_STREAM));
    assert_eq!(res.body, b"hello".to_vec());
}

#[tokio::test]
async fn test_file_read_strips_one_trailing_newline() {
    let (router, dir) = files_in("newline");
    std::fs::write(dir.join("lines.txt"), "a\nb\n\n").unwrap();

    let res = respond(&router, get("/files/lines.txt").build().unwrap()).await;
    assert_eq!(res.body, b"a\nb\n".to_vec());
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let (router, _dir) = files_in("missing");

    let res = respond(&router, get("/files/nope").build().unwrap()).await;
    assert_eq!(res.code(), 404);
    assert!(res.body.is_empty());
}

#[tokio::test]
async fn test_escaping_file_names_are_not_found() {
    let (router, _dir) = files_in("escape");

    let res = respond(&router, get("/files/../secret").build().unwrap()).await;
    assert_eq!(res.code(), 404);

    let res = respond(&router, post("/files/../secret", "x").build().unwrap()).await;
    assert_eq!(res.code(), 404);
}

#[derive(Debug)]
struct FailingStore;

impl Storage for FailingStore {
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::NotFound(name.to_string()))
    }

    async fn write_file(&self, name: &str, _contents: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Io {
            name: name.to_string(),
            source: std::io::Error::other("disk full"),
        })
    }
}

#[tokio::test]
async fn test_write_failure_is_internal_error() {
    let router = Router::new(Some(Arc::new(FailingStore)));

    let res = respond(&router, post("/files/foo.txt", "hello").build().unwrap()).await;
    assert_eq!(res.code(), 500);
    assert_eq!(res.status.reason, "Internal Server Error");
    assert_eq!(res.headers.get("Content-Length"), Some("0"));
}

#[tokio::test]
async fn test_gzip_negotiated() {
    let req = get("/echo/abc")
        .header("Accept-Encoding", "invalid-encoding, gzip, deflate")
        .build()
        .unwrap();
    let res = respond(&no_files(), req).await;

    assert_eq!(res.headers.get("Content-Encoding"), Some("gzip"));
    assert_eq!(common::gunzip(&res.body), b"abc".to_vec());
    assert_eq!(
        res.headers.get("Content-Length"),
        Some(res.body.len().to_string().as_str())
    );
}

#[tokio::test]
async fn test_gzip_applies_to_not_found_too() {
    let req = get("/nope").header("Accept-Encoding", "gzip").build().unwrap();
    let res = respond(&no_files(), req).await;

    assert_eq!(res.code(), 404);
    assert_eq!(res.headers.get("Content-Encoding"), Some("gzip"));
    assert!(common::gunzip(&res.body).is_empty());
}

#[tokio::test]
async fn test_other_encodings_are_ignored() {
    let req = get("/echo/abc").header("Accept-Encoding", "deflate, br").build().unwrap();
    let res = respond(&no_files(), req).await;

    assert!(!res.headers.contains_key("Content-Encoding"));
    assert_eq!(res.body, b"abc".to_vec());
}

#[tokio::test]
async fn test_connection_close_is_mirrored_before_length() {
    let req = get("/echo/x").header("Connection", "close").build().unwrap();
    let res = respond(&no_files(), req).await;

    let keys: Vec<&str> = res.headers.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["Content-Type", "Connection", "Content-Length"]);
    assert_eq!(res.headers.get("Connection"), Some("close"));
}

fn failing_gzip(_: &[u8]) -> Result<Vec<u8>, CompressionError> {
    Err(CompressionError::from(std::io::Error::other("deflate stream broken")))
}

#[test]
fn test_compression_failure_becomes_empty_internal_error() {
    let req = get("/echo/abc")
        .header("Accept-Encoding", "gzip")
        .header("Connection", "close")
        .build()
        .unwrap();
    let routed = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", TEXT_PLAIN)
        .body("abc")
        .build();

    let res = finalize(&req, routed, failing_gzip);

    assert_eq!(res.code(), 500);
    assert_eq!(res.status.reason, "Internal Server Error");
    assert!(res.body.is_empty());
    assert!(!res.headers.contains_key("Content-Encoding"));
    assert!(!res.headers.contains_key("Content-Type"));
    let headers: Vec<(&str, &str)> = res.headers.iter().collect();
    assert_eq!(headers, [("Connection", "close"), ("Content-Length", "0")]);
}

#[test]
fn test_compressor_unused_without_gzip_token() {
    let req = get("/echo/abc").header("Accept-Encoding", "deflate").build().unwrap();
    let routed = Response::ok("abc");

    let res = finalize(&req, routed, failing_gzip);

    assert_eq!(res.code(), 200);
    assert_eq!(res.body, b"abc".to_vec());
}

//! Route dispatch and response finalization.
//!
//! | Method | Path            | Response                                   |
//! |--------|-----------------|--------------------------------------------|
//! | POST   | `/files/<name>` | store the body, 201 (404 without storage)  |
//! | GET    | `/`             | 200, empty                                 |
//! | GET    | `/echo/<text>`  | 200, `text/plain`, `<text>`                |
//! | GET    | `/user-agent`   | 200, `text/plain`, the `User-Agent` value  |
//! | GET    | `/files/<name>` | 200, `application/octet-stream`, contents  |
//! | *      | anything else   | 404, empty                                 |
//!
//! After routing, the body is gzip-compressed when the client accepts it,
//! `Connection: close` is mirrored back, and `Content-Length` goes last.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::http::encoding::{self, CompressionError, GZIP};
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::parser::strip_trailing_newline;
use crate::storage::{Storage, StorageError};

const FILES_PREFIX: &str = "/files/";
const ECHO_PREFIX: &str = "/echo/";
const USER_AGENT_PREFIX: &str = "/user-agent";

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Maps requests to responses. Cheap to clone; every connection gets one.
#[derive(Debug)]
pub struct Router<S> {
    files: Option<Arc<S>>,
}

impl<S> Clone for Router<S> {
    fn clone(&self) -> Self {
        Self {
            files: self.files.clone(),
        }
    }
}

impl<S: Storage> Router<S> {
    /// `files` is the storage behind `/files/`; `None` answers those
    /// routes with 404.
    pub fn new(files: Option<Arc<S>>) -> Self {
        Self { files }
    }

    /// Produces the complete response for `req`, ready to serialize.
    pub async fn respond(&self, req: &Request) -> Response {
        let response = self.route(req).await;
        finalize(req, response, encoding::gzip)
    }

    /// Picks the route and builds the uncompressed response.
    pub async fn route(&self, req: &Request) -> Response {
        match req.method {
            Method::POST => {
                if let Some(name) = req.path.strip_prefix(FILES_PREFIX) {
                    return self.store_file(name, &req.body).await;
                }
            }
            Method::GET => {
                if req.path == "/" {
                    return Response::ok(Vec::new());
                }

                if let Some(text) = req.path.strip_prefix(ECHO_PREFIX) {
                    return ResponseBuilder::new(StatusCode::Ok)
                        .header("Content-Type", TEXT_PLAIN)
                        .body(text)
                        .build();
                }

                if req.path.starts_with(USER_AGENT_PREFIX) {
                    if let Some(agent) = req.header("user-agent") {
                        return ResponseBuilder::new(StatusCode::Ok)
                            .header("Content-Type", TEXT_PLAIN)
                            .body(agent)
                            .build();
                    }
                }

                if let Some(name) = req.path.strip_prefix(FILES_PREFIX) {
                    return self.load_file(name).await;
                }
            }
            _ => {}
        }

        debug!(method = %req.method, path = %req.path, "No route matched");
        Response::not_found()
    }

    async fn store_file(&self, name: &str, body: &[u8]) -> Response {
        let Some(files) = &self.files else {
            debug!(name, "File routes disabled");
            return Response::not_found();
        };

        match files.write_file(name, body).await {
            Ok(()) => {
                debug!(name, bytes = body.len(), "Stored file");
                Response::new(StatusCode::Created)
            }
            Err(StorageError::NotFound(_)) => Response::not_found(),
            Err(e) => {
                warn!(error = %e, "Failed to store file");
                Response::internal_error()
            }
        }
    }

    async fn load_file(&self, name: &str) -> Response {
        let Some(files) = &self.files else {
            debug!(name, "File routes disabled");
            return Response::not_found();
        };

        match files.read_file(name).await {
            Ok(contents) => ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Type", OCTET_STREAM)
                .body(strip_trailing_newline(&contents))
                .build(),
            Err(e) => {
                debug!(error = %e, "File unavailable");
                Response::not_found()
            }
        }
    }
}

/// Applies the per-request transforms that do not depend on the route.
///
/// `compress` produces the gzip body. If it fails, the whole exchange
/// becomes an empty 500 sent uncompressed.
pub fn finalize<F>(req: &Request, mut response: Response, compress: F) -> Response
where
    F: FnOnce(&[u8]) -> Result<Vec<u8>, CompressionError>,
{
    if req.accepts_gzip() {
        match compress(&response.body) {
            Ok(compressed) => {
                response.headers.insert("Content-Encoding", GZIP);
                response.body = compressed;
            }
            Err(e) => {
                warn!(error = %e, "Compression failed");
                response = Response::internal_error();
            }
        }
    }

    if req.wants_close() {
        response.headers.insert("Connection", "close");
    }

    response.set_content_length();
    response
}

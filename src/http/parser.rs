use crate::http::request::{Method, Request};
use std::collections::HashMap;

/// Header blocks larger than this are rejected instead of buffered forever.
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Declared bodies larger than this end the session instead of being buffered.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The buffer does not hold a complete request yet.
    #[error("incomplete request")]
    Incomplete,
    /// No header terminator within [`MAX_HEADER_BYTES`].
    #[error("header block exceeds {max} bytes", max = MAX_HEADER_BYTES)]
    HeadersTooLarge,
    /// `Content-Length` is over [`MAX_BODY_BYTES`].
    #[error("declared body of {0} bytes exceeds {max} bytes", max = MAX_BODY_BYTES)]
    BodyTooLarge(usize),
}

/// Parses one request from the front of `buf`.
///
/// On success returns the request and the number of bytes it occupied.
/// A numeric `Content-Length` decides the body length; otherwise the body is
/// everything buffered after the header block, minus one trailing `\n`.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = match find_headers_end(buf) {
        Some(pos) => pos,
        None if buf.len() > MAX_HEADER_BYTES => return Err(ParseError::HeadersTooLarge),
        None => return Err(ParseError::Incomplete),
    };
    let header_bytes = &buf[..headers_end];
    let body_start = headers_end + HEADER_TERMINATOR.len();
    let body_bytes = &buf[body_start..];

    let headers_str = String::from_utf8_lossy(header_bytes);
    let mut lines = headers_str.split("\r\n");

    // Request line; missing parts are left empty
    let mut parts = lines.next().unwrap_or_default().split_whitespace();
    let method = Method::from_token(parts.next().unwrap_or_default());
    let path = parts.next().unwrap_or_default().to_string();
    let version = parts.next().unwrap_or_default().to_string();

    let mut request = Request {
        method,
        path,
        version,
        headers: parse_headers(lines),
        body: Vec::new(),
    };

    let consumed = match request.content_length() {
        Some(len) if len > MAX_BODY_BYTES => return Err(ParseError::BodyTooLarge(len)),
        Some(len) => {
            if body_bytes.len() < len {
                return Err(ParseError::Incomplete);
            }
            request.body = body_bytes[..len].to_vec();
            body_start + len
        }
        None => {
            request.body = strip_trailing_newline(body_bytes).to_vec();
            buf.len()
        }
    };

    Ok((request, consumed))
}

/// Header lines up to the first empty one. Names are lowercased, values
/// trimmed; lines without a colon are skipped.
fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            break;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        headers.insert(
            key.trim().to_ascii_lowercase(),
            value.trim().to_string(),
        );
    }

    headers
}

/// Drops exactly one trailing `\n`, if present.
pub fn strip_trailing_newline(bytes: &[u8]) -> &[u8] {
    bytes.strip_suffix(b"\n").unwrap_or(bytes)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

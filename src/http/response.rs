use crate::http::headers::Headers;

pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Status codes the server answers with by name.
///
/// - `Ok` (200): Request successful
/// - `Created` (201): Resource created successfully
/// - `NotFound` (404): Resource not found
///
/// Anything else goes through [`StatusLine::custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use courier::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NotFound => "Not Found",
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            201 => Some(StatusCode::Created),
            404 => Some(StatusCode::NotFound),
            _ => None,
        }
    }
}

/// The first line of a response: protocol, numeric code and reason phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub protocol: String,
    pub code: u16,
    pub reason: String,
}

impl StatusLine {
    /// Builds a line from an arbitrary protocol/code/phrase triple.
    pub fn custom(protocol: impl Into<String>, code: u16, reason: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            code,
            reason: reason.into(),
        }
    }

    pub fn internal_error() -> Self {
        Self::custom(HTTP_VERSION, 500, "Internal Server Error")
    }
}

impl From<StatusCode> for StatusLine {
    fn from(status: StatusCode) -> Self {
        Self::custom(HTTP_VERSION, status.as_u16(), status.reason_phrase())
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
#[derive(Debug, Clone)]
pub struct Response {
    /// Protocol, code and reason phrase
    pub status: StatusLine,
    /// Headers in the order they will be written
    pub headers: Headers,
    /// Response body as bytes, possibly compressed
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"abc".to_vec())
///     .build();
/// ```
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusLine,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the given status.
    pub fn new(status: impl Into<StatusLine>) -> Self {
        Self {
            status: status.into(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// `Content-Length` is not added here; it is set once the body is final
    /// (see [`Response::set_content_length`]).
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    pub fn new(status: impl Into<StatusLine>) -> Self {
        ResponseBuilder::new(status).build()
    }

    /// Creates a 200 OK response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// Creates a 404 Not Found response with an empty body.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
    }

    /// Creates a 500 Internal Server Error response with an empty body.
    pub fn internal_error() -> Self {
        Self::new(StatusLine::internal_error())
    }

    pub fn code(&self) -> u16 {
        self.status.code
    }

    /// Appends `Content-Length` for the current body as the last header.
    pub fn set_content_length(&mut self) {
        self.headers.remove("Content-Length");
        self.headers
            .insert("Content-Length", self.body.len().to_string());
    }
}

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, trace};

use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::router::Router;
use crate::http::writer::ResponseWriter;
use crate::storage::Storage;

const READ_CHUNK: usize = 4096;

/// The peer stopped sending before a full request was framed.
#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("stream ended after {buffered} bytes, before a complete request")]
    Truncated { buffered: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One client connection, served request by request until it closes.
pub struct Connection<T, S> {
    stream: T,
    buffer: BytesMut,
    state: ConnectionState,
    router: Router<S>,
}

#[derive(Debug)]
pub enum ConnectionState {
    AwaitRequest,
    Dispatch(Request),
    Respond(ResponseWriter, bool), // bool = close after writing?
    Closed,
}

impl<T, S> Connection<T, S>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: Storage,
{
    pub fn new(stream: T, router: Router<S>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::AwaitRequest,
            router,
        }
    }

    /// Drives the connection until the peer closes, asks to close, or an
    /// I/O or framing error occurs. Errors end the session without a response.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;
        self.state = ConnectionState::Closed;
        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::AwaitRequest => {
                    match self.read_request().await? {
                        Some(req) => {
                            self.state = ConnectionState::Dispatch(req);
                        }
                        None => {
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Dispatch(req) => {
                    let close = req.wants_close();
                    let response = self.router.respond(req).await;

                    debug!(
                        method = %req.method,
                        path = %req.path,
                        status = response.code(),
                        bytes = response.body.len(),
                        "Request served"
                    );

                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Respond(writer, close);
                }

                ConnectionState::Respond(writer, close) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *close {
                        self.state = ConnectionState::Closed;
                    } else {
                        self.state = ConnectionState::AwaitRequest; // go back for next request
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one request is framed.
    ///
    /// Returns `Ok(None)` when the peer closes between requests.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {}

                Err(e) => {
                    return Err(FramingError::from(e).into());
                }
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;
            trace!(n, buffered = self.buffer.len(), "Read from peer");

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(FramingError::Truncated {
                    buffered: self.buffer.len(),
                }
                .into());
            }
        }
    }
}

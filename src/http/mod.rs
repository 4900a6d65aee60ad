//! HTTP protocol implementation.
//!
//! A small HTTP/1.1 server with keep-alive connections and a fixed route set.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection request-response state machine
//! - **`parser`**: Frames and parses requests out of a byte buffer
//! - **`request`**: Parsed request and method types
//! - **`headers`**: Ordered response header map
//! - **`response`**: Status lines and responses with a builder
//! - **`writer`**: Serializes and writes responses to the client
//! - **`router`**: Route dispatch, gzip negotiation and final headers
//! - **`encoding`**: gzip compression of response bodies
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │  AwaitRequest    │ ← Read until a request is framed
//!        └──────┬───────────┘
//!               │ Request framed          (EOF / error → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │    Dispatch      │ ← Route and build the response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Respond       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ no `Connection: close` → AwaitRequest
//!               └─ `Connection: close`    → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use courier::http::{connection::Connection, router::Router};
//! use courier::storage::FileStore;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:4221").await?;
//!     let router = Router::<FileStore>::new(None);
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod encoding;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod writer;

//! Courier - a small HTTP/1.1 file and echo server
//!
//! Core library for request framing, routing and response serialization.

pub mod config;
pub mod http;
pub mod server;
pub mod storage;

#![allow(dead_code)]

use std::io::Read;
use std::path::PathBuf;

use flate2::read::GzDecoder;

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("courier-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

/// Splits a serialized response into (status line, header lines, body).
pub fn split_response(raw: &[u8]) -> (String, Vec<String>, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no header terminator");
    let head = String::from_utf8(raw[..end].to_vec()).unwrap();
    let mut lines = head.split("\r\n").map(str::to_string);
    let status = lines.next().unwrap();
    (status, lines.collect(), raw[end + 4..].to_vec())
}

/// Reads exactly one response framed by its `Content-Length`.
pub async fn read_response<R>(reader: &mut R) -> (String, Vec<String>, Vec<u8>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut raw = Vec::new();
    let mut byte = [0u8; 1];

    while !raw.ends_with(b"\r\n\r\n") {
        let n = reader.read(&mut byte).await.unwrap();
        assert_eq!(n, 1, "stream ended inside response headers");
        raw.push(byte[0]);
    }

    let (status, headers, _) = split_response(&raw);
    let length: usize = headers
        .iter()
        .find_map(|h| h.strip_prefix("Content-Length: "))
        .expect("response without Content-Length")
        .parse()
        .unwrap();

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.unwrap();
    (status, headers, body)
}

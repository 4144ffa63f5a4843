//! Length-prefixed stdin/stdout protocol for server mode.
//!
//! Request:
//!
//! ```text
//! Length:42
//!
//! <42 bytes of snippet>
//! ```
//!
//! Response:
//!
//! ```text
//! Status:Ok
//! Platform:v0
//! Unresolved:some-pkg,other-pkg
//! Digest:<sha-256 hex of the body>
//! Length:1234
//!
//! <!DOCTYPE html>...
//! ```
//!
//! Errors use `Status:Error` and carry the message as the body.

use crate::error::{Error, Result};
use crate::pipeline::Preview;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest snippet accepted in one request (4 MiB).
pub const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

/// Read one request body. `Ok(None)` means the input closed before a new request began.
pub async fn read_request<R>(reader: &mut R) -> Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut length: Option<usize> = None;
    let mut saw_header = false;

    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            if saw_header {
                return Err(Error::Protocol("input closed inside request headers".into()));
            }
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            if saw_header {
                break;
            }
            // Tolerate blank lines between requests
            continue;
        }
        saw_header = true;
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::Protocol(format!("expected `Name:value` header, got {:?}", line)))?;
        if name.trim().eq_ignore_ascii_case("length") {
            let parsed = value
                .trim()
                .parse::<usize>()
                .map_err(|e| Error::Protocol(format!("invalid Length {:?}: {}", value.trim(), e)))?;
            length = Some(parsed);
        }
    }

    let length = length.ok_or_else(|| Error::Protocol("missing Length header".into()))?;
    if length > MAX_REQUEST_BYTES {
        return Err(Error::Protocol(format!(
            "request of {} bytes exceeds the {} byte limit",
            length, MAX_REQUEST_BYTES
        )));
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;
    Ok(Some(body))
}

/// Write one response with the given extra headers.
pub async fn write_response<W>(
    writer: &mut W,
    ok: bool,
    headers: &[(&str, String)],
    body: &str,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let status = if ok { "Ok" } else { "Error" };
    let mut head = format!("Status:{}\n", status);
    for (name, value) in headers {
        head.push_str(&format!("{}:{}\n", name, value.replace(['\r', '\n'], " ")));
    }
    head.push_str(&format!("Length:{}\n\n", body.len()));

    writer.write_all(head.as_bytes()).await?;
    writer.write_all(body.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Response headers describing a preview.
pub fn preview_headers(preview: &Preview) -> Vec<(&'static str, String)> {
    vec![
        ("Platform", preview.result.platform.label().to_string()),
        ("Unresolved", preview.result.unresolved_package_names.join(",")),
        ("Digest", preview.document.digest()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreviewConfig;
    use crate::pipeline::build_preview;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_reads_consecutive_requests() {
        let input = b"Length:5\n\nhello\nLength:3\r\n\r\nabc";
        let mut reader = BufReader::new(&input[..]);

        assert_eq!(read_request(&mut reader).await.unwrap(), Some(b"hello".to_vec()));
        assert_eq!(read_request(&mut reader).await.unwrap(), Some(b"abc".to_vec()));
        assert_eq!(read_request(&mut reader).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_body_may_contain_blank_lines() {
        let body = "import React from 'react';\n\nexport default App;\n";
        let input = format!("Length:{}\n\n{}", body.len(), body);
        let mut reader = BufReader::new(input.as_bytes());
        let read = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(read, body.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_length() {
        let mut reader = BufReader::new(&b"Foo:bar\n\nxyz"[..]);
        let err = read_request(&mut reader).await.unwrap_err();
        assert!(err.to_string().contains("missing Length"));
    }

    #[tokio::test]
    async fn test_rejects_oversized_request() {
        let input = format!("Length:{}\n\n", MAX_REQUEST_BYTES + 1);
        let mut reader = BufReader::new(input.as_bytes());
        let err = read_request(&mut reader).await.unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let mut reader = BufReader::new(&b"Length:10\n\nabc"[..]);
        assert!(matches!(read_request(&mut reader).await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_write_response() {
        let preview = build_preview(
            "import x from 'mystery-a';\nexport default function App() { return null }",
            &PreviewConfig::default(),
        );
        let mut out: Vec<u8> = Vec::new();
        write_response(&mut out, true, &preview_headers(&preview), preview.document.as_str())
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let (head, body) = text.split_once("\n\n").unwrap();
        assert!(head.starts_with("Status:Ok\nPlatform:Claude Artifact\nUnresolved:mystery-a\nDigest:"));
        assert!(head.ends_with(&format!("Length:{}", body.len())));
        assert_eq!(body, preview.document.as_str());
    }
}

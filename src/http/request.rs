//! Request head reading.
//!
//! # Responsibilities
//! - Read the request head one line at a time
//! - Hand every line to the caller before it is stored
//! - Extract the path token from the request line
//!
//! # Design Decisions
//! - Lines are kept raw, terminator included, decoded lossily as UTF-8
//! - Only a line that is exactly CRLF ends the head; a bare LF does not
//! - A line longer than the limit ends reading and marks the request malformed

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// The blank line that ends a request head.
pub const HEAD_TERMINATOR: &[u8] = b"\r\n";

/// Why a request head cannot be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedRequest {
    #[error("request head is empty")]
    Empty,

    #[error("request line has no path token")]
    MissingPath,

    #[error("request line exceeds {0} bytes")]
    LineTooLong(usize),
}

/// The raw lines of one request head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHead {
    lines: Vec<String>,
    received_any: bool,
    overflow: Option<usize>,
}

impl RequestHead {
    /// Build a head from already-read lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            received_any: true,
            lines,
            overflow: None,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the peer sent any bytes at all, terminator included.
    pub fn received_any(&self) -> bool {
        self.received_any
    }

    /// The second whitespace-delimited token of the request line.
    pub fn path(&self) -> Result<&str, MalformedRequest> {
        if let Some(limit) = self.overflow {
            return Err(MalformedRequest::LineTooLong(limit));
        }
        let first = self.lines.first().ok_or(MalformedRequest::Empty)?;
        first
            .split_whitespace()
            .nth(1)
            .ok_or(MalformedRequest::MissingPath)
    }
}

/// Read a request head from `reader`.
///
/// `on_line` sees every line (terminator included) before it is stored,
/// including a truncated line that hit `max_line_bytes`.
pub async fn read_head<R, F>(
    reader: &mut R,
    max_line_bytes: usize,
    mut on_line: F,
) -> std::io::Result<RequestHead>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&str),
{
    let mut head = RequestHead::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = (&mut *reader)
            .take(max_line_bytes as u64)
            .read_until(b'\n', &mut buf)
            .await?;

        if read == 0 {
            break;
        }
        head.received_any = true;

        if buf.as_slice() == HEAD_TERMINATOR {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        on_line(&line);

        if read == max_line_bytes && !buf.ends_with(b"\n") {
            head.overflow = Some(max_line_bytes);
            break;
        }

        head.lines.push(line.into_owned());
    }

    Ok(head)
}

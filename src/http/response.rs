//! Response serialization.
//!
//! # Responsibilities
//! - Build the status line from the HTTP status registry
//! - Append headers in a fixed order
//! - Frame the body with an exact `Content-Length`
//! - Write, flush and close the connection
//!
//! # Design Decisions
//! - Framing is written by hand so every response has the same shape:
//!   `Server, Date, Content-Type, Content-Length[, Connection: close]`
//! - Headers can only be added to a begun response (`ResponseHead`), and the
//!   body only to a finalized one (`FinalizedHead`)
//! - Header text is encoded one byte per character (ISO-8859-1); the body is
//!   appended as-is
//! - Every response closes the connection, whatever the close policy says
//!   about the header

use std::fmt::Write as _;
use std::time::SystemTime;

use ::http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::ServiceConfig;
use crate::http::HttpError;

pub const TEXT_HTML: &str = "text/html";

/// A response whose status line has been written and which accepts headers.
#[derive(Debug)]
pub struct ResponseHead {
    buffer: String,
}

impl ResponseHead {
    /// Start a response with `HTTP/1.1 <code> <reason>`.
    pub fn begin(status: u16) -> Result<Self, HttpError> {
        let code =
            StatusCode::from_u16(status).map_err(|_| HttpError::UnknownStatusCode(status))?;
        let reason = code
            .canonical_reason()
            .ok_or(HttpError::UnknownStatusCode(status))?;

        let mut buffer = String::with_capacity(256);
        let _ = write!(buffer, "HTTP/1.1 {} {}\r\n", code.as_u16(), reason);
        Ok(Self { buffer })
    }

    /// Append `<name>: <value>`.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        let name_ok = !name.is_empty() && name.chars().all(|c| c.is_ascii_graphic() && c != ':');
        if !name_ok || !is_wire_text(value) {
            return Err(HttpError::InvalidHeader {
                name: name.to_string(),
            });
        }

        let _ = write!(self.buffer, "{}: {}\r\n", name, value);
        Ok(())
    }

    /// Close the header section, optionally announcing `Connection: close`.
    pub fn finalize(mut self, close_connection: bool) -> FinalizedHead {
        if close_connection {
            self.buffer.push_str("Connection: close\r\n");
        }
        self.buffer.push_str("\r\n");
        FinalizedHead {
            buffer: self.buffer,
        }
    }
}

/// A complete header section, ready for its body.
#[derive(Debug)]
pub struct FinalizedHead {
    buffer: String,
}

impl FinalizedHead {
    /// Serialize the header section followed by `body`.
    pub fn with_body(self, body: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.buffer.len() + body.len());
        // Every char was checked to fit in one byte when it was added.
        bytes.extend(self.buffer.chars().map(|c| c as u32 as u8));
        bytes.extend_from_slice(body.as_bytes());
        bytes
    }
}

fn is_wire_text(value: &str) -> bool {
    value
        .chars()
        .all(|c| (c as u32) <= 0xFF && c != '\r' && c != '\n')
}

/// Serializes and sends the decoy's responses.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    banner: String,
    close_connection: bool,
}

impl ResponseBuilder {
    pub fn new(banner: impl Into<String>, close_connection: bool) -> Self {
        Self {
            banner: banner.into(),
            close_connection,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.banner.clone(), config.close_connection)
    }

    /// Serialize a full response dated `now`.
    pub fn build(
        &self,
        content: &str,
        status: u16,
        content_type: &str,
        now: SystemTime,
    ) -> Result<Vec<u8>, HttpError> {
        let mut head = ResponseHead::begin(status)?;
        head.add_header("Server", &self.banner)?;
        head.add_header("Date", &httpdate::fmt_http_date(now))?;
        head.add_header("Content-Type", content_type)?;
        head.add_header("Content-Length", &content.len().to_string())?;
        Ok(head.finalize(self.close_connection).with_body(content))
    }

    /// Write a response to `writer`, flush it and shut the stream down.
    pub async fn send_content<W>(
        &self,
        writer: &mut W,
        content: &str,
        status: u16,
        content_type: &str,
    ) -> Result<(), HttpError>
    where
        W: AsyncWrite + Unpin,
    {
        let response = self.build(content, status, content_type, SystemTime::now())?;

        writer.write_all(&response).await?;
        writer.flush().await?;
        writer.shutdown().await?;

        tracing::debug!(
            status,
            bytes = response.len(),
            response = %String::from_utf8_lossy(&response).escape_debug(),
            "Sent response"
        );
        Ok(())
    }
}

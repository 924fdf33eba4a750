//! `Content-Length` framing for JSON-RPC over the verifier's stdio.
//!
//! Each message is `Content-Length: N\r\n\r\n` followed by `N` bytes of JSON.
//! Other headers are read and ignored.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Upper bound on a single message body.
///
/// Verification snapshots carry one status per line plus every diagnostic,
/// so large documents need more headroom than plain LSP traffic.
const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

const CONTENT_LENGTH: &str = "Content-Length";

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error on verifier stream")]
    Io(#[from] std::io::Error),
    #[error("stream ended inside a message header")]
    TruncatedHeader,
    #[error("message header has no Content-Length")]
    MissingContentLength,
    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),
    #[error("message of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },
    #[error("message body is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Reads framed messages from the server's stdout.
pub struct FrameReader<R> {
    reader: BufReader<R>,
    line: String,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line: String::new(),
        }
    }

    /// Next message, or `Ok(None)` when the stream ends between messages.
    pub async fn read_frame(&mut self) -> Result<Option<serde_json::Value>, CodecError> {
        let Some(len) = self.read_header().await? else {
            return Ok(None);
        };
        if len > MAX_FRAME_BYTES {
            return Err(CodecError::FrameTooLarge {
                len,
                max: MAX_FRAME_BYTES,
            });
        }

        let mut body = vec![0u8; len];
        self.reader.read_exact(&mut body).await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn read_header(&mut self) -> Result<Option<usize>, CodecError> {
        let mut content_length = None;
        let mut started = false;

        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line).await? == 0 {
                return if started {
                    Err(CodecError::TruncatedHeader)
                } else {
                    Ok(None)
                };
            }
            started = true;

            let field = self.line.trim();
            if field.is_empty() {
                return content_length
                    .map(Some)
                    .ok_or(CodecError::MissingContentLength);
            }
            if let Some((name, value)) = field.split_once(':')
                && name.trim().eq_ignore_ascii_case(CONTENT_LENGTH)
            {
                let value = value.trim();
                let len = value
                    .parse()
                    .map_err(|_| CodecError::InvalidContentLength(value.to_string()))?;
                content_length = Some(len);
            }
        }
    }
}

/// Writes framed messages to the server's stdin.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn write_frame(&mut self, message: &serde_json::Value) -> Result<(), CodecError> {
        let body = serde_json::to_vec(message)?;
        let header = format!("{CONTENT_LENGTH}: {}\r\n\r\n", body.len());
        self.writer.write_all(header.as_bytes()).await?;
        self.writer.write_all(&body).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

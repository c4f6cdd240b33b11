use std::fmt;
use std::io;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::http::parser::{has_header_terminator, parse_http_request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// Per-connection limits.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub max_request_bytes: usize,
    pub read_chunk_size: usize,
    /// Deadline for the whole request to arrive, not for each read
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ConnectionSettings {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            max_request_bytes: cfg.max_request_bytes,
            read_chunk_size: cfg.read_chunk_size,
            read_timeout: cfg.read_timeout(),
            write_timeout: cfg.write_timeout(),
        }
    }
}

/// I/O failures that end a single connection.
#[derive(Debug)]
pub enum ConnectionError {
    Read(io::Error),
    Write(io::Error),
    WriteTimeout,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::Read(e) => write!(f, "read failed: {e}"),
            ConnectionError::Write(e) => write!(f, "write failed: {e}"),
            ConnectionError::WriteTimeout => f.write_str("write timed out"),
        }
    }
}

impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectionError::Read(e) | ConnectionError::Write(e) => Some(e),
            ConnectionError::WriteTimeout => None,
        }
    }
}

/// How reading the request ended, when there is something to answer.
#[derive(Debug)]
enum ReadOutcome {
    /// Header terminator seen, or the peer closed after sending something
    Message(Bytes),
    TooLarge,
    TimedOut,
}

enum ConnectionState {
    Reading,
    Processing(ReadOutcome),
    Writing(ResponseWriter, StatusCode),
    Closed,
}

/// Drives one accepted connection through a single request/response cycle.
///
/// `run` consumes the connection, so the stream is dropped (and closed) on
/// every return path.
pub struct Connection<S> {
    stream: S,
    settings: ConnectionSettings,
    buffer: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, settings: ConnectionSettings) -> Self {
        let capacity = settings.read_chunk_size.min(settings.max_request_bytes);
        Self {
            stream,
            settings,
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    pub async fn run(mut self) -> Result<(), ConnectionError> {
        let mut state = ConnectionState::Reading;

        loop {
            state = match state {
                ConnectionState::Reading => {
                    let deadline = Instant::now() + self.settings.read_timeout;
                    match timeout_at(deadline, self.read_request()).await {
                        Ok(Ok(Some(outcome))) => ConnectionState::Processing(outcome),
                        Ok(Ok(None)) => {
                            debug!("peer closed before sending a request");
                            ConnectionState::Closed
                        }
                        Ok(Err(e)) => return Err(e),
                        Err(_) => ConnectionState::Processing(ReadOutcome::TimedOut),
                    }
                }

                ConnectionState::Processing(outcome) => {
                    let response = self.respond_to(outcome);
                    ConnectionState::Writing(ResponseWriter::new(&response), response.status)
                }

                ConnectionState::Writing(mut writer, status) => {
                    let write = writer.write_to_stream(&mut self.stream);
                    match timeout(self.settings.write_timeout, write).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => return Err(ConnectionError::Write(e)),
                        Err(_) => return Err(ConnectionError::WriteTimeout),
                    }

                    info!(status = status.as_u16(), bytes = writer.written(), "response sent");
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "shutdown after response failed");
        }

        Ok(())
    }

    /// Reads until the header section is complete, the peer closes, or the
    /// size limit is hit. `None` means the peer closed without sending a byte.
    async fn read_request(&mut self) -> Result<Option<ReadOutcome>, ConnectionError> {
        let mut chunk = vec![0u8; self.settings.read_chunk_size];

        loop {
            if has_header_terminator(&self.buffer) {
                return Ok(Some(ReadOutcome::Message(self.buffer.split().freeze())));
            }

            let remaining = self.settings.max_request_bytes.saturating_sub(self.buffer.len());
            if remaining == 0 {
                return Ok(Some(ReadOutcome::TooLarge));
            }

            let want = chunk.len().min(remaining);
            let n = self
                .stream
                .read(&mut chunk[..want])
                .await
                .map_err(ConnectionError::Read)?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(ReadOutcome::Message(self.buffer.split().freeze())));
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }

    fn respond_to(&self, outcome: ReadOutcome) -> Response {
        match outcome {
            ReadOutcome::Message(bytes) => match parse_http_request(&bytes) {
                Ok(req) => {
                    info!(
                        method = %req.method,
                        target = %req.target,
                        version = %req.version,
                        headers = req.headers.len(),
                        body_len = req.body.len(),
                        "request parsed"
                    );
                    Response::pong()
                }
                Err(e) => {
                    warn!(error = %e, received = bytes.len(), "failed to parse request");
                    Response::bad_request(&e)
                }
            },
            ReadOutcome::TooLarge => {
                warn!(limit = self.settings.max_request_bytes, "request exceeds size limit");
                Response::headers_too_large()
            }
            ReadOutcome::TimedOut => {
                warn!(
                    timeout_ms = self.settings.read_timeout.as_millis() as u64,
                    received = self.buffer.len(),
                    "request not received before deadline"
                );
                Response::request_timeout()
            }
        }
    }
}

//! Line transport adapter
//!
//! The rest of the crate talks to a peer through two narrow capabilities: a
//! [`LineSink`] that sends one line and reports success instead of erroring,
//! and [`read_line`], which reads one line and yields `None` at end of
//! stream. The TCP adapter implements both once; tests substitute in-memory
//! streams.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Capability to send one line to a peer
///
/// Sends may fail at any time (peer gone). Failure is reported as `false`,
/// never propagated as an error, so a broadcast over many sinks can keep
/// going and report the dead ones afterwards.
#[async_trait]
pub trait LineSink: Send + Sync {
    /// Write `line` followed by a newline. Returns `false` on any I/O error.
    async fn send_line(&self, line: &[u8]) -> bool;

    /// Shut down the outbound side of the connection.
    async fn close(&self);
}

/// [`LineSink`] over any async byte stream
///
/// The writer sits behind a `Mutex` so concurrent sends to the same peer
/// (broadcast fan-out racing a welcome line) are serialized per connection,
/// never interleaved mid-line.
pub struct StreamLineSink<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Send + Unpin> StreamLineSink<W> {
    /// Wrap a write half
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Send + Unpin> LineSink for StreamLineSink<W> {
    async fn send_line(&self, line: &[u8]) -> bool {
        let mut writer = self.writer.lock().await;
        let result: std::io::Result<()> = async {
            writer.write_all(line).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;
        result.is_ok()
    }

    async fn close(&self) {
        let mut writer = self.writer.lock().await;
        if let Err(e) = writer.shutdown().await {
            tracing::debug!(error = %e, "Error shutting down outbound stream");
        }
    }
}

/// Read one line, without its terminator
///
/// Returns `Ok(None)` at end of stream. Trailing `\r` is stripped so clients
/// sending CRLF line endings are handled transparently.
pub async fn read_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin + Send,
{
    let mut buf = String::new();
    let n = reader.read_line(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    while buf.ends_with('\n') || buf.ends_with('\r') {
        buf.pop();
    }
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_send_line_appends_newline() {
        tokio_test::block_on(async {
            let (near, far) = tokio::io::duplex(256);
            let sink = StreamLineSink::new(near);

            assert!(sink.send_line(b"hello").await);
            assert!(sink.send_line(b"world").await);

            let mut reader = BufReader::new(far);
            assert_eq!(read_line(&mut reader).await.unwrap(), Some("hello".into()));
            assert_eq!(read_line(&mut reader).await.unwrap(), Some("world".into()));
        });
    }

    #[test]
    fn test_send_line_reports_failure_when_peer_gone() {
        tokio_test::block_on(async {
            let (near, far) = tokio::io::duplex(16);
            drop(far);

            let sink = StreamLineSink::new(near);
            assert!(!sink.send_line(b"into the void").await);
        });
    }

    #[test]
    fn test_read_line_strips_crlf_and_detects_eof() {
        tokio_test::block_on(async {
            let (near, far) = tokio::io::duplex(64);
            let mut near = near;
            near.write_all(b"one\r\ntwo\n").await.unwrap();
            drop(near);

            let mut reader = BufReader::new(far);
            assert_eq!(read_line(&mut reader).await.unwrap(), Some("one".into()));
            assert_eq!(read_line(&mut reader).await.unwrap(), Some("two".into()));
            assert_eq!(read_line(&mut reader).await.unwrap(), None);
        });
    }
}

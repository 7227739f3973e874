//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Connection lifecycle: connect, framed read side, serialized write side, close-once

use crate::{ClientConfig, ClientError, Result};
use chatter_codec::{ChatCodec, InboundEvent, OutboundLine};
use futures_util::{SinkExt, StreamExt};
use metrics::counter;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// An open connection to a chat server
///
/// Holds the framed read side and a cloneable, mutex-guarded write side. Use
/// [`ChatConnection::split`] to hand the halves to different tasks.
pub struct ChatConnection {
    reader: ConnectionReader,
    writer: ConnectionWriter,
}

impl ChatConnection {
    /// Connect to the server named in `config`
    ///
    /// No timeout is applied. Failure is reported as [`ClientError::Connection`].
    #[instrument(skip(config), fields(address = %config.address()))]
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let address = config.address();
        info!("Connecting to {}...", address);

        let stream = TcpStream::connect((config.host.as_str(), config.port))
            .await
            .map_err(|source| ClientError::Connection {
                address: address.clone(),
                source,
            })?;

        if config.nodelay {
            if let Err(e) = stream.set_nodelay(true) {
                debug!(error = %e, "Failed to set TCP_NODELAY");
            }
        }

        let peer_addr = stream.peer_addr().ok();
        info!(peer_addr = ?peer_addr, "Connected to {}", address);

        let codec = match config.max_line_length {
            Some(max) => ChatCodec::with_max_length(max),
            None => ChatCodec::new(),
        };
        let (reader, writer) = stream.into_split();
        Ok(Self::assemble(
            Box::new(reader),
            Box::new(writer),
            codec,
            peer_addr,
        ))
    }

    /// Wrap an arbitrary bidirectional stream
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        Self::from_parts(reader, writer, ChatCodec::new())
    }

    /// Wrap separate read and write halves using `codec` for both directions
    pub fn from_parts<R, W>(reader: R, writer: W, codec: ChatCodec) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self::assemble(Box::new(reader), Box::new(writer), codec, None)
    }

    fn assemble(
        reader: BoxedReader,
        writer: BoxedWriter,
        codec: ChatCodec,
        peer_addr: Option<SocketAddr>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        Self {
            reader: ConnectionReader {
                frames: FramedRead::new(reader, codec.clone()),
                shutdown: shutdown.clone(),
            },
            writer: ConnectionWriter {
                inner: Arc::new(WriterInner {
                    framed: Mutex::new(FramedWrite::new(writer, codec)),
                    closed: AtomicBool::new(false),
                    shutdown,
                    peer_addr,
                }),
            },
        }
    }

    /// The write side of this connection
    pub fn writer(&self) -> &ConnectionWriter {
        &self.writer
    }

    /// Close the connection; see [`ConnectionWriter::close`]
    pub async fn close(&self) -> bool {
        self.writer.close().await
    }

    /// Separate the read side from the write side
    pub fn split(self) -> (ConnectionReader, ConnectionWriter) {
        (self.reader, self.writer)
    }
}

/// Read side of a [`ChatConnection`]
///
/// Yields recognized [`InboundEvent`]s only; unrecognized frames are dropped here.
pub struct ConnectionReader {
    frames: FramedRead<BoxedReader, ChatCodec>,
    shutdown: CancellationToken,
}

impl ConnectionReader {
    /// Wait for the next recognized event
    ///
    /// Returns `None` at end of stream or once the connection has been closed locally.
    pub async fn next_event(&mut self) -> Option<Result<InboundEvent>> {
        loop {
            let next = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => {
                    debug!("Connection closed locally, ending read loop");
                    return None;
                }
                next = self.frames.next() => next,
            };

            match next {
                Some(Ok(event)) => {
                    counter!("chatter.frames.received").increment(1);
                    if let InboundEvent::Unrecognized { raw } = &event {
                        counter!("chatter.frames.unrecognized").increment(1);
                        trace!(frame = %raw, "Dropping unrecognized frame");
                        continue;
                    }
                    return Some(Ok(event));
                }
                Some(Err(e)) => return Some(Err(e.into())),
                None => {
                    debug!("Connection stream ended");
                    return None;
                }
            }
        }
    }
}

/// Write side of a [`ChatConnection`]
///
/// Clones share one underlying writer; each line is written and flushed while holding
/// a single lock, so lines from different tasks never interleave.
#[derive(Clone)]
pub struct ConnectionWriter {
    inner: Arc<WriterInner>,
}

struct WriterInner {
    framed: Mutex<FramedWrite<BoxedWriter, ChatCodec>>,
    closed: AtomicBool,
    shutdown: CancellationToken,
    peer_addr: Option<SocketAddr>,
}

impl ConnectionWriter {
    /// Write one line followed by the terminator and flush it
    pub async fn send_line(&self, line: &OutboundLine) -> Result<()> {
        if self.is_closed() {
            return Err(ClientError::ConnectionClosed);
        }

        let mut framed = self.inner.framed.lock().await;
        // Closed while waiting for the lock
        if self.is_closed() {
            return Err(ClientError::ConnectionClosed);
        }

        SinkExt::<&OutboundLine>::send(&mut *framed, line).await?;
        counter!("chatter.lines.sent").increment(1);
        trace!(line = %line, "Line sent");
        Ok(())
    }

    /// Close the connection
    ///
    /// Only the first call has an effect: it wakes the read side and shuts down the
    /// write half. Returns `true` if this call performed the close.
    pub async fn close(&self) -> bool {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            trace!("Connection already closed");
            return false;
        }

        self.inner.shutdown.cancel();

        let mut framed = self.inner.framed.lock().await;
        if let Err(e) = framed.get_mut().shutdown().await {
            debug!(error = %e, "Error shutting down write half");
        }

        info!(peer_addr = ?self.inner.peer_addr, "Connection closed");
        true
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Remote address, when connected over TCP
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.inner.peer_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader, duplex};

    #[tokio::test]
    async fn test_send_line_appends_terminator() {
        let (client, server) = duplex(1024);
        let connection = ChatConnection::from_stream(client);
        let mut lines = BufReader::new(server).lines();

        let line = OutboundLine::new("bob").unwrap();
        connection.writer().send_line(&line).await.unwrap();

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (client, _server) = duplex(1024);
        let connection = ChatConnection::from_stream(client);

        assert!(connection.close().await);
        assert!(!connection.close().await);
        assert!(connection.writer().is_closed());
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (client, _server) = duplex(1024);
        let connection = ChatConnection::from_stream(client);
        connection.close().await;

        let line = OutboundLine::new("late").unwrap();
        assert!(matches!(
            connection.writer().send_line(&line).await,
            Err(ClientError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_reader_skips_unrecognized_frames() {
        let (client, mut server) = duplex(1024);
        let (mut reader, _writer) = ChatConnection::from_stream(client).split();

        server.write_all(b"PING\nHELLO\nSYSTEM up\n").await.unwrap();
        drop(server);

        assert_eq!(
            reader.next_event().await.unwrap().unwrap(),
            InboundEvent::SystemNotice {
                text: "up".to_string()
            }
        );
        assert!(reader.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_close_wakes_reader() {
        let (client, _server) = duplex(1024);
        let (mut reader, writer) = ChatConnection::from_stream(client).split();

        let pending = tokio::spawn(async move { reader.next_event().await.is_none() });
        writer.close().await;

        assert!(pending.await.unwrap());
    }
}

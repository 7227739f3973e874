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

use crate::{CodecError, InboundEvent, OutboundLine, consts};
use bytes::{BufMut, BytesMut};
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, Encoder, FramedRead};
use tracing::trace;

/// Lazy, finite sequence of [`InboundEvent`]s read from a stream.
pub type InboundFrames<R> = FramedRead<R, ChatCodec>;

/// Wrap `reader` so it yields one [`InboundEvent`] per received frame.
///
/// The sequence ends at end-of-stream or after the first read error and cannot be
/// restarted.
pub fn decode<R: AsyncRead>(reader: R) -> InboundFrames<R> {
    FramedRead::new(reader, ChatCodec::new())
}

///
/// Line codec for the chat protocol.
///
/// Inbound bytes are split on `\n` (a preceding `\r` is dropped), decoded as UTF-8 with
/// lossy replacement and classified into [`InboundEvent`]s. Outbound lines are written
/// verbatim followed by `\n`.
///
#[derive(Clone, Debug, Default)]
pub struct ChatCodec {
    /// Index into the buffer up to which no terminator has been found
    next_index: usize,
    /// Maximum frame length in bytes, excluding the terminator
    max_length: Option<usize>,
}

impl ChatCodec {
    /// Create a codec without a frame length limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec that rejects frames longer than `max_length` bytes
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            next_index: 0,
            max_length: Some(max_length),
        }
    }

    /// The configured frame length limit, if any
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    fn frame_to_line(mut frame: BytesMut) -> String {
        if frame.last() == Some(&consts::CR) {
            frame.truncate(frame.len() - 1);
        }
        String::from_utf8_lossy(&frame).into_owned()
    }
}

impl Decoder for ChatCodec {
    type Item = InboundEvent;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<InboundEvent>, Self::Error> {
        let read_to = match self.max_length {
            Some(max) => src.len().min(max.saturating_add(1)),
            None => src.len(),
        };

        let terminator = src[self.next_index..read_to]
            .iter()
            .position(|byte| *byte == consts::LF);

        match terminator {
            Some(offset) => {
                let end = self.next_index + offset;
                self.next_index = 0;
                let mut frame = src.split_to(end + 1);
                frame.truncate(end);
                let line = Self::frame_to_line(frame);
                trace!(frame = %line, "Frame received");
                Ok(Some(InboundEvent::classify(&line)))
            }
            None => match self.max_length {
                Some(limit) if src.len() > limit => Err(CodecError::LineTooLong { limit }),
                _ => {
                    self.next_index = read_to;
                    Ok(None)
                }
            },
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<InboundEvent>, Self::Error> {
        if let Some(event) = self.decode(src)? {
            return Ok(Some(event));
        }
        if src.is_empty() {
            return Ok(None);
        }
        // Unterminated trailing frame
        self.next_index = 0;
        let frame = src.split_to(src.len());
        let line = Self::frame_to_line(frame);
        trace!(frame = %line, "Unterminated frame at end of stream");
        Ok(Some(InboundEvent::classify(&line)))
    }
}

impl Encoder<OutboundLine> for ChatCodec {
    type Error = CodecError;

    fn encode(&mut self, item: OutboundLine, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.encode(&item, dst)
    }
}

impl Encoder<&OutboundLine> for ChatCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &OutboundLine, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let text = item.as_str().as_bytes();
        dst.reserve(text.len() + 1);
        dst.put_slice(text);
        dst.put_u8(consts::LF);
        Ok(())
    }
}

impl Encoder<&str> for ChatCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = OutboundLine::new(item)?;
        self.encode(&line, dst)
    }
}

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

//! # Chatter Line Protocol Codec
//!
//! This crate frames and classifies the newline-delimited text protocol spoken by the
//! chat server. It is built on `tokio_util::codec` and is meant to be driven by
//! [`FramedRead`](tokio_util::codec::FramedRead) / `FramedWrite`.
//!
//! ## Wire Format
//!
//! Every frame is one line of UTF-8 text terminated by `\n`. There is no length prefix
//! and no escaping. The server sends:
//!
//! ```text
//! SUBMITNAME
//! NAMEACCEPTED <name>      # name starts at byte offset 13
//! SYSTEM <text>            # text starts at byte offset 7
//! MESSAGE <text>           # text starts at byte offset 8
//! ```
//!
//! The client answers with bare lines: first a screen name, then chat text.
//!
//! ## Core Components
//!
//! ### [`ChatCodec`]
//!
//! Implements [`Decoder`](tokio_util::codec::Decoder) producing [`InboundEvent`]s and
//! [`Encoder`](tokio_util::codec::Encoder) for [`OutboundLine`] and `&str`.
//!
//! ### [`InboundEvent`]
//!
//! The typed form of a server frame. Unknown frames, and known frames too short to
//! reach their payload, become [`InboundEvent::Unrecognized`].
//!
//! ## Usage Example
//!
//! ```rust
//! use bytes::BytesMut;
//! use chatter_codec::{ChatCodec, InboundEvent};
//! use tokio_util::codec::{Decoder, Encoder};
//!
//! let mut codec = ChatCodec::new();
//!
//! let mut input = BytesMut::from(&b"NAMEACCEPTED bob\nMESSAGE bob: hi\n"[..]);
//! assert_eq!(
//!     codec.decode(&mut input).unwrap(),
//!     Some(InboundEvent::NameAccepted { display_name: "bob".to_string() })
//! );
//!
//! let mut output = BytesMut::new();
//! codec.encode("hello", &mut output).unwrap();
//! assert_eq!(&output[..], b"hello\n");
//! ```
//!
//! ## Prefix Ambiguity
//!
//! Classification is by prefix only. A broadcast line whose text happens to start with
//! a protocol token is classified by that token. This mirrors the protocol as deployed.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod codec;
pub mod consts;
mod event;
mod line;
mod result;

pub use codec::{ChatCodec, InboundFrames, decode};
pub use consts::DEFAULT_PORT;
pub use event::InboundEvent;
pub use line::OutboundLine;
pub use result::{CodecError, CodecResult};

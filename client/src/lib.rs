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

//! # Chatter Client
//!
//! Session layer for the line-oriented chat protocol: connects to the server,
//! negotiates a screen name, classifies server frames and gates outbound chat lines by
//! session state.
//!
//! ## Features
//!
//! - **Single Connection** - One TCP connection per session, closed exactly once
//! - **State Machine** - `Connecting -> AwaitingName -> Active -> Closed`
//! - **Handler-Based** - Presentation reached only through [`ChatHandler`]
//! - **Serialized Writes** - Name replies and user lines share one writer lock
//!
//! ## Quick Start
//!
//! ```no_run
//! use chatter_client::{ChatHandler, ChatSession, ClientConfig};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl ChatHandler for MyHandler {
//!     async fn request_screen_name(&self) -> String {
//!         "alice".to_string()
//!     }
//!
//!     async fn on_chat_message(&self, text: &str) {
//!         println!("{}", text);
//!     }
//!
//!     async fn on_closed(&self) {
//!         println!("Disconnected");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::for_host("localhost");
//!     let session = ChatSession::connect(&config, Arc::new(MyHandler)).await?;
//!     let handle = session.handle();
//!
//!     let task = tokio::spawn(session.run());
//!     handle.submit_line("hello everyone").await?;
//!     task.await??;
//!     Ok(())
//! }
//! ```
//!
//! ## Limitations
//!
//! No timeouts are applied to connect or read, and there is no reconnection. A stalled
//! server keeps the session waiting until [`SessionHandle::close`] is called.

mod config;
mod connection;
mod error;
mod handler;
mod session;

pub use config::ClientConfig;
pub use connection::{ChatConnection, ConnectionReader, ConnectionWriter};
pub use error::{ClientError, Result};
pub use handler::{CallbackHandler, ChatHandler};
pub use session::{ChatSession, SessionAction, SessionHandle, SessionState};

// Re-export protocol types from chatter_codec
pub use chatter_codec::{CodecError, DEFAULT_PORT, InboundEvent, OutboundLine};

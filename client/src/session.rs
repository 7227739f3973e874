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

//! Session state machine and read loop

use crate::connection::{ConnectionReader, ConnectionWriter};
use crate::{ChatConnection, ChatHandler, ClientConfig, ClientError, Result};
use chatter_codec::{InboundEvent, OutboundLine};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, instrument, warn};

/// Session state (stored as atomic u8 so other tasks can read it lock-free)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SessionState {
    /// Connected, waiting for the server's first name request
    Connecting = 0,
    /// A screen name has been requested and not yet accepted
    AwaitingName = 1,
    /// Name accepted; chat lines may be submitted
    Active = 2,
    /// Connection closed; terminal
    Closed = 3,
}

/// Effect of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Ask the presentation for a screen name and send it
    PromptName,
    /// Record the accepted name and notify the presentation
    AcceptName(String),
    /// Forward a server notice
    Notice(String),
    /// Forward a chat message
    Message(String),
}

impl SessionState {
    /// Convert from u8 (for atomic operations)
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::AwaitingName,
            2 => Self::Active,
            _ => Self::Closed,
        }
    }

    /// Convert to u8 (for atomic operations)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if the session has ended
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    /// States in which lines may be written to the server
    pub fn allows_outbound(self) -> bool {
        matches!(self, Self::AwaitingName | Self::Active)
    }

    /// Apply an inbound event
    ///
    /// Returns the next state and the action to perform, or `None` if the event has no
    /// meaning in this state and must be ignored.
    pub fn transition(self, event: &InboundEvent) -> Option<(SessionState, SessionAction)> {
        use SessionState::{Active, AwaitingName, Connecting};

        match (self, event) {
            (Connecting | AwaitingName, InboundEvent::SubmitNameRequest) => {
                Some((AwaitingName, SessionAction::PromptName))
            }
            (AwaitingName, InboundEvent::NameAccepted { display_name }) => {
                Some((Active, SessionAction::AcceptName(display_name.clone())))
            }
            (Active, InboundEvent::SystemNotice { text }) => {
                Some((Active, SessionAction::Notice(text.clone())))
            }
            (Active, InboundEvent::ChatMessage { text }) => {
                Some((Active, SessionAction::Message(text.clone())))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::AwaitingName => "awaiting-name",
            Self::Active => "active",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Cloneable handle to a running session
///
/// This is how the presentation layer submits chat lines and ends the session.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    state: AtomicU8,
    display_name: OnceLock<String>,
    writer: ConnectionWriter,
}

impl SessionHandle {
    fn new(writer: ConnectionWriter) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: AtomicU8::new(SessionState::Connecting.as_u8()),
                display_name: OnceLock::new(),
                writer,
            }),
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    /// Whether chat lines are currently accepted
    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// The screen name accepted by the server, once there is one
    pub fn display_name(&self) -> Option<&str> {
        self.inner.display_name.get().map(String::as_str)
    }

    /// Submit a chat line
    ///
    /// Only honored while the session is [`Active`](SessionState::Active). Lines
    /// submitted in any other state are discarded and `Ok(false)` is returned; nothing
    /// is buffered. Text containing a line break is rejected.
    pub async fn submit_line(&self, text: &str) -> Result<bool> {
        let state = self.state();
        if state != SessionState::Active {
            debug!(%state, "Ignoring line submitted outside an active session");
            return Ok(false);
        }

        let line = OutboundLine::new(text)?;
        match self.inner.writer.send_line(&line).await {
            Ok(()) => Ok(true),
            Err(ClientError::ConnectionClosed) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Close the connection, ending the session
    ///
    /// Returns `true` if this call closed the connection.
    pub async fn close(&self) -> bool {
        self.inner.writer.close().await
    }

    fn set_state(&self, state: SessionState) {
        self.inner.state.store(state.as_u8(), Ordering::Release);
    }

    async fn send_name(&self, name: &str) -> Result<()> {
        let (line, truncated) = OutboundLine::truncated(name);
        if truncated {
            warn!(name = %line, "Screen name contained a line break, truncating");
        }

        if !self.state().allows_outbound() {
            return Ok(());
        }
        match self.inner.writer.send_line(&line).await {
            Err(ClientError::ConnectionClosed) => {
                debug!("Connection closed before the screen name was sent");
                Ok(())
            }
            other => other,
        }
    }
}

/// A chat session: one connection driven by the protocol state machine
///
/// # Example
///
/// ```no_run
/// use chatter_client::{CallbackHandler, ChatSession, ClientConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> chatter_client::Result<()> {
/// let handler = Arc::new(CallbackHandler {
///     on_request_name: Some(Box::new(|| "alice".to_string())),
///     ..Default::default()
/// });
/// let session = ChatSession::connect(&ClientConfig::for_host("localhost"), handler).await?;
/// let handle = session.handle();
/// tokio::spawn(session.run());
///
/// handle.submit_line("hello").await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatSession<H: ChatHandler> {
    reader: ConnectionReader,
    handle: SessionHandle,
    handler: Arc<H>,
}

impl<H: ChatHandler> ChatSession<H> {
    /// Create a session over an established connection
    pub fn new(connection: ChatConnection, handler: Arc<H>) -> Self {
        let (reader, writer) = connection.split();
        Self {
            reader,
            handle: SessionHandle::new(writer),
            handler,
        }
    }

    /// Connect to the configured server and create a session for it
    pub async fn connect(config: &ClientConfig, handler: Arc<H>) -> Result<Self> {
        let connection = ChatConnection::connect(config).await?;
        Ok(Self::new(connection, handler))
    }

    /// Get a handle for submitting lines from other tasks
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    /// Run the session until the connection ends
    ///
    /// Returns `Ok(())` when the server closes the stream or the session is closed
    /// locally, and the error when a read or write fails. Either way the connection is
    /// closed and [`ChatHandler::on_closed`] has been called when this returns.
    #[instrument(name = "session", skip_all)]
    pub async fn run(mut self) -> Result<()> {
        let result = self.event_loop().await;

        if let Err(ref e) = result {
            error!(error = %e, "Session ended with error");
            self.handler.on_error(e).await;
        }

        self.shutdown().await;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        while let Some(next) = self.reader.next_event().await {
            self.apply(next?).await?;
        }
        info!("Connection ended");
        Ok(())
    }

    async fn apply(&mut self, event: InboundEvent) -> Result<()> {
        let from = self.handle.state();
        let Some((to, action)) = from.transition(&event) else {
            debug!(state = %from, event = ?event, "Ignoring event");
            return Ok(());
        };

        match action {
            SessionAction::PromptName => {
                self.enter(from, to).await;
                let name = self.handler.request_screen_name().await;
                self.handle.send_name(&name).await?;
            }
            SessionAction::AcceptName(name) => {
                if self.handle.inner.display_name.set(name.clone()).is_err() {
                    warn!("Display name already set");
                }
                info!(name = %name, "Screen name accepted");
                self.enter(from, to).await;
                self.handler.on_name_accepted(&name).await;
            }
            SessionAction::Notice(text) => {
                self.handler.on_system_notice(&text).await;
            }
            SessionAction::Message(text) => {
                self.handler.on_chat_message(&text).await;
            }
        }
        Ok(())
    }

    async fn enter(&mut self, from: SessionState, to: SessionState) {
        debug!(%from, %to, "Session transition");
        self.handle.set_state(to);
        self.handler.on_transition(from, to).await;
    }

    async fn shutdown(&mut self) {
        let from = self.handle.state();
        self.handle.set_state(SessionState::Closed);
        self.handle.inner.writer.close().await;
        debug!(%from, to = %SessionState::Closed, "Session transition");
        self.handler.on_transition(from, SessionState::Closed).await;
        self.handler.on_closed().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallbackHandler;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
    use tracing_test::traced_test;

    fn name_accepted(name: &str) -> InboundEvent {
        InboundEvent::NameAccepted {
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_state_u8_round_trip() {
        for state in [
            SessionState::Connecting,
            SessionState::AwaitingName,
            SessionState::Active,
            SessionState::Closed,
        ] {
            assert_eq!(SessionState::from_u8(state.as_u8()), state);
        }
        assert_eq!(SessionState::from_u8(200), SessionState::Closed);
    }

    #[test]
    fn test_name_negotiation_with_rejection() {
        let mut state = SessionState::Connecting;
        let mut visited = vec![state];
        let mut prompts = 0;

        for event in [
            InboundEvent::SubmitNameRequest,
            InboundEvent::SubmitNameRequest,
            name_accepted("bob"),
        ] {
            let (next, action) = state.transition(&event).unwrap();
            if action == SessionAction::PromptName {
                prompts += 1;
            }
            state = next;
            visited.push(state);
        }

        assert_eq!(
            visited,
            vec![
                SessionState::Connecting,
                SessionState::AwaitingName,
                SessionState::AwaitingName,
                SessionState::Active,
            ]
        );
        assert_eq!(prompts, 2);
    }

    #[test]
    fn test_active_forwards_notices_and_messages() {
        assert_eq!(
            SessionState::Active.transition(&InboundEvent::SystemNotice {
                text: "hi".to_string()
            }),
            Some((SessionState::Active, SessionAction::Notice("hi".to_string())))
        );
        assert_eq!(
            SessionState::Active.transition(&InboundEvent::ChatMessage {
                text: "yo".to_string()
            }),
            Some((SessionState::Active, SessionAction::Message("yo".to_string())))
        );
    }

    #[test]
    fn test_undefined_transitions_are_ignored() {
        // Name accepted before any request, or twice
        assert_eq!(SessionState::Connecting.transition(&name_accepted("a")), None);
        assert_eq!(SessionState::Active.transition(&name_accepted("a")), None);
        // Name request once active
        assert_eq!(
            SessionState::Active.transition(&InboundEvent::SubmitNameRequest),
            None
        );
        // Traffic before the name is accepted
        assert_eq!(
            SessionState::AwaitingName.transition(&InboundEvent::ChatMessage {
                text: "early".to_string()
            }),
            None
        );
        // Nothing leaves Closed
        assert_eq!(
            SessionState::Closed.transition(&InboundEvent::SubmitNameRequest),
            None
        );
        // Unrecognized never drives the machine
        assert_eq!(
            SessionState::Active.transition(&InboundEvent::Unrecognized {
                raw: "PING".to_string()
            }),
            None
        );
    }

    #[test]
    fn test_outbound_gate() {
        assert!(!SessionState::Connecting.allows_outbound());
        assert!(SessionState::AwaitingName.allows_outbound());
        assert!(SessionState::Active.allows_outbound());
        assert!(!SessionState::Closed.allows_outbound());
        assert!(SessionState::Closed.is_terminal());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_screen_name_line_break_is_truncated_and_logged() {
        let (client, mut server) = duplex(1024);
        let handler = Arc::new(CallbackHandler {
            on_request_name: Some(Box::new(|| "eve\r\nMESSAGE spoofed".to_string())),
            ..Default::default()
        });
        let session = ChatSession::new(ChatConnection::from_stream(client), handler);

        server.write_all(b"SUBMITNAME\n").await.unwrap();
        server.shutdown().await.unwrap();
        session.run().await.unwrap();

        let mut sent = String::new();
        server.read_to_string(&mut sent).await.unwrap();
        assert_eq!(sent, "eve\n");
        assert!(logs_contain("truncating"));
    }
}

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

//! Presentation handler traits

use crate::{ClientError, SessionState};
use async_trait::async_trait;

/// Presentation collaborator for a chat session
///
/// The session calls into this trait for everything a user can observe. Only
/// [`request_screen_name`](ChatHandler::request_screen_name) is required; every
/// notification defaults to doing nothing.
///
/// # Example
///
/// ```no_run
/// use chatter_client::ChatHandler;
/// use async_trait::async_trait;
///
/// struct PrintHandler;
///
/// #[async_trait]
/// impl ChatHandler for PrintHandler {
///     async fn request_screen_name(&self) -> String {
///         "alice".to_string()
///     }
///
///     async fn on_chat_message(&self, text: &str) {
///         println!("{}", text);
///     }
/// }
/// ```
#[async_trait]
pub trait ChatHandler: Send + Sync + 'static {
    /// Produce a screen name
    ///
    /// Called once per name request from the server, including after a rejected name.
    /// The read loop is suspended until this returns.
    async fn request_screen_name(&self) -> String;

    /// Called when the server accepts the screen name
    async fn on_name_accepted(&self, _name: &str) {}

    /// Called for each server notice while the session is active
    async fn on_system_notice(&self, _text: &str) {}

    /// Called for each broadcast chat message while the session is active
    async fn on_chat_message(&self, _text: &str) {}

    /// Called when the session enters a state
    ///
    /// Reported for each name request (so a rejected name shows up as
    /// `AwaitingName -> AwaitingName`), for name acceptance and for the final close.
    async fn on_transition(&self, _from: SessionState, _to: SessionState) {}

    /// Called when a read or write error ends the session, before
    /// [`on_closed`](ChatHandler::on_closed)
    async fn on_error(&self, _error: &ClientError) {}

    /// Called exactly once, after the connection has been closed
    async fn on_closed(&self) {}
}

type NameFn = Box<dyn Fn() -> String + Send + Sync + 'static>;
type TextFn = Box<dyn Fn(&str) + Send + Sync + 'static>;

/// Callback-based handler implementation
///
/// This provides a way to build a handler from closures instead of implementing the
/// [`ChatHandler`] trait. Without an `on_request_name` callback an empty name is sent.
///
/// # Example
///
/// ```no_run
/// use chatter_client::CallbackHandler;
/// use std::sync::Arc;
///
/// let handler = Arc::new(CallbackHandler {
///     on_request_name: Some(Box::new(|| "alice".to_string())),
///     on_chat_message: Some(Box::new(|text: &str| println!("{}", text))),
///     on_closed: Some(Box::new(|| println!("Disconnected!"))),
///     ..Default::default()
/// });
/// ```
#[derive(Default)]
pub struct CallbackHandler {
    /// Called on name request
    pub on_request_name: Option<NameFn>,

    /// Called on name acceptance
    pub on_name_accepted: Option<TextFn>,

    /// Called on server notice
    pub on_system_notice: Option<TextFn>,

    /// Called on chat message
    pub on_chat_message: Option<TextFn>,

    /// Called on state transition
    pub on_transition: Option<Box<dyn Fn(SessionState, SessionState) + Send + Sync + 'static>>,

    /// Called on error
    pub on_error: Option<Box<dyn Fn(&ClientError) + Send + Sync + 'static>>,

    /// Called on close
    pub on_closed: Option<Box<dyn Fn() + Send + Sync + 'static>>,
}

#[async_trait]
impl ChatHandler for CallbackHandler {
    async fn request_screen_name(&self) -> String {
        match self.on_request_name {
            Some(ref f) => f(),
            None => String::new(),
        }
    }

    async fn on_name_accepted(&self, name: &str) {
        if let Some(ref f) = self.on_name_accepted {
            f(name);
        }
    }

    async fn on_system_notice(&self, text: &str) {
        if let Some(ref f) = self.on_system_notice {
            f(text);
        }
    }

    async fn on_chat_message(&self, text: &str) {
        if let Some(ref f) = self.on_chat_message {
            f(text);
        }
    }

    async fn on_transition(&self, from: SessionState, to: SessionState) {
        if let Some(ref f) = self.on_transition {
            f(from, to);
        }
    }

    async fn on_error(&self, error: &ClientError) {
        if let Some(ref f) = self.on_error {
            f(error);
        }
    }

    async fn on_closed(&self) {
        if let Some(ref f) = self.on_closed {
            f();
        }
    }
}

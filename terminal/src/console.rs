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

//! Line-oriented console presentation

use async_trait::async_trait;
use chatter_client::{ChatHandler, ClientError};
use std::io::{self, Write};
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::warn;

/// Kind of output line, used to tag what is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Screen name prompt
    SubmitName,
    /// Screen name accepted
    NameAccepted,
    /// Server notice
    System,
    /// Chat message
    Message,
}

impl Category {
    fn label(self) -> &'static str {
        match self {
            Category::SubmitName => "name",
            Category::NameAccepted => "welcome",
            Category::System => "system",
            Category::Message => "chat",
        }
    }
}

/// Format one output line as `[HH:MM:SS] <label> text`
pub fn format_line(timestamp: &str, category: Category, text: &str) -> String {
    format!("[{}] {:>7} | {}", timestamp, category.label(), text)
}

/// Console presenter
///
/// Prints session output to a writer and routes typed lines either to a pending
/// screen name prompt or back to the caller for submission.
pub struct ConsolePresenter<W: Write + Send + 'static> {
    out: Mutex<W>,
    pending_name: Mutex<Option<oneshot::Sender<String>>>,
}

impl ConsolePresenter<io::Stdout> {
    /// Presenter writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsolePresenter<W> {
    /// Presenter writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            pending_name: Mutex::new(None),
        }
    }

    /// Hand a typed line to a pending name prompt
    ///
    /// Returns the line back if no prompt is waiting.
    pub fn answer_prompt(&self, line: String) -> Result<(), String> {
        let pending = match self.pending_name.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => None,
        };
        match pending {
            Some(tx) => tx.send(line),
            None => Err(line),
        }
    }

    /// Abandon a pending prompt; the session receives an empty name
    pub fn cancel_prompt(&self) {
        if let Ok(mut pending) = self.pending_name.lock() {
            pending.take();
        }
    }

    /// Print a line of the given category
    pub fn render(&self, category: Category, text: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.write_raw(&format_line(&timestamp, category, text));
    }

    /// Print a line without timestamp or tag
    pub fn write_raw(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = writeln!(out, "{}", text).and_then(|()| out.flush()) {
                warn!(error = %e, "Failed to write console output");
            }
        }
    }

    /// Consume the presenter, returning its writer
    pub fn into_inner(self) -> Option<W> {
        self.out.into_inner().ok()
    }
}

#[async_trait]
impl<W: Write + Send + 'static> ChatHandler for ConsolePresenter<W> {
    async fn request_screen_name(&self) -> String {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut pending) = self.pending_name.lock() {
            *pending = Some(tx);
        }
        self.render(Category::SubmitName, "Please enter your screen name:");
        rx.await.unwrap_or_default()
    }

    async fn on_name_accepted(&self, name: &str) {
        self.write_raw(&format!("== Chatter - {} ==", name));
        self.render(
            Category::NameAccepted,
            "Welcome! Your name has been accepted.",
        );
    }

    async fn on_system_notice(&self, text: &str) {
        self.render(Category::System, text);
    }

    async fn on_chat_message(&self, text: &str) {
        self.render(Category::Message, text);
    }

    async fn on_error(&self, error: &ClientError) {
        self.render(Category::System, &format!("Connection error: {}", error));
    }

    async fn on_closed(&self) {
        self.cancel_prompt();
        self.render(Category::System, "Disconnected from server.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn output(presenter: ConsolePresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("12:34:56", Category::Message, "bob: hi"),
            "[12:34:56]    chat | bob: hi"
        );
        assert_eq!(
            format_line("00:00:00", Category::System, "bob has joined"),
            "[00:00:00]  system | bob has joined"
        );
    }

    #[test]
    fn test_answer_without_prompt_returns_line() {
        let presenter = ConsolePresenter::new(Vec::new());
        assert_eq!(presenter.answer_prompt("hello".to_string()), Err("hello".to_string()));
    }

    #[tokio::test]
    async fn test_prompt_is_answered_by_next_line() {
        let presenter = Arc::new(ConsolePresenter::new(Vec::new()));

        let prompt = {
            let presenter = presenter.clone();
            tokio::spawn(async move { presenter.request_screen_name().await })
        };

        // Wait until the prompt is registered
        let mut line = "alice".to_string();
        loop {
            match presenter.answer_prompt(line) {
                Ok(()) => break,
                Err(back) => {
                    line = back;
                    tokio::task::yield_now().await;
                }
            }
        }

        assert_eq!(prompt.await.unwrap(), "alice");
        // Prompt consumed; the next line is not captured
        assert!(presenter.answer_prompt("hi".to_string()).is_err());

        let presenter = Arc::into_inner(presenter).unwrap();
        assert!(output(presenter).contains("Please enter your screen name:"));
    }

    #[tokio::test]
    async fn test_cancelled_prompt_yields_empty_name() {
        let presenter = Arc::new(ConsolePresenter::new(Vec::new()));
        let prompt = {
            let presenter = presenter.clone();
            tokio::spawn(async move { presenter.request_screen_name().await })
        };

        // Closing the session abandons the prompt
        loop {
            tokio::task::yield_now().await;
            let waiting = presenter
                .pending_name
                .lock()
                .map(|pending| pending.is_some())
                .unwrap_or(false);
            if waiting {
                break;
            }
        }
        presenter.on_closed().await;

        assert_eq!(prompt.await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_notifications_are_rendered() {
        let presenter = ConsolePresenter::new(Vec::new());
        presenter.on_name_accepted("bob").await;
        presenter.on_system_notice("alice has joined").await;
        presenter.on_chat_message("alice: hi bob").await;

        let text = output(presenter);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "== Chatter - bob ==");
        assert!(lines[1].ends_with("welcome | Welcome! Your name has been accepted."));
        assert!(lines[2].ends_with(" system | alice has joined"));
        assert!(lines[3].ends_with("   chat | alice: hi bob"));
    }
}

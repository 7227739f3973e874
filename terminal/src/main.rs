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

//! Console Chat Client
//!
//! Connects to a chat server on port 59001, asks for a screen name when the server
//! requests one, prints notices and messages, and sends every typed line once the name
//! has been accepted.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin chatter -- localhost
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

mod console;

use chatter_client::{ChatSession, ClientConfig, SessionHandle};
use clap::Parser;
use console::{Category, ConsolePresenter};
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Connect to a chat server
#[derive(Debug, Parser)]
#[command(name = "chatter", version, about)]
struct Args {
    /// Server host name or IP address
    host: String,
}

type Presenter = ConsolePresenter<io::Stdout>;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = ClientConfig::for_host(args.host);
    let presenter = Arc::new(ConsolePresenter::stdout());

    let session = match ChatSession::connect(&config, presenter.clone()).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Unable to connect");
            eprintln!("chatter: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let handle = session.handle();
    let mut session_task = tokio::spawn(session.run());
    let mut input = spawn_stdin_reader();

    loop {
        tokio::select! {
            result = &mut session_task => return exit_code(result),
            line = input.recv() => match line {
                Some(line) => forward_line(&presenter, &handle, line).await,
                None => {
                    info!("Input closed, ending session");
                    handle.close().await;
                    presenter.cancel_prompt();
                    return exit_code(session_task.await);
                }
            },
        }
    }
}

/// Read stdin on a plain thread; a blocking read cannot be cancelled and would stall
/// runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn forward_line(presenter: &Presenter, handle: &SessionHandle, line: String) {
    let Err(line) = presenter.answer_prompt(line) else {
        return;
    };

    match handle.submit_line(&line).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(state = %handle.state(), "Line discarded");
            presenter.render(Category::System, "Not connected to the chat yet.");
        }
        Err(e) => {
            error!(error = %e, "Failed to send line");
            presenter.render(Category::System, &format!("Failed to send: {}", e));
        }
    }
}

fn exit_code(
    result: Result<chatter_client::Result<()>, tokio::task::JoinError>,
) -> ExitCode {
    match result {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            eprintln!("chatter: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Session task failed");
            ExitCode::FAILURE
        }
    }
}

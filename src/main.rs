//! Console front end.
//!
//! Reads `<chat_id> <input>` lines from stdin, where `/cmd` is a command and `@payload` a button
//! press (`1001 @add:1`). Replies are printed to stdout; pushes to other chats are printed by the
//! console transport. Stops on EOF or Ctrl-C.

use pickup_bot::clock::SystemClock;
use pickup_bot::config::load_config;
use pickup_bot::error::SystemError;
use pickup_bot::flow::{Command, Update};
use pickup_bot::lifecycle::{setup_tracing, PickupSystem};
use pickup_bot::notify::ConsoleTransport;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::task::TaskTracker;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    setup_tracing();

    let config = load_config()?;
    let mut system =
        PickupSystem::start(config, Arc::new(ConsoleTransport), Arc::new(SystemClock)).await?;
    system.spawn_sweeper();

    let commands: Vec<_> = Command::CATALOGUE.iter().map(|(name, _)| *name).collect();
    info!(?commands, "Ready. Type `<chat_id> <input>` lines");

    let tracker = TaskTracker::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let update = match Update::from_console_line(&line) {
            Ok(update) => update,
            Err(e) => {
                warn!(error = %e, "Ignoring line");
                continue;
            }
        };

        // Chats run concurrently; the router serialises the updates of one chat.
        let router = system.router.clone();
        let span = tracing::info_span!("console", chat = %update.chat.chat_id);
        tracker.spawn(
            async move {
                let chat = update.chat.chat_id;
                let mut out = String::new();
                for reply in router.handle(update).await {
                    out.push_str(&format!("[{chat}] {reply}\n"));
                }
                let mut stdout = tokio::io::stdout();
                if let Err(e) = stdout.write_all(out.as_bytes()).await {
                    warn!(error = %e, "Could not print reply");
                }
                let _ = stdout.flush().await;
            }
            .instrument(span),
        );
    }

    tracker.close();
    tracker.wait().await;
    system.shutdown().await
}

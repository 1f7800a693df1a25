//! Append-only JSON-lines log of game events.

use std::path::PathBuf;

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::core::GameEvent;

#[derive(Serialize)]
struct LogRecord<'a> {
    /// Milliseconds since the Unix epoch.
    ts: u64,
    #[serde(flatten)]
    event: &'a GameEvent,
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Write every event from `rx` to `path`, one JSON object per line.
///
/// The task ends when the driver stops or the file becomes unwritable.
pub fn spawn_event_log(path: PathBuf, mut rx: broadcast::Receiver<GameEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open event log");
                return;
            }
        };

        let mut buf: Vec<u8> = Vec::with_capacity(512);
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event log fell behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            buf.clear();
            let record = LogRecord {
                ts: now_ms(),
                event: &event,
            };
            if serde_json::to_writer(&mut buf, &record).is_err() {
                continue;
            }
            buf.push(b'\n');
            if let Err(e) = file.write_all(&buf).await {
                warn!(path = %path.display(), error = %e, "event log write failed");
                break;
            }
        }

        let _ = file.flush().await;
    })
}

//! Elapsed-time ticker shown next to each question.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use quizforge_core::format_duration;
use quizforge_core::time::Clock;

/// Publishes the elapsed `MM:SS` since `started_at` once per second.
///
/// The task is aborted when the ticker is dropped.
pub struct Ticker {
    rx: watch::Receiver<String>,
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn start(started_at: DateTime<Utc>) -> Self {
        let (tx, rx) = watch::channel(format_duration(0));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                let secs = Clock::System.seconds_since(started_at);
                if tx.send(format_duration(secs)).is_err() {
                    break;
                }
            }
        });
        Self { rx, handle }
    }

    /// Latest published elapsed time.
    pub fn current(&self) -> String {
        self.rx.borrow().clone()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

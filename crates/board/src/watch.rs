//! Lifecycle of a live board session: a background task consumes the
//! store's snapshot feed and publishes reconciled board states on a watch
//! channel. Consumers only ever see whole phases, never partial updates.

use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use store::TaskStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::BoardState;

/// What the session is showing right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum BoardPhase {
    /// No user context; nothing is fetched or subscribed.
    Unauthenticated,
    /// Subscribed, waiting for the first snapshot.
    Loading,
    /// Each snapshot fully replaces the previous board.
    Ready { board: BoardState },
    /// The feed broke; stale data is discarded rather than shown.
    Failed { message: String },
}

/// Owns the subscription for one board session. Dropping the watcher ends
/// the background task along with it.
pub struct BoardWatcher {
    receiver: watch::Receiver<BoardPhase>,
    handle: JoinHandle<()>,
}

impl BoardWatcher {
    pub fn spawn(store: Arc<dyn TaskStore>) -> Self {
        let (sender, receiver) = watch::channel(BoardPhase::Loading);
        let handle = tokio::spawn(async move {
            let mut subscription = store.subscribe();
            while let Some(event) = subscription.next().await {
                match event {
                    Ok(snapshot) => {
                        let board = BoardState::reconcile(&snapshot);
                        if sender.send(BoardPhase::Ready { board }).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "board snapshot feed failed");
                        let _ = sender.send(BoardPhase::Failed {
                            message: err.to_string(),
                        });
                        break;
                    }
                }
            }
        });
        Self { receiver, handle }
    }

    /// A fresh receiver positioned on the current phase.
    pub fn watch(&self) -> watch::Receiver<BoardPhase> {
        self.receiver.clone()
    }

    pub fn phase(&self) -> BoardPhase {
        self.receiver.borrow().clone()
    }
}

impl Drop for BoardWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

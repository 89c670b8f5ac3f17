//! HTTP surface over the task board and class roster.

use std::sync::Arc;

use board::{BoardWatcher, RosterUser, TaskOps};
use classes::ClassService;
use store::{ClassStore, TaskStore};

pub mod config;
pub mod error;
pub mod http;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStore>,
    pub ops: TaskOps,
    pub classes: ClassService,
    pub board: Arc<BoardWatcher>,
    pub roster: Arc<Vec<RosterUser>>,
}

impl AppState {
    /// Must run inside a tokio runtime: spawning the state takes the
    /// long-lived board subscription.
    pub fn spawn(
        tasks: Arc<dyn TaskStore>,
        classes: Arc<dyn ClassStore>,
        roster: Vec<RosterUser>,
    ) -> Self {
        Self {
            ops: TaskOps::new(tasks.clone()),
            classes: ClassService::new(classes),
            board: Arc::new(BoardWatcher::spawn(tasks.clone())),
            tasks,
            roster: Arc::new(roster),
        }
    }
}

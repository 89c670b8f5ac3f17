//! Board reconciliation: a full snapshot in, a freshly built board out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use store::{Snapshot, TaskDocument, TaskStatus};
use strum_macros::Display;
use uuid::Uuid;

/// The three fixed buckets, in render order.
pub const COLUMN_ORDER: [ColumnId; 3] = [ColumnId::Todo, ColumnId::InProgress, ColumnId::Done];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColumnId {
    Todo,
    InProgress,
    Done,
}

impl ColumnId {
    pub fn status(self) -> TaskStatus {
        match self {
            ColumnId::Todo => TaskStatus::Todo,
            ColumnId::InProgress => TaskStatus::InProgress,
            ColumnId::Done => TaskStatus::Done,
        }
    }

    /// A status with no bucket (unrecognized) maps to no column.
    pub fn from_status(status: TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Todo => Some(ColumnId::Todo),
            TaskStatus::InProgress => Some(ColumnId::InProgress),
            TaskStatus::Done => Some(ColumnId::Done),
            TaskStatus::Unrecognized => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ColumnId::Todo => "A Fazer",
            ColumnId::InProgress => "Em Progresso",
            ColumnId::Done => "Feito",
        }
    }
}

/// Derived column membership; rebuilt from scratch on every snapshot and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub task_ids: Vec<Uuid>,
}

impl Column {
    fn empty(id: ColumnId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            task_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub tasks_by_id: HashMap<Uuid, TaskDocument>,
    pub columns: Vec<Column>,
}

impl BoardState {
    /// Full replace: clear every bucket, walk the snapshot in document
    /// order, index each readable task and append it to the bucket its
    /// status names. Malformed documents are skipped, tasks with an
    /// unrecognized status stay indexed but join no column.
    pub fn reconcile(snapshot: &Snapshot) -> Self {
        let mut tasks_by_id = HashMap::with_capacity(snapshot.len());
        let mut columns: Vec<Column> = COLUMN_ORDER.iter().map(|id| Column::empty(*id)).collect();

        for task in parse_tasks(snapshot) {
            if let Some(column_id) = ColumnId::from_status(task.status)
                && let Some(column) = columns.iter_mut().find(|c| c.id == column_id)
            {
                column.task_ids.push(task.id);
            }
            tasks_by_id.insert(task.id, task);
        }

        Self {
            tasks_by_id,
            columns,
        }
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Tasks of one column in its id order, skipping ids that vanished.
    pub fn tasks_in(&self, id: ColumnId) -> Vec<&TaskDocument> {
        self.column(id)
            .map(|column| {
                column
                    .task_ids
                    .iter()
                    .filter_map(|task_id| self.tasks_by_id.get(task_id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Every readable task of a snapshot, in document order. Documents another
/// client wrote in an unexpected shape are logged and dropped instead of
/// failing the whole board.
pub fn parse_tasks(snapshot: &Snapshot) -> Vec<TaskDocument> {
    snapshot
        .docs
        .iter()
        .filter_map(|raw| match serde_json::from_value(raw.data.clone()) {
            Ok(task) => Some(task),
            Err(err) => {
                tracing::warn!(doc_id = %raw.id, error = %err, "skipping unreadable task document");
                None
            }
        })
        .collect()
}

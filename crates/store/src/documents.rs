use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::TaskStatus;

/// One document as delivered inside a snapshot. `data` is the full
/// serialized document (id included); keeping it raw lets consumers skip an
/// individually malformed document without rejecting the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: Uuid,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee_id: Uuid,
    pub assignee_name: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub moved_at: DateTime<Utc>,
    /// Normalized to local midnight before storage; absent stores null.
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    pub created_by: Uuid,
    pub created_by_name: String,
    #[serde(default)]
    pub updated_by: Option<Uuid>,
    #[serde(default)]
    pub updated_by_name: Option<String>,
}

/// Fields the caller supplies on create; the store assigns the id and the
/// three server timestamps, and every new task starts in todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee_id: Uuid,
    pub assignee_name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    pub created_by: Uuid,
    pub created_by_name: String,
}

/// Full-field replacement applied by the edit path. Status is deliberately
/// absent: only the move operation mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEdit {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee_id: Uuid,
    pub assignee_name: String,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    pub updated_by: Uuid,
    pub updated_by_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDocument {
    pub id: Uuid,
    pub name: String,
    pub grade: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    pub grade: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEdit {
    pub name: String,
    pub grade: String,
    pub teacher_name: String,
}

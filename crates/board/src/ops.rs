//! Write operations behind the board view. Permission and validation
//! failures are rejected before any store call; store failures surface once
//! and leave local state alone — the next snapshot is the truth.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use store::{NewTask, TaskDocument, TaskEdit, TaskStore};
use uuid::Uuid;

use crate::{
    error::BoardError,
    permissions::{assignable_users, can_add, can_drag, can_manage},
    selection::Selection,
    state::ColumnId,
    user::{RosterUser, UserContext},
};

/// What the create/edit form submits. The due date arrives as a calendar
/// date string and is normalized to local midnight before storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assignee_id: Uuid,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// A drop event. Same column and same position means nothing happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: ColumnId,
    pub to: ColumnId,
    pub from_index: usize,
    pub to_index: usize,
}

impl MoveRequest {
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.from_index == self.to_index
    }
}

#[derive(Clone)]
pub struct TaskOps {
    store: Arc<dyn TaskStore>,
}

impl TaskOps {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// New tasks always start in todo with all three timestamps assigned by
    /// the store. The assignee must resolve against what the actor is
    /// allowed to assign: managers pick from the whole roster, everyone
    /// else only themselves.
    pub async fn create(
        &self,
        ctx: &UserContext,
        roster: &[RosterUser],
        draft: TaskDraft,
    ) -> Result<TaskDocument, BoardError> {
        if !can_add(ctx.role) {
            return Err(BoardError::Forbidden(
                "this role cannot add tasks".to_string(),
            ));
        }
        if draft.title.trim().is_empty() {
            return Err(BoardError::Validation("task title is required".to_string()));
        }

        let assignee = resolve_assignee(&assignable_users(ctx, roster), draft.assignee_id)?;
        let due_date = normalize_due_date(draft.due_date.as_deref())?;

        let created = self
            .store
            .create(NewTask {
                title: draft.title,
                description: draft.description,
                assignee_id: assignee.id,
                assignee_name: assignee.name,
                due_date,
                created_by: ctx.id,
                created_by_name: ctx.name.clone(),
            })
            .await?;

        tracing::info!(task_id = %created.id, by = %ctx.id, "task created");
        Ok(created)
    }

    /// Replaces title, description, assignee and due date and stamps the
    /// updater. Status is never mutated here; only the move path does that.
    pub async fn update(
        &self,
        ctx: &UserContext,
        roster: &[RosterUser],
        id: Uuid,
        draft: TaskDraft,
    ) -> Result<TaskDocument, BoardError> {
        if !can_manage(ctx.role) {
            return Err(BoardError::Forbidden(
                "only coordination or direction may edit tasks".to_string(),
            ));
        }
        if draft.title.trim().is_empty() {
            return Err(BoardError::Validation("task title is required".to_string()));
        }

        let assignee = resolve_assignee(roster, draft.assignee_id)?;
        let due_date = normalize_due_date(draft.due_date.as_deref())?;

        let updated = self
            .store
            .apply_edit(
                id,
                TaskEdit {
                    title: draft.title,
                    description: draft.description,
                    assignee_id: assignee.id,
                    assignee_name: assignee.name,
                    due_date,
                    updated_by: ctx.id,
                    updated_by_name: ctx.name.clone(),
                },
            )
            .await?;

        tracing::info!(task_id = %id, by = %ctx.id, "task updated");
        Ok(updated)
    }

    /// One document update per drop: status plus the two store-assigned
    /// stamps. No optimistic local mutation — the realtime feed pushes the
    /// result back.
    pub async fn move_task(
        &self,
        ctx: &UserContext,
        id: Uuid,
        request: MoveRequest,
    ) -> Result<Option<TaskDocument>, BoardError> {
        if request.is_noop() {
            return Ok(None);
        }

        let task = self
            .store
            .get(id)
            .await?
            .ok_or(BoardError::Store(store::StoreError::NotFound(id)))?;

        if !can_drag(ctx.role, &task, ctx.id) {
            return Err(BoardError::Forbidden(
                "cannot move a task assigned to someone else".to_string(),
            ));
        }

        let moved = self.store.set_status(id, request.to.status()).await?;
        tracing::info!(task_id = %id, to = %request.to, "task moved");
        Ok(Some(moved))
    }

    /// Single-card delete; destructive, so it demands the explicit
    /// confirmation the caller collected from the user.
    pub async fn delete(
        &self,
        ctx: &UserContext,
        id: Uuid,
        confirmed: bool,
    ) -> Result<u64, BoardError> {
        if !can_manage(ctx.role) {
            return Err(BoardError::Forbidden(
                "only coordination or direction may delete tasks".to_string(),
            ));
        }
        if !confirmed {
            return Err(BoardError::Validation(
                "deletion requires confirmation".to_string(),
            ));
        }

        let removed = self.store.delete(id).await?;
        tracing::info!(task_id = %id, removed, "task deleted");
        Ok(removed)
    }

    /// Bulk delete of the selected done cards in one atomic batch. On
    /// success the selection is cleared; on failure it is left exactly as
    /// it was and the error surfaces once.
    pub async fn delete_selected(
        &self,
        ctx: &UserContext,
        selection: &mut Selection,
        confirmed: bool,
    ) -> Result<usize, BoardError> {
        if !can_manage(ctx.role) {
            return Err(BoardError::Forbidden(
                "only coordination or direction may bulk-delete".to_string(),
            ));
        }
        if selection.is_empty() {
            return Err(BoardError::Validation("no tasks selected".to_string()));
        }
        if !confirmed {
            return Err(BoardError::Validation(
                "bulk deletion requires confirmation".to_string(),
            ));
        }

        let ids = selection.ids();
        self.store.delete_batch(&ids).await?;
        selection.clear();
        tracing::info!(count = ids.len(), by = %ctx.id, "selected tasks deleted");
        Ok(ids.len())
    }
}

fn resolve_assignee(
    allowed: &[RosterUser],
    assignee_id: Uuid,
) -> Result<RosterUser, BoardError> {
    allowed
        .iter()
        .find(|user| user.id == assignee_id)
        .cloned()
        .ok_or_else(|| BoardError::Validation("assignee not found".to_string()))
}

/// "YYYY-MM-DD" becomes that date at local midnight; empty or missing
/// stores null.
fn normalize_due_date(raw: Option<&str>) -> Result<Option<NaiveDateTime>, BoardError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| Some(date.and_time(NaiveTime::MIN)))
        .map_err(|_| BoardError::Validation(format!("invalid due date: {trimmed}")))
}

//! Shared fixtures for the workspace test suites: canned documents, user
//! contexts and a store wrapper with an injected batch failure.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use board::{Role, RosterUser, UserContext};
use chrono::Utc;
use store::{
    MemoryStore, NewTask, RawDocument, Snapshot, StoreError, Subscription, TaskDocument,
    TaskEdit, TaskStatus, TaskStore,
};
use uuid::Uuid;

static SEQ: AtomicU32 = AtomicU32::new(0);

fn next_name(prefix: &str) -> String {
    format!("{prefix}-{}", SEQ.fetch_add(1, Ordering::Relaxed))
}

/// A well-formed task document with fresh ids and current timestamps,
/// assigned to a synthetic user of its own.
pub fn task_doc(title: &str, status: TaskStatus) -> TaskDocument {
    let now = Utc::now();
    let assignee = Uuid::new_v4();
    TaskDocument {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        assignee_id: assignee,
        assignee_name: next_name("assignee"),
        status,
        created_at: now,
        updated_at: now,
        moved_at: now,
        due_date: None,
        created_by: assignee,
        created_by_name: next_name("creator"),
        updated_by: None,
        updated_by_name: None,
    }
}

/// The snapshot form of a task: full serialized document under its id.
pub fn raw_task(task: &TaskDocument) -> RawDocument {
    RawDocument {
        id: task.id,
        data: serde_json::to_value(task).unwrap(),
    }
}

/// A user context with the given role and a unique id/name pair.
pub fn user(role: Role) -> UserContext {
    UserContext {
        id: Uuid::new_v4(),
        name: next_name("user"),
        role,
    }
}

/// The roster entries for the given users, in order.
pub fn roster_of(users: &[&UserContext]) -> Vec<RosterUser> {
    users
        .iter()
        .map(|ctx| RosterUser {
            id: ctx.id,
            name: ctx.name.clone(),
        })
        .collect()
}

/// A [`TaskStore`] that behaves exactly like the wrapped in-memory store
/// except that every batch delete fails, for exercising the all-or-nothing
/// contract.
pub struct FailingBatchStore {
    inner: Arc<MemoryStore>,
}

impl FailingBatchStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl TaskStore for FailingBatchStore {
    fn subscribe(&self) -> Subscription {
        TaskStore::subscribe(self.inner.as_ref())
    }

    async fn snapshot(&self) -> Snapshot {
        TaskStore::snapshot(self.inner.as_ref()).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError> {
        self.inner.get(id).await
    }

    async fn create(&self, new: NewTask) -> Result<TaskDocument, StoreError> {
        TaskStore::create(self.inner.as_ref(), new).await
    }

    async fn apply_edit(&self, id: Uuid, edit: TaskEdit) -> Result<TaskDocument, StoreError> {
        self.inner.apply_edit(id, edit).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<TaskDocument, StoreError> {
        self.inner.set_status(id, status).await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        TaskStore::delete(self.inner.as_ref(), id).await
    }

    async fn delete_batch(&self, _ids: &[Uuid]) -> Result<(), StoreError> {
        Err(StoreError::BatchFailed(
            "injected failure for tests".to_string(),
        ))
    }
}

/// A [`TaskStore`] whose realtime feed delivers one empty snapshot and
/// then breaks, for exercising the terminal-error contract of consumers.
pub struct BrokenFeedStore {
    inner: Arc<MemoryStore>,
}

impl BrokenFeedStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl TaskStore for BrokenFeedStore {
    fn subscribe(&self) -> Subscription {
        Subscription::from_stream(futures::stream::iter([
            Ok(Snapshot::default()),
            Err(StoreError::SubscriptionLost),
        ]))
    }

    async fn snapshot(&self) -> Snapshot {
        TaskStore::snapshot(self.inner.as_ref()).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError> {
        self.inner.get(id).await
    }

    async fn create(&self, new: NewTask) -> Result<TaskDocument, StoreError> {
        TaskStore::create(self.inner.as_ref(), new).await
    }

    async fn apply_edit(&self, id: Uuid, edit: TaskEdit) -> Result<TaskDocument, StoreError> {
        self.inner.apply_edit(id, edit).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<TaskDocument, StoreError> {
        self.inner.set_status(id, status).await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        TaskStore::delete(self.inner.as_ref(), id).await
    }

    async fn delete_batch(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        self.inner.delete_batch(ids).await
    }
}

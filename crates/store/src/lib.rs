//! Client layer for the hosted document store.
//!
//! The real database is an external managed service: collections of JSON
//! documents, realtime change subscriptions that deliver the *full*
//! collection on every change, and atomic multi-document delete batches.
//! This crate owns the typed seam ([`TaskStore`] / [`ClassStore`]) and an
//! in-memory backend with the same observable semantics, used as the
//! reference collaborator and by every test in the workspace.

use async_trait::async_trait;
use uuid::Uuid;

pub mod documents;
pub mod memory;
pub mod snapshot;
pub mod types;

pub use documents::{
    ClassDocument, ClassEdit, NewClass, NewTask, RawDocument, TaskDocument, TaskEdit,
};
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotHub, Subscription};
pub use types::TaskStatus;

pub const TASKS_COLLECTION: &str = "tasks";
pub const CLASSES_COLLECTION: &str = "classes";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {0} not found")]
    NotFound(Uuid),
    #[error("batch delete failed: {0}")]
    BatchFailed(String),
    #[error("realtime subscription lost")]
    SubscriptionLost,
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Operations on the "tasks" collection.
///
/// All writes are fire-and-await: they run to completion or failure as
/// reported by the store, with no client-side retry, timeout or
/// cancellation. Concurrent writers are resolved by the store itself
/// (last write wins per document).
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Realtime feed: the current snapshot immediately, then a fresh full
    /// snapshot after every change. Dropping the subscription releases the
    /// listener.
    fn subscribe(&self) -> Subscription;

    async fn snapshot(&self) -> Snapshot;

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError>;

    /// Store assigns the id and stamps created_at/updated_at/moved_at.
    async fn create(&self, new: NewTask) -> Result<TaskDocument, StoreError>;

    /// Replaces title, description, assignee fields and due date and stamps
    /// updated_at/updated_by. Status and moved_at are never touched here.
    async fn apply_edit(&self, id: Uuid, edit: TaskEdit) -> Result<TaskDocument, StoreError>;

    /// The move path: sets status and stamps updated_at + moved_at, nothing
    /// else.
    async fn set_status(&self, id: Uuid, status: TaskStatus)
    -> Result<TaskDocument, StoreError>;

    /// Returns the number of documents removed (0 when already gone).
    async fn delete(&self, id: Uuid) -> Result<u64, StoreError>;

    /// Atomic multi-document delete: either every id is removed or the
    /// store reports failure and nothing changes.
    async fn delete_batch(&self, ids: &[Uuid]) -> Result<(), StoreError>;
}

/// CRUD analog over the "classes" collection.
#[async_trait]
pub trait ClassStore: Send + Sync {
    fn subscribe(&self) -> Subscription;

    async fn snapshot(&self) -> Snapshot;

    async fn create(&self, new: NewClass) -> Result<ClassDocument, StoreError>;

    async fn update(&self, id: Uuid, edit: ClassEdit) -> Result<ClassDocument, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError>;
}

//! In-memory backend with the managed store's observable semantics.
//!
//! Writes are applied under one lock and followed by a full-collection
//! snapshot publish, so subscribers observe the same
//! snapshot-on-every-change contract the hosted service provides.

use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    CLASSES_COLLECTION, ClassStore, StoreError, TASKS_COLLECTION, TaskStore,
    documents::{
        ClassDocument, ClassEdit, NewClass, NewTask, RawDocument, TaskDocument, TaskEdit,
    },
    snapshot::{Snapshot, SnapshotHub, Subscription},
    types::TaskStatus,
};

/// One schemaless collection table. Document order is insertion order,
/// which is the order snapshots list documents in.
#[derive(Default)]
struct Table {
    order: Vec<Uuid>,
    docs: HashMap<Uuid, Value>,
}

impl Table {
    fn insert(&mut self, id: Uuid, data: Value) {
        if !self.docs.contains_key(&id) {
            self.order.push(id);
        }
        self.docs.insert(id, data);
    }

    fn remove(&mut self, id: Uuid) -> Option<Value> {
        let removed = self.docs.remove(&id);
        if removed.is_some() {
            self.order.retain(|existing| *existing != id);
        }
        removed
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            docs: self
                .order
                .iter()
                .filter_map(|id| {
                    self.docs.get(id).map(|data| RawDocument {
                        id: *id,
                        data: data.clone(),
                    })
                })
                .collect(),
        }
    }
}

pub struct MemoryStore {
    tasks: RwLock<Table>,
    classes: RwLock<Table>,
    task_hub: SnapshotHub,
    class_hub: SnapshotHub,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Table::default()),
            classes: RwLock::new(Table::default()),
            task_hub: SnapshotHub::new(),
            class_hub: SnapshotHub::new(),
        }
    }

    /// The store is schemaless: any JSON document can land in a collection.
    /// Lets tests reproduce documents written by other (buggy) clients.
    pub fn seed_raw_task(&self, id: Uuid, data: Value) {
        let snapshot = {
            let mut tasks = self.write_table(&self.tasks);
            tasks.insert(id, data);
            tasks.snapshot()
        };
        self.task_hub.publish(snapshot);
    }

    pub fn task_listener_count(&self) -> usize {
        self.task_hub.listener_count()
    }

    pub fn class_listener_count(&self) -> usize {
        self.class_hub.listener_count()
    }

    fn write_table<'a>(&self, table: &'a RwLock<Table>) -> std::sync::RwLockWriteGuard<'a, Table> {
        table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_table<'a>(&self, table: &'a RwLock<Table>) -> std::sync::RwLockReadGuard<'a, Table> {
        table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn parse_task(&self, id: Uuid, data: &Value) -> Result<TaskDocument, StoreError> {
        serde_json::from_value(data.clone())
            .map_err(|err| StoreError::Backend(format!("task {id} is not readable: {err}")))
    }

    fn encode<T: serde::Serialize>(&self, doc: &T) -> Result<Value, StoreError> {
        serde_json::to_value(doc).map_err(|err| StoreError::Backend(err.to_string()))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    fn subscribe(&self) -> Subscription {
        self.task_hub.subscribe()
    }

    async fn snapshot(&self) -> Snapshot {
        self.read_table(&self.tasks).snapshot()
    }

    async fn get(&self, id: Uuid) -> Result<Option<TaskDocument>, StoreError> {
        let tasks = self.read_table(&self.tasks);
        match tasks.docs.get(&id) {
            Some(data) => Ok(Some(self.parse_task(id, data)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, new: NewTask) -> Result<TaskDocument, StoreError> {
        let now = Utc::now();
        let doc = TaskDocument {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            assignee_id: new.assignee_id,
            assignee_name: new.assignee_name,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
            moved_at: now,
            due_date: new.due_date,
            created_by: new.created_by,
            created_by_name: new.created_by_name,
            updated_by: None,
            updated_by_name: None,
        };
        let data = self.encode(&doc)?;

        let snapshot = {
            let mut tasks = self.write_table(&self.tasks);
            tasks.insert(doc.id, data);
            tasks.snapshot()
        };
        tracing::debug!(collection = TASKS_COLLECTION, task_id = %doc.id, "document created");
        self.task_hub.publish(snapshot);
        Ok(doc)
    }

    async fn apply_edit(&self, id: Uuid, edit: TaskEdit) -> Result<TaskDocument, StoreError> {
        let (doc, snapshot) = {
            let mut tasks = self.write_table(&self.tasks);
            let data = tasks.docs.get(&id).ok_or(StoreError::NotFound(id))?;
            let mut doc = self.parse_task(id, data)?;

            doc.title = edit.title;
            doc.description = edit.description;
            doc.assignee_id = edit.assignee_id;
            doc.assignee_name = edit.assignee_name;
            doc.due_date = edit.due_date;
            doc.updated_at = Utc::now();
            doc.updated_by = Some(edit.updated_by);
            doc.updated_by_name = Some(edit.updated_by_name);

            let data = self.encode(&doc)?;
            tasks.insert(id, data);
            (doc, tasks.snapshot())
        };
        self.task_hub.publish(snapshot);
        Ok(doc)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<TaskDocument, StoreError> {
        let (doc, snapshot) = {
            let mut tasks = self.write_table(&self.tasks);
            let data = tasks.docs.get(&id).ok_or(StoreError::NotFound(id))?;
            let mut doc = self.parse_task(id, data)?;

            let now = Utc::now();
            doc.status = status;
            doc.updated_at = now;
            doc.moved_at = now;

            let data = self.encode(&doc)?;
            tasks.insert(id, data);
            (doc, tasks.snapshot())
        };
        self.task_hub.publish(snapshot);
        Ok(doc)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        let snapshot = {
            let mut tasks = self.write_table(&self.tasks);
            if tasks.remove(id).is_none() {
                return Ok(0);
            }
            tasks.snapshot()
        };
        tracing::debug!(collection = TASKS_COLLECTION, task_id = %id, "document deleted");
        self.task_hub.publish(snapshot);
        Ok(1)
    }

    async fn delete_batch(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        let snapshot = {
            let mut tasks = self.write_table(&self.tasks);
            // Validate the whole batch before touching anything: all or
            // nothing.
            for id in ids {
                if !tasks.docs.contains_key(id) {
                    return Err(StoreError::BatchFailed(format!(
                        "document {id} not found"
                    )));
                }
            }
            for id in ids {
                tasks.remove(*id);
            }
            tasks.snapshot()
        };
        tracing::debug!(
            collection = TASKS_COLLECTION,
            count = ids.len(),
            "batch delete committed"
        );
        self.task_hub.publish(snapshot);
        Ok(())
    }
}

#[async_trait]
impl ClassStore for MemoryStore {
    fn subscribe(&self) -> Subscription {
        self.class_hub.subscribe()
    }

    async fn snapshot(&self) -> Snapshot {
        self.read_table(&self.classes).snapshot()
    }

    async fn create(&self, new: NewClass) -> Result<ClassDocument, StoreError> {
        let doc = ClassDocument {
            id: Uuid::new_v4(),
            name: new.name,
            grade: new.grade,
            teacher_name: new.teacher_name,
        };
        let data = self.encode(&doc)?;

        let snapshot = {
            let mut classes = self.write_table(&self.classes);
            classes.insert(doc.id, data);
            classes.snapshot()
        };
        tracing::debug!(collection = CLASSES_COLLECTION, class_id = %doc.id, "document created");
        self.class_hub.publish(snapshot);
        Ok(doc)
    }

    async fn update(&self, id: Uuid, edit: ClassEdit) -> Result<ClassDocument, StoreError> {
        let (doc, snapshot) = {
            let mut classes = self.write_table(&self.classes);
            if !classes.docs.contains_key(&id) {
                return Err(StoreError::NotFound(id));
            }
            let doc = ClassDocument {
                id,
                name: edit.name,
                grade: edit.grade,
                teacher_name: edit.teacher_name,
            };
            let data = self.encode(&doc)?;
            classes.insert(id, data);
            (doc, classes.snapshot())
        };
        self.class_hub.publish(snapshot);
        Ok(doc)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        let snapshot = {
            let mut classes = self.write_table(&self.classes);
            if classes.remove(id).is_none() {
                return Ok(0);
            }
            classes.snapshot()
        };
        self.class_hub.publish(snapshot);
        Ok(1)
    }
}

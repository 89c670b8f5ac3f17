//! Live class roster: the simpler CRUD analog of the task board. No roles
//! here; any authenticated user may manage classes, the unauthenticated see
//! nothing and subscribe to nothing.

use std::sync::Arc;

use board::UserContext;
use store::{ClassDocument, ClassEdit, ClassStore, NewClass, Snapshot, StoreError, Subscription};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ClassError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Every readable class of a snapshot, in document order; unreadable
/// documents are logged and dropped.
pub fn parse_classes(snapshot: &Snapshot) -> Vec<ClassDocument> {
    snapshot
        .docs
        .iter()
        .filter_map(|raw| match serde_json::from_value(raw.data.clone()) {
            Ok(class) => Some(class),
            Err(err) => {
                tracing::warn!(doc_id = %raw.id, error = %err, "skipping unreadable class document");
                None
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct ClassService {
    store: Arc<dyn ClassStore>,
}

impl ClassService {
    pub fn new(store: Arc<dyn ClassStore>) -> Self {
        Self { store }
    }

    /// Realtime feed of full class snapshots. Refused without a user
    /// context, in which case no listener is registered at all.
    pub fn subscribe(&self, ctx: Option<&UserContext>) -> Result<Subscription, ClassError> {
        if ctx.is_none() {
            return Err(ClassError::Unauthenticated);
        }
        Ok(self.store.subscribe())
    }

    pub async fn list(&self) -> Vec<ClassDocument> {
        parse_classes(&self.store.snapshot().await)
    }

    pub async fn add(&self, ctx: &UserContext, new: NewClass) -> Result<ClassDocument, ClassError> {
        let created = self.store.create(new).await.inspect_err(
            |err| tracing::error!(error = %err, by = %ctx.id, "class create failed"),
        )?;
        tracing::info!(class_id = %created.id, by = %ctx.id, "class created");
        Ok(created)
    }

    pub async fn update(
        &self,
        ctx: &UserContext,
        id: Uuid,
        edit: ClassEdit,
    ) -> Result<ClassDocument, ClassError> {
        let updated = self.store.update(id, edit).await.inspect_err(
            |err| tracing::error!(error = %err, class_id = %id, by = %ctx.id, "class update failed"),
        )?;
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &UserContext, id: Uuid) -> Result<u64, ClassError> {
        let removed = self.store.delete(id).await.inspect_err(
            |err| tracing::error!(error = %err, class_id = %id, by = %ctx.id, "class delete failed"),
        )?;
        tracing::info!(class_id = %id, removed, by = %ctx.id, "class deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use board::Role;
    use futures::StreamExt;
    use store::MemoryStore;
    use test_support::user;

    use super::*;

    fn service() -> (Arc<MemoryStore>, ClassService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), ClassService::new(store))
    }

    fn turma(name: &str) -> NewClass {
        NewClass {
            name: name.to_string(),
            grade: "5º ano".to_string(),
            teacher_name: "Marta".to_string(),
        }
    }

    #[tokio::test]
    async fn subscribing_without_a_user_registers_no_listener() {
        let (store, service) = service();

        let err = service.subscribe(None).unwrap_err();
        assert!(matches!(err, ClassError::Unauthenticated));
        assert_eq!(store.class_listener_count(), 0);
    }

    #[tokio::test]
    async fn crud_round_trip_is_visible_in_the_list() {
        let (_store, service) = service();
        let ctx = user(Role::Coordenador);

        let created = service.add(&ctx, turma("Turma A")).await.unwrap();
        let other = service.add(&ctx, turma("Turma B")).await.unwrap();

        let updated = service
            .update(
                &ctx,
                created.id,
                ClassEdit {
                    name: "Turma A2".to_string(),
                    grade: created.grade.clone(),
                    teacher_name: created.teacher_name.clone(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Turma A2");

        assert_eq!(service.delete(&ctx, other.id).await.unwrap(), 1);

        let names: Vec<_> = service.list().await.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Turma A2"]);
    }

    #[tokio::test]
    async fn authenticated_subscription_sees_current_then_live() {
        let (_store, service) = service();
        let ctx = user(Role::Professor);

        let mut feed = service.subscribe(Some(&ctx)).unwrap();
        let first = feed.next().await.unwrap().unwrap();
        assert!(first.is_empty());

        service.add(&ctx, turma("Turma C")).await.unwrap();
        let next = feed.next().await.unwrap().unwrap();
        assert_eq!(parse_classes(&next).len(), 1);
    }

    #[tokio::test]
    async fn updating_a_missing_class_reports_not_found() {
        let (_store, service) = service();
        let ctx = user(Role::Diretor);
        let id = Uuid::new_v4();

        let err = service
            .update(&ctx, id, ClassEdit {
                name: "x".to_string(),
                grade: "y".to_string(),
                teacher_name: "z".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClassError::Store(StoreError::NotFound(_))));
    }
}

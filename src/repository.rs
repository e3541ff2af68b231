//! Resource-level operations composed from store calls.

use crate::error::{Operation, RepoError};
use crate::models::Resource;
use crate::store::Storage;
use std::sync::Arc;

/// Repository for one resource. Cheap to clone; stores are shared.
pub struct Repository<R: Resource> {
    store: Arc<dyn Storage<R>>,
}

impl<R: Resource> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Repository {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(store: Arc<dyn Storage<R>>) -> Self {
        Repository { store }
    }

    /// Insert and return the submitted record stamped with its new id.
    #[tracing::instrument(name = "Repository.create", skip_all, fields(resource = R::NAME), err)]
    pub async fn create(&self, new: R::New) -> Result<R, RepoError> {
        let id = self
            .store
            .create(&new)
            .await
            .map_err(|e| RepoError::new(Operation::Create, R::NAME, e))?;
        tracing::info!(id, "created");
        Ok(R::from_new(id, new))
    }

    #[tracing::instrument(name = "Repository.read", skip(self), fields(resource = R::NAME), err)]
    pub async fn read(&self, id: i32) -> Result<R, RepoError> {
        self.store
            .read(id)
            .await
            .map_err(|e| RepoError::new(Operation::Read, R::NAME, e))
    }

    /// Apply the patch and return the row as stored after the update.
    #[tracing::instrument(name = "Repository.update", skip_all, fields(resource = R::NAME), err)]
    pub async fn update(&self, patch: R::Patch) -> Result<R, RepoError> {
        let updated = self
            .store
            .update(&patch)
            .await
            .map_err(|e| RepoError::new(Operation::Update, R::NAME, e))?;
        tracing::info!(id = updated.id(), "updated");
        Ok(updated)
    }

    /// Read then delete, returning the row as it was before deletion.
    /// The two statements are not atomic: a concurrent delete between them
    /// surfaces as a row-count mismatch from the delete step.
    #[tracing::instrument(name = "Repository.delete", skip(self), fields(resource = R::NAME), err)]
    pub async fn delete(&self, id: i32) -> Result<R, RepoError> {
        let snapshot = self
            .store
            .read(id)
            .await
            .map_err(|e| RepoError::new(Operation::Read, R::NAME, e))?;
        self.store
            .delete(id)
            .await
            .map_err(|e| RepoError::new(Operation::Delete, R::NAME, e))?;
        tracing::info!(id, "deleted");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StoreError};
    use crate::models::{NewPost, Post, PostPatch};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockPosts {
        rows: Mutex<HashMap<i32, Post>>,
        next_id: AtomicUsize,
        deletes_issued: AtomicUsize,
    }

    #[async_trait]
    impl Storage<Post> for MockPosts {
        async fn create(&self, new: &NewPost) -> Result<i32, StoreError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
            self.rows
                .lock()
                .unwrap()
                .insert(id, Post::from_new(id, new.clone()));
            Ok(id)
        }

        async fn read(&self, id: i32) -> Result<Post, StoreError> {
            self.rows
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound { resource: "post", id })
        }

        async fn update(&self, patch: &PostPatch) -> Result<Post, StoreError> {
            let id = patch
                .id
                .ok_or_else(|| StoreError::QueryCompilation("no id specified".into()))?;
            let mut rows = self.rows.lock().unwrap();
            let post = rows.get_mut(&id).ok_or(StoreError::RowCountMismatch {
                op: Operation::Update,
                resource: "post",
                affected: 0,
            })?;
            if let Some(t) = &patch.title {
                post.title = t.clone();
            }
            Ok(post.clone())
        }

        async fn delete(&self, id: i32) -> Result<(), StoreError> {
            self.deletes_issued.fetch_add(1, Ordering::SeqCst);
            match self.rows.lock().unwrap().remove(&id) {
                Some(_) => Ok(()),
                None => Err(StoreError::RowCountMismatch {
                    op: Operation::Delete,
                    resource: "post",
                    affected: 0,
                }),
            }
        }
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.into(),
            body: "body".into(),
            user_id: Some(1),
        }
    }

    #[tokio::test]
    async fn create_stamps_generated_id() {
        let repo = Repository::<Post>::new(Arc::new(MockPosts::default()));
        let post = repo.create(new_post("first")).await.unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(repo.read(1).await.unwrap(), post);
    }

    #[tokio::test]
    async fn read_missing_is_distinguishable_not_found() {
        let repo = Repository::<Post>::new(Arc::new(MockPosts::default()));
        let err = repo.read(99).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "cannot read post: not found: post id 99");
    }

    #[tokio::test]
    async fn delete_returns_snapshot() {
        let repo = Repository::<Post>::new(Arc::new(MockPosts::default()));
        let created = repo.create(new_post("doomed")).await.unwrap();
        let deleted = repo.delete(created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(repo.read(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_of_missing_id_never_issues_delete() {
        let store = Arc::new(MockPosts::default());
        let repo = Repository::<Post>::new(store.clone());
        let err = repo.delete(5).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.op, Operation::Read);
        assert_eq!(store.deletes_issued.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_wraps_store_errors_with_operation() {
        let repo = Repository::<Post>::new(Arc::new(MockPosts::default()));
        let err = repo.update(PostPatch::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryCompilation);
        assert!(err.to_string().starts_with("cannot update post: "));
    }

    #[tokio::test]
    async fn update_returns_stored_row() {
        let repo = Repository::<Post>::new(Arc::new(MockPosts::default()));
        let created = repo.create(new_post("old")).await.unwrap();
        let updated = repo
            .update(PostPatch {
                id: Some(created.id),
                title: Some("new".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.body, created.body);
        assert_eq!(updated.user_id, created.user_id);
    }
}

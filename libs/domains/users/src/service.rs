use async_trait::async_trait;
use domain_items::{Book, ItemCatalogue, Magazine};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserProfile};
use crate::repository::UserRepository;

/// User operations consumed by the HTTP handlers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The user plus the items they own of every kind.
    async fn get(&self, id: Uuid) -> UserResult<UserProfile>;

    /// Fails with `NotFound` unless `id` names a stored user.
    async fn exists(&self, id: Uuid) -> UserResult<()>;

    async fn upsert(&self, user: User) -> UserResult<User>;
}

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    books: Arc<dyn ItemCatalogue<Book>>,
    magazines: Arc<dyn ItemCatalogue<Magazine>>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(
        repository: R,
        books: Arc<dyn ItemCatalogue<Book>>,
        magazines: Arc<dyn ItemCatalogue<Magazine>>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            books,
            magazines,
        }
    }
}

#[async_trait]
impl<R: UserRepository> UserDirectory for UserService<R> {
    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> UserResult<UserProfile> {
        if id.is_nil() {
            return Err(UserError::NotFound(id));
        }

        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let (books, magazines) = tokio::try_join!(
            self.books.list_by_owner(id),
            self.magazines.list_by_owner(id)
        )?;

        Ok(UserProfile {
            user,
            books,
            magazines,
        })
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> UserResult<()> {
        if !id.is_nil() && self.repository.exists_by_id(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound(id))
        }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn upsert(&self, mut user: User) -> UserResult<User> {
        let created = match self.exists(user.id).await {
            Ok(()) => false,
            Err(UserError::NotFound(_)) => true,
            Err(e) => return Err(e),
        };
        if created {
            user.id = Uuid::now_v7();
        }

        let saved = self.repository.save(user).await?;
        tracing::info!(user_id = %saved.id, created, "Upserted user");
        Ok(saved)
    }
}

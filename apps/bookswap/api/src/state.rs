//! Shared application state passed to all request handlers.

use database::postgres::DatabaseConnection;
use domain_items::{
    Book, InMemoryItemRepository, ItemCatalogue, ItemService, Magazine, PgItemRepository,
    PostingBackend, PostingError,
};
use domain_users::{InMemoryUserRepository, PgUserRepository, UserDirectory, UserService};
use std::sync::Arc;

use crate::config::Config;

/// Cloned per request; every field is a cheap `Arc` or pool handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` for in-memory storage
    pub db: Option<DatabaseConnection>,
    pub books: Arc<dyn ItemCatalogue<Book>>,
    pub magazines: Arc<dyn ItemCatalogue<Magazine>>,
    pub users: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Wires already-built services, e.g. test doubles.
    pub fn from_parts(
        config: Config,
        db: Option<DatabaseConnection>,
        books: Arc<dyn ItemCatalogue<Book>>,
        magazines: Arc<dyn ItemCatalogue<Magazine>>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            books,
            magazines,
            users,
        }
    }

    pub fn in_memory(config: Config) -> Result<Self, PostingError> {
        let posting = PostingBackend::from_config(&config.posting)?;

        let books: Arc<dyn ItemCatalogue<Book>> = Arc::new(ItemService::new(
            InMemoryItemRepository::<Book>::new(),
            posting.clone(),
        ));
        let magazines: Arc<dyn ItemCatalogue<Magazine>> =
            Arc::new(ItemService::new(InMemoryItemRepository::<Magazine>::new(), posting));
        let users = Arc::new(UserService::new(
            InMemoryUserRepository::new(),
            books.clone(),
            magazines.clone(),
        ));

        Ok(Self::from_parts(config, None, books, magazines, users))
    }

    pub fn postgres(config: Config, db: DatabaseConnection) -> Result<Self, PostingError> {
        let posting = PostingBackend::from_config(&config.posting)?;

        let books: Arc<dyn ItemCatalogue<Book>> = Arc::new(ItemService::new(
            PgItemRepository::<Book>::new(db.clone()),
            posting.clone(),
        ));
        let magazines: Arc<dyn ItemCatalogue<Magazine>> =
            Arc::new(ItemService::new(PgItemRepository::<Magazine>::new(db.clone()), posting));
        let users = Arc::new(UserService::new(
            PgUserRepository::new(db.clone()),
            books.clone(),
            magazines.clone(),
        ));

        Ok(Self::from_parts(config, Some(db), books, magazines, users))
    }
}

//! Items Domain
//!
//! Catalogue of swappable items. Books and magazines share one generic
//! implementation, parameterised by their [`ItemKind`] attribute bag.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  ItemCatalogue   │  ← port used by handlers and the users domain
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐     ┌────────────────┐
//! │   ItemService    │ ──▶ │ PostingService │  ← order notification
//! └────────┬─────────┘     └────────────────┘
//!          │
//! ┌────────▼─────────┐
//! │  ItemRepository  │  ← in-memory or PostgreSQL
//! └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{
//!     Book, Item, ItemCatalogue, ItemService, LoggingPostingService,
//!     repository::InMemoryItemRepository,
//! };
//!
//! # async fn example() -> Result<(), domain_items::ItemError> {
//! let books = ItemService::new(InMemoryItemRepository::<Book>::new(), LoggingPostingService);
//!
//! let dune = books
//!     .upsert(Item::new("Dune", Book { author: "Frank Herbert".into() }))
//!     .await?;
//! let swapped = books.swap(dune.id, uuid::Uuid::now_v7()).await?;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod posting;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use models::{Book, Item, ItemKind, ItemKindTag, ItemStatus, Magazine};
pub use postgres::PgItemRepository;
pub use posting::{
    HttpPostingService, LoggingPostingService, PostingBackend, PostingConfig, PostingError,
    PostingOrder, PostingService,
};
pub use repository::{InMemoryItemRepository, ItemRepository};
pub use service::{ItemCatalogue, ItemService};

#[cfg(any(test, feature = "testing"))]
pub use posting::MockPostingService;
#[cfg(any(test, feature = "testing"))]
pub use repository::MockItemRepository;
#[cfg(any(test, feature = "testing"))]
pub use service::MockItemCatalogue;

//! Users Domain
//!
//! Users own items; a [`UserProfile`] aggregates a user with the items of
//! every kind they currently hold, read through each kind's
//! [`domain_items::ItemCatalogue`].

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{ProfileSection, User, UserProfile};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::{UserDirectory, UserService};

#[cfg(any(test, feature = "testing"))]
pub use repository::MockUserRepository;
#[cfg(any(test, feature = "testing"))]
pub use service::MockUserDirectory;

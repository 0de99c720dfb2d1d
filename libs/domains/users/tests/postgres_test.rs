//! PostgreSQL integration tests. Run with `cargo test -- --ignored`.

use domain_items::{Book, Item, ItemCatalogue, ItemService, LoggingPostingService, Magazine, PgItemRepository};
use domain_users::{PgUserRepository, User, UserDirectory, UserError, UserService};
use std::sync::Arc;
use test_utils::TestDatabase;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_pg_user_profile() {
    let db = TestDatabase::new().await;

    let books = Arc::new(ItemService::new(
        PgItemRepository::<Book>::new(db.connection()),
        LoggingPostingService,
    ));
    let magazines = Arc::new(ItemService::new(
        PgItemRepository::<Magazine>::new(db.connection()),
        LoggingPostingService,
    ));
    let users = UserService::new(
        PgUserRepository::new(db.connection()),
        books.clone(),
        magazines.clone(),
    );

    let mut alice = users.upsert(User::new("Alice")).await.unwrap();
    users.exists(alice.id).await.unwrap();

    alice.country = "NZ".into();
    assert_eq!(users.upsert(alice.clone()).await.unwrap(), alice);

    let dune = books
        .upsert(Item::new("Dune", Book { author: "Frank Herbert".into() }).with_owner(alice.id))
        .await
        .unwrap();

    let profile = users.get(alice.id).await.unwrap();
    assert_eq!(profile.user, alice);
    assert_eq!(profile.books, vec![dune]);
    assert!(profile.magazines.is_empty());

    let err = users.get(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));
    let err = users.exists(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));
}

//! PostgreSQL integration tests. Run with `cargo test -- --ignored`.

use domain_items::{
    Book, Item, ItemCatalogue, ItemError, ItemRepository, ItemService, ItemStatus,
    LoggingPostingService, Magazine, PgItemRepository,
};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::assert_same_ids};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_pg_upsert_and_swap() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("test_pg_upsert_and_swap");
    let (u1, u2) = (data.nth_user_id(1), data.nth_user_id(2));

    let books = ItemService::new(PgItemRepository::<Book>::new(db.connection()), LoggingPostingService);

    let b1 = books
        .upsert(Item::new("Dune", Book { author: "Frank Herbert".into() }).with_owner(u1))
        .await
        .unwrap();
    assert_eq!(books.get(b1.id).await.unwrap(), b1);
    assert_eq!(books.list_by_owner(u1).await.unwrap(), vec![b1.clone()]);

    let swapped = books.swap(b1.id, u2).await.unwrap();
    assert_eq!(swapped.status, ItemStatus::Swapped);
    assert_eq!(swapped.owner_id, Some(u2));
    assert_eq!(swapped.attributes.author, "Frank Herbert");

    assert!(books.list().await.unwrap().is_empty());
    assert!(books.list_by_owner(u1).await.unwrap().is_empty());

    let emma = books
        .upsert(Item::new("Emma", Book { author: "Jane Austen".into() }).with_owner(u2))
        .await
        .unwrap();
    let owned = books.list_by_owner(u2).await.unwrap();
    assert_same_ids(owned.iter().map(|b| b.id), &[b1.id, emma.id], "books owned by u2");

    let err = books.swap(b1.id, u1).await.unwrap_err();
    assert!(matches!(err, ItemError::NotAvailable(_)));
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_pg_kinds_are_isolated() {
    let db = TestDatabase::new().await;
    let books = PgItemRepository::<Book>::new(db.connection());
    let magazines = PgItemRepository::<Magazine>::new(db.connection());

    let mut wired = Item::new("Wired", Magazine { issue_number: 12 });
    wired.id = Uuid::now_v7();
    magazines.save(wired.clone()).await.unwrap();

    assert_eq!(books.find_by_id(wired.id).await.unwrap(), None);
    assert!(books.list_by_status(ItemStatus::Available).await.unwrap().is_empty());
    assert_eq!(
        books.transfer_if_available(wired.id, Uuid::now_v7()).await.unwrap(),
        None
    );

    let stored = magazines.find_by_id(wired.id).await.unwrap().unwrap();
    assert_eq!(stored.attributes.issue_number, 12);
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_pg_concurrent_swaps_succeed_once() {
    let db = TestDatabase::new().await;
    let books = Arc::new(ItemService::new(
        PgItemRepository::<Book>::new(db.connection()),
        LoggingPostingService,
    ));

    let b1 = books.upsert(Item::new("Emma", Book::default())).await.unwrap();

    let attempts = (0..8).map(|_| {
        let books = books.clone();
        tokio::spawn(async move { books.swap(b1.id, Uuid::now_v7()).await })
    });
    let results = futures::future::join_all(attempts).await;

    let swapped = results
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(swapped, 1);
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn test_pg_stale_save_keeps_swap() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("test_pg_stale_save_keeps_swap");
    let (u1, u2) = (data.nth_user_id(1), data.nth_user_id(2));
    let repo = PgItemRepository::<Book>::new(db.connection());

    let mut original = Item::new("Dune", Book { author: "Frank Herbert".into() }).with_owner(u1);
    original.id = Uuid::now_v7();
    let original = repo.save(original).await.unwrap();
    repo.transfer_if_available(original.id, u2).await.unwrap().unwrap();

    let mut stale = original.clone();
    stale.name = "Dune Messiah".into();
    let saved = repo.save(stale).await.unwrap();

    assert_eq!(saved.name, "Dune Messiah");
    assert_eq!(saved.status, ItemStatus::Swapped);
    assert_eq!(saved.owner_id, Some(u2));
    assert_eq!(
        repo.transfer_if_available(original.id, u1).await.unwrap(),
        None
    );
}

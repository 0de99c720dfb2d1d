use async_trait::async_trait;
use observability::{SwapMetrics, SwapOutcome};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemKind, ItemStatus};
use crate::posting::{PostingOrder, PostingService};
use crate::repository::ItemRepository;

/// Catalogue operations for one item kind, as consumed by handlers and the
/// user profile aggregation.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ItemCatalogue<K: ItemKind>: Send + Sync {
    async fn get(&self, id: Uuid) -> ItemResult<Item<K>>;

    /// Creates the item when its id does not resolve, otherwise overwrites it.
    async fn upsert(&self, item: Item<K>) -> ItemResult<Item<K>>;

    /// Available items only.
    async fn list(&self) -> ItemResult<Vec<Item<K>>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> ItemResult<Vec<Item<K>>>;

    /// Hands an available item to `new_owner` and posts the transfer order.
    async fn swap(&self, id: Uuid, new_owner: Uuid) -> ItemResult<Item<K>>;
}

/// Service layer for item business logic
pub struct ItemService<K, R, P>
where
    K: ItemKind,
    R: ItemRepository<K>,
    P: PostingService<K>,
{
    repository: Arc<R>,
    posting: Arc<P>,
    _kind: PhantomData<fn() -> K>,
}

impl<K, R, P> ItemService<K, R, P>
where
    K: ItemKind,
    R: ItemRepository<K>,
    P: PostingService<K>,
{
    pub fn new(repository: R, posting: P) -> Self {
        Self {
            repository: Arc::new(repository),
            posting: Arc::new(posting),
            _kind: PhantomData,
        }
    }

    async fn try_swap(&self, id: Uuid, new_owner: Uuid) -> ItemResult<Item<K>> {
        if new_owner.is_nil() {
            return Err(ItemError::InvalidOwner(new_owner));
        }

        let item = self.get(id).await?;
        if !item.is_available() {
            return Err(ItemError::NotAvailable(id));
        }

        // Lost a race with a concurrent swap
        let swapped = self
            .repository
            .transfer_if_available(id, new_owner)
            .await?
            .ok_or(ItemError::NotAvailable(id))?;

        tracing::info!(item_id = %id, new_owner = %new_owner, "Item swapped");

        // The transfer is kept even if posting fails
        self.posting
            .new_order(PostingOrder::new(swapped.clone()))
            .await?;

        Ok(swapped)
    }
}

impl<K, R, P> Clone for ItemService<K, R, P>
where
    K: ItemKind,
    R: ItemRepository<K>,
    P: PostingService<K>,
{
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            posting: self.posting.clone(),
            _kind: PhantomData,
        }
    }
}

fn swap_outcome<K: ItemKind>(result: &ItemResult<Item<K>>) -> SwapOutcome {
    match result {
        Ok(_) => SwapOutcome::Swapped,
        Err(ItemError::NotFound(_)) => SwapOutcome::NotFound,
        Err(ItemError::NotAvailable(_)) => SwapOutcome::NotAvailable,
        Err(ItemError::Posting(_)) => SwapOutcome::PostingFailed,
        Err(_) => SwapOutcome::Error,
    }
}

#[async_trait]
impl<K, R, P> ItemCatalogue<K> for ItemService<K, R, P>
where
    K: ItemKind,
    R: ItemRepository<K>,
    P: PostingService<K>,
{
    #[instrument(skip(self), fields(kind = K::KIND.as_str()))]
    async fn get(&self, id: Uuid) -> ItemResult<Item<K>> {
        if id.is_nil() {
            return Err(ItemError::NotFound(id));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ItemError::NotFound(id))
    }

    #[instrument(skip(self, item), fields(kind = K::KIND.as_str(), item_id = %item.id))]
    async fn upsert(&self, item: Item<K>) -> ItemResult<Item<K>> {
        let mut item = item.normalized();

        let created = item.id.is_nil() || self.repository.find_by_id(item.id).await?.is_none();
        if created {
            item.id = Uuid::now_v7();
            item.status = ItemStatus::Available;
        }

        let saved = self.repository.save(item).await?;
        SwapMetrics::record_upsert(K::KIND.as_str(), created);

        tracing::info!(item_id = %saved.id, created, "Upserted item");
        Ok(saved)
    }

    #[instrument(skip(self), fields(kind = K::KIND.as_str()))]
    async fn list(&self) -> ItemResult<Vec<Item<K>>> {
        self.repository.list_by_status(ItemStatus::Available).await
    }

    #[instrument(skip(self), fields(kind = K::KIND.as_str()))]
    async fn list_by_owner(&self, owner_id: Uuid) -> ItemResult<Vec<Item<K>>> {
        if owner_id.is_nil() {
            return Ok(Vec::new());
        }

        self.repository.list_by_owner(owner_id).await
    }

    #[instrument(skip(self), fields(kind = K::KIND.as_str()))]
    async fn swap(&self, id: Uuid, new_owner: Uuid) -> ItemResult<Item<K>> {
        let started = Instant::now();
        let result = self.try_swap(id, new_owner).await;

        let outcome = swap_outcome(&result);
        SwapMetrics::record_swap(K::KIND.as_str(), outcome, started.elapsed());
        if let Err(e) = &result {
            tracing::warn!(item_id = %id, outcome = outcome.as_str(), error = %e, "Swap failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, Magazine};
    use crate::posting::{LoggingPostingService, MockPostingService, PostingError};
    use crate::repository::{InMemoryItemRepository, MockItemRepository};
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_utils::TestDataBuilder;

    type MemoryBookService<P> = ItemService<Book, InMemoryItemRepository<Book>, P>;

    fn memory_service<P: PostingService<Book>>(posting: P) -> MemoryBookService<P> {
        ItemService::new(InMemoryItemRepository::new(), posting)
    }

    fn no_posting() -> MockPostingService<Book> {
        let mut posting = MockPostingService::new();
        posting.expect_new_order().never();
        posting
    }

    fn dune() -> Item<Book> {
        Item::new("Dune", Book { author: "Frank Herbert".into() })
    }

    /// Counts orders and always succeeds.
    #[derive(Default)]
    struct CountingPosting {
        orders: AtomicUsize,
    }

    #[async_trait]
    impl PostingService<Book> for Arc<CountingPosting> {
        async fn new_order(&self, _order: PostingOrder<Book>) -> Result<(), PostingError> {
            self.orders.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_upsert_new_item_forces_available() {
        let service = memory_service(no_posting());

        let mut item = dune();
        item.status = ItemStatus::Swapped;
        let created = service.upsert(item).await.unwrap();

        assert!(!created.id.is_nil());
        assert_eq!(created.status, ItemStatus::Available);
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_mints_new_id() {
        let service = memory_service(no_posting());

        let mut item = dune();
        let requested = Uuid::now_v7();
        item.id = requested;
        let created = service.upsert(item).await.unwrap();

        assert_ne!(created.id, requested);
        assert_eq!(service.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_upsert_existing_is_idempotent() {
        let service = memory_service(no_posting());
        let created = service.upsert(dune()).await.unwrap();

        let again = service.upsert(created.clone()).await.unwrap();
        assert_eq!(again, created);

        let mut renamed = created.clone();
        renamed.name = "Dune Messiah".into();
        let updated = service.upsert(renamed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(service.get(created.id).await.unwrap().name, "Dune Messiah");
    }

    #[tokio::test]
    async fn test_upsert_keeps_stored_status() {
        let service = memory_service(LoggingPostingService);
        let created = service.upsert(dune()).await.unwrap();
        service.swap(created.id, Uuid::now_v7()).await.unwrap();

        // A stale copy cannot make the item available again
        let stale = service.upsert(created.clone()).await.unwrap();
        assert_eq!(stale.status, ItemStatus::Swapped);
        assert!(service.list().await.unwrap().is_empty());
    }

    /// Lets a swap land between the service's read and its write.
    struct SwapDuringSave {
        inner: InMemoryItemRepository<Book>,
        swapper: Uuid,
    }

    #[async_trait]
    impl ItemRepository<Book> for SwapDuringSave {
        async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item<Book>>> {
            self.inner.find_by_id(id).await
        }

        async fn save(&self, item: Item<Book>) -> ItemResult<Item<Book>> {
            self.inner.transfer_if_available(item.id, self.swapper).await?;
            self.inner.save(item).await
        }

        async fn list_by_status(&self, status: ItemStatus) -> ItemResult<Vec<Item<Book>>> {
            self.inner.list_by_status(status).await
        }

        async fn list_by_owner(&self, owner_id: Uuid) -> ItemResult<Vec<Item<Book>>> {
            self.inner.list_by_owner(owner_id).await
        }

        async fn transfer_if_available(
            &self,
            id: Uuid,
            new_owner: Uuid,
        ) -> ItemResult<Option<Item<Book>>> {
            self.inner.transfer_if_available(id, new_owner).await
        }
    }

    #[tokio::test]
    async fn test_upsert_racing_swap_keeps_swap() {
        let inner = InMemoryItemRepository::<Book>::new();
        let swapper = Uuid::now_v7();
        let original = ItemService::new(inner.clone(), no_posting())
            .upsert(dune())
            .await
            .unwrap();

        let counting = Arc::new(CountingPosting::default());
        let racing = ItemService::new(SwapDuringSave { inner, swapper }, counting.clone());

        let mut renamed = original.clone();
        renamed.name = "Dune Messiah".into();
        let saved = racing.upsert(renamed).await.unwrap();
        assert_eq!(saved.name, "Dune Messiah");
        assert_eq!(saved.status, ItemStatus::Swapped);
        assert_eq!(saved.owner_id, Some(swapper));

        let err = racing.swap(original.id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ItemError::NotAvailable(_)));
        assert_eq!(counting.orders.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upsert_normalizes_nil_owner() {
        let service = memory_service(no_posting());
        let created = service
            .upsert(dune().with_owner(Uuid::nil()))
            .await
            .unwrap();
        assert_eq!(created.owner_id, None);
    }

    #[tokio::test]
    async fn test_get_nil_id_is_not_found() {
        let mut repo = MockItemRepository::<Book>::new();
        repo.expect_find_by_id().never();
        let service = ItemService::new(repo, no_posting());

        let err = service.get(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, ItemError::NotFound(id) if id.is_nil()));
    }

    #[tokio::test]
    async fn test_list_excludes_swapped() {
        let service = memory_service(LoggingPostingService);
        let first = service.upsert(dune()).await.unwrap();
        let second = service
            .upsert(Item::new("Emma", Book { author: "Jane Austen".into() }))
            .await
            .unwrap();

        service.swap(first.id, Uuid::now_v7()).await.unwrap();

        let available = service.list().await.unwrap();
        assert_eq!(available, vec![second]);
        assert!(available.iter().all(|i| i.status != ItemStatus::Swapped));
    }

    #[tokio::test]
    async fn test_list_delegates_available_status() {
        let mut repo = MockItemRepository::<Magazine>::new();
        repo.expect_list_by_status()
            .with(eq(ItemStatus::Available))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let mut posting = MockPostingService::<Magazine>::new();
        posting.expect_new_order().never();

        let service = ItemService::new(repo, posting);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_nil_owner_is_empty() {
        let mut repo = MockItemRepository::<Book>::new();
        repo.expect_list_by_owner().never();
        let service = ItemService::new(repo, no_posting());

        assert!(service.list_by_owner(Uuid::nil()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_swap_transfers_and_posts_once() {
        let data = TestDataBuilder::from_test_name("test_swap_transfers_and_posts_once");
        let (u1, u2) = (data.nth_user_id(1), data.nth_user_id(2));

        let repo = InMemoryItemRepository::<Book>::new();
        let mut posting = MockPostingService::<Book>::new();
        posting
            .expect_new_order()
            .withf(move |order| {
                order.item.owner_id == Some(u2) && order.item.status == ItemStatus::Swapped
            })
            .times(1)
            .returning(|_| Ok(()));
        let service = ItemService::new(repo, posting);

        let b1 = service.upsert(dune().with_owner(u1)).await.unwrap();
        let swapped = service.swap(b1.id, u2).await.unwrap();

        assert_eq!(swapped.id, b1.id);
        assert_eq!(swapped.status, ItemStatus::Swapped);
        assert_eq!(swapped.owner_id, Some(u2));
        assert_eq!(service.get(b1.id).await.unwrap(), swapped);
    }

    #[tokio::test]
    async fn test_second_swap_is_not_available() {
        let counting = Arc::new(CountingPosting::default());
        let service = memory_service(counting.clone());

        let b1 = service.upsert(dune()).await.unwrap();
        service.swap(b1.id, Uuid::now_v7()).await.unwrap();

        let err = service.swap(b1.id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ItemError::NotAvailable(id) if id == b1.id));
        assert_eq!(counting.orders.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_swap_unknown_item_never_posts() {
        let service = memory_service(no_posting());

        let unknown = Uuid::now_v7();
        let err = service.swap(unknown, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ItemError::NotFound(id) if id == unknown));
    }

    #[tokio::test]
    async fn test_swap_to_nil_owner_is_rejected() {
        let mut repo = MockItemRepository::<Book>::new();
        repo.expect_find_by_id().never();
        repo.expect_transfer_if_available().never();
        let service = ItemService::new(repo, no_posting());

        let err = service.swap(Uuid::now_v7(), Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, ItemError::InvalidOwner(_)));
    }

    #[tokio::test]
    async fn test_swap_moves_item_between_owners() {
        let data = TestDataBuilder::from_test_name("test_swap_moves_item_between_owners");
        let (u1, u2) = (data.nth_user_id(1), data.nth_user_id(2));
        let service = memory_service(LoggingPostingService);

        let b1 = service.upsert(dune().with_owner(u1)).await.unwrap();
        assert_eq!(service.list_by_owner(u1).await.unwrap(), vec![b1.clone()]);

        let swapped = service.swap(b1.id, u2).await.unwrap();

        assert!(service.list_by_owner(u1).await.unwrap().is_empty());
        assert_eq!(service.list_by_owner(u2).await.unwrap(), vec![swapped]);
    }

    #[tokio::test]
    async fn test_posting_failure_keeps_swap() {
        let new_owner = Uuid::now_v7();
        let mut posting = MockPostingService::<Book>::new();
        posting
            .expect_new_order()
            .times(1)
            .returning(|_| Err(PostingError::Rejected { status: 500 }));
        let service = memory_service(posting);

        let b1 = service.upsert(dune()).await.unwrap();
        let err = service.swap(b1.id, new_owner).await.unwrap_err();
        assert!(matches!(err, ItemError::Posting(PostingError::Rejected { status: 500 })));

        let stored = service.get(b1.id).await.unwrap();
        assert_eq!(stored.status, ItemStatus::Swapped);
        assert_eq!(stored.owner_id, Some(new_owner));
    }

    #[tokio::test]
    async fn test_swap_lost_race_is_not_available() {
        let id = Uuid::now_v7();
        let mut stored = dune();
        stored.id = id;

        let mut repo = MockItemRepository::<Book>::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_transfer_if_available()
            .times(1)
            .returning(|_, _| Ok(None));
        let service = ItemService::new(repo, no_posting());

        let err = service.swap(id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ItemError::NotAvailable(_)));
    }

    #[tokio::test]
    async fn test_concurrent_swaps_succeed_once() {
        let counting = Arc::new(CountingPosting::default());
        let service = Arc::new(memory_service(counting.clone()));
        let b1 = service.upsert(dune()).await.unwrap();

        let attempts = (0..16).map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.swap(b1.id, Uuid::now_v7()).await })
        });
        let results = futures::future::join_all(attempts).await;

        let mut swapped = 0;
        for result in results {
            match result.unwrap() {
                Ok(_) => swapped += 1,
                Err(e) => assert!(matches!(e, ItemError::NotAvailable(_))),
            }
        }

        assert_eq!(swapped, 1);
        assert_eq!(counting.orders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_swap_outcome_mapping() {
        let id = Uuid::now_v7();
        assert_eq!(
            swap_outcome::<Book>(&Err(ItemError::NotFound(id))),
            SwapOutcome::NotFound
        );
        assert_eq!(
            swap_outcome::<Book>(&Err(ItemError::Posting(PostingError::Request("x".into())))),
            SwapOutcome::PostingFailed
        );
        assert_eq!(
            swap_outcome::<Book>(&Err(ItemError::Database("closed".into()))),
            SwapOutcome::Error
        );
    }
}

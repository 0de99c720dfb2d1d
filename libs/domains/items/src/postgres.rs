use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    entity,
    error::{ItemError, ItemResult},
    models::{Item, ItemKind, ItemStatus},
    repository::ItemRepository,
};

/// A swapped row keeps its owner when an existing item is re-saved.
const OWNER_UNLESS_SWAPPED: &str =
    "CASE WHEN items.status = 'available' THEN excluded.owner_id ELSE items.owner_id END";

/// Postgres repository for one item kind. All kinds share the `items` table
/// and every query is scoped to `K::KIND`.
pub struct PgItemRepository<K: ItemKind> {
    db: DatabaseConnection,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ItemKind> PgItemRepository<K> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _kind: PhantomData,
        }
    }

    fn find_kind() -> Select<entity::Entity> {
        entity::Entity::find().filter(entity::Column::Kind.eq(K::KIND))
    }

    async fn fetch_all(&self, query: Select<entity::Entity>) -> ItemResult<Vec<Item<K>>> {
        query
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(entity::Model::into_item)
            .collect()
    }
}

impl<K: ItemKind> Clone for PgItemRepository<K> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

#[async_trait]
impl<K: ItemKind> ItemRepository<K> for PgItemRepository<K> {
    async fn find_by_id(&self, id: Uuid) -> ItemResult<Option<Item<K>>> {
        Self::find_kind()
            .filter(entity::Column::Id.eq(id))
            .one(&self.db)
            .await?
            .map(entity::Model::into_item)
            .transpose()
    }

    async fn save(&self, item: Item<K>) -> ItemResult<Item<K>> {
        let active_model = entity::active_model(&item)?;

        entity::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(entity::Column::Id)
                    .update_columns([
                        entity::Column::Name,
                        entity::Column::Attributes,
                        entity::Column::UpdatedAt,
                    ])
                    .value(entity::Column::OwnerId, Expr::cust(OWNER_UNLESS_SWAPPED))
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        tracing::debug!(item_id = %item.id, kind = %K::KIND, "Saved item");
        self.find_by_id(item.id)
            .await?
            .ok_or_else(|| ItemError::Internal(format!("Item {} is not a {}", item.id, K::KIND)))
    }

    async fn list_by_status(&self, status: ItemStatus) -> ItemResult<Vec<Item<K>>> {
        self.fetch_all(Self::find_kind().filter(entity::Column::Status.eq(status)))
            .await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> ItemResult<Vec<Item<K>>> {
        self.fetch_all(Self::find_kind().filter(entity::Column::OwnerId.eq(owner_id)))
            .await
    }

    async fn transfer_if_available(
        &self,
        id: Uuid,
        new_owner: Uuid,
    ) -> ItemResult<Option<Item<K>>> {
        // Conditional update: only one concurrent caller can match the row
        let result = entity::Entity::update_many()
            .set(entity::ActiveModel {
                owner_id: Set(Some(new_owner)),
                status: Set(ItemStatus::Swapped),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Kind.eq(K::KIND))
            .filter(entity::Column::Status.eq(ItemStatus::Available))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::error::{ItemError, ItemResult};
use crate::models::{Item, ItemKind, ItemKindTag, ItemStatus};

/// Sea-ORM Entity for the `items` table shared by every kind
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: ItemKindTag,
    pub name: String,
    pub owner_id: Option<Uuid>,
    pub status: ItemStatus,
    /// Kind-specific fields (`author`, `issue_number`)
    #[sea_orm(column_type = "JsonBinary")]
    pub attributes: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_item<K: ItemKind>(self) -> ItemResult<Item<K>> {
        if self.kind != K::KIND {
            return Err(ItemError::Internal(format!(
                "Item {} is a {}, not a {}",
                self.id, self.kind, K::KIND
            )));
        }

        let attributes: K = serde_json::from_value(self.attributes).map_err(|e| {
            ItemError::Internal(format!("Corrupt attributes for item {}: {}", self.id, e))
        })?;

        Ok(Item {
            id: self.id,
            name: self.name,
            owner_id: self.owner_id,
            status: self.status,
            attributes,
        })
    }
}

/// Full row for insert-or-overwrite; timestamps are maintained by the database.
pub fn active_model<K: ItemKind>(item: &Item<K>) -> ItemResult<ActiveModel> {
    let attributes = serde_json::to_value(&item.attributes)
        .map_err(|e| ItemError::Internal(format!("Failed to serialize attributes: {}", e)))?;
    let now = Utc::now();

    Ok(ActiveModel {
        id: Set(item.id),
        kind: Set(K::KIND),
        name: Set(item.name.clone()),
        owner_id: Set(item.owner_id),
        status: Set(item.status),
        attributes: Set(attributes),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    })
}

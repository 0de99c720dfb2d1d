use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Swap eligibility of an item. `Swapped` is terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "swapped")]
    Swapped,
}

/// Discriminator of the item kinds sharing the catalogue storage.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemKindTag {
    #[sea_orm(string_value = "book")]
    Book,
    #[sea_orm(string_value = "magazine")]
    Magazine,
}

impl ItemKindTag {
    /// Label used in metrics and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKindTag::Book => "book",
            ItemKindTag::Magazine => "magazine",
        }
    }
}

/// Kind-specific attributes of an item. One implementation per kind; the
/// repositories and the service are generic over it.
pub trait ItemKind:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    const KIND: ItemKindTag;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    #[serde(default)]
    pub author: String,
}

impl ItemKind for Book {
    const KIND: ItemKindTag = ItemKindTag::Book;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Magazine {
    #[serde(default)]
    pub issue_number: i32,
}

impl ItemKind for Magazine {
    const KIND: ItemKindTag = ItemKindTag::Magazine;
}

/// A swappable catalogue entry.
///
/// The nil UUID is the "no id yet" value: it never resolves to a stored item,
/// so upserting an item with a nil id always creates a new one.
///
/// ```json
/// { "id": "0199...", "name": "Dune", "owner_id": null, "status": "AVAILABLE", "author": "Frank Herbert" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "K: ItemKind")]
pub struct Item<K: ItemKind> {
    #[serde(default)]
    pub id: Uuid,
    pub name: String,
    /// `None` for items in the unowned library pool
    #[serde(default)]
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(flatten)]
    pub attributes: K,
}

impl<K: ItemKind> Item<K> {
    /// A new, unowned, available item without an id.
    pub fn new(name: impl Into<String>, attributes: K) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            owner_id: None,
            status: ItemStatus::Available,
            attributes,
        }
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn kind(&self) -> ItemKindTag {
        K::KIND
    }

    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available
    }

    /// Maps a nil owner to `None`.
    pub(crate) fn normalized(mut self) -> Self {
        if self.owner_id.is_some_and(|owner| owner.is_nil()) {
            self.owner_id = None;
        }
        self
    }
}

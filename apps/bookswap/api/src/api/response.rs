use domain_items::{Book, Item, ItemKind};
use domain_users::User;
use serde::Serialize;

/// Success body shared by every BookSwap endpoint.
///
/// ```json
/// { "user": { "id": "0199...", "name": "Alice", ... }, "items": [ { "id": "0199...", "name": "Dune", ... } ] }
/// ```
#[derive(Debug, Serialize)]
#[serde(bound = "K: ItemKind")]
pub struct Envelope<K: ItemKind = Book> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item<K>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl<K: ItemKind> Envelope<K> {
    pub fn items(items: Vec<Item<K>>) -> Self {
        Self {
            message: None,
            items: Some(items),
            user: None,
        }
    }

    /// A user with their owned items of kind `K`.
    pub fn profile(user: User, items: Vec<Item<K>>) -> Self {
        Self {
            message: None,
            items: Some(items),
            user: Some(user),
        }
    }

    pub fn user(user: User) -> Self {
        Self {
            message: None,
            items: None,
            user: Some(user),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

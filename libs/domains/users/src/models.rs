use domain_items::{Book, Item, ItemKind, Magazine};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A participant who owns and receives items.
///
/// As with items, a nil id means "not stored yet".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct User {
    #[serde(default)]
    pub id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub post_code: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub country: String,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            address: String::new(),
            post_code: String::new(),
            country: String::new(),
        }
    }
}

/// A user together with everything they currently own, per kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub books: Vec<Item<Book>>,
    pub magazines: Vec<Item<Magazine>>,
}

/// Selects one kind's owned items out of a [`UserProfile`].
pub trait ProfileSection: ItemKind + Sized {
    fn section(profile: &UserProfile) -> &[Item<Self>];

    fn into_section(profile: UserProfile) -> (User, Vec<Item<Self>>);
}

impl ProfileSection for Book {
    fn section(profile: &UserProfile) -> &[Item<Self>] {
        &profile.books
    }

    fn into_section(profile: UserProfile) -> (User, Vec<Item<Self>>) {
        (profile.user, profile.books)
    }
}

impl ProfileSection for Magazine {
    fn section(profile: &UserProfile) -> &[Item<Self>] {
        &profile.magazines
    }

    fn into_section(profile: UserProfile) -> (User, Vec<Item<Self>>) {
        (profile.user, profile.magazines)
    }
}

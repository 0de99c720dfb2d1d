use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::User;

/// Sea-ORM Entity for the `users` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub post_code: String,
    pub country: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            post_code: model.post_code,
            country: model.country,
        }
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        let now = Utc::now();
        Self {
            id: Set(user.id),
            name: Set(user.name.clone()),
            address: Set(user.address.clone()),
            post_code: Set(user.post_code.clone()),
            country: Set(user.country.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::{entity, error::UserResult, models::User, repository::UserRepository};

#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, user: User) -> UserResult<User> {
        let active_model = entity::ActiveModel::from(&user);

        entity::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(entity::Column::Id)
                    .update_columns([
                        entity::Column::Name,
                        entity::Column::Address,
                        entity::Column::PostCode,
                        entity::Column::Country,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        tracing::debug!(user_id = %user.id, "Saved user");
        Ok(user)
    }

    async fn exists_by_id(&self, id: Uuid) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

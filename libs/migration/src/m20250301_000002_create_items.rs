use sea_orm_migration::{prelude::*, schema::*};

/// Books and magazines share one table, discriminated by `kind`, with the
/// kind-specific attributes (author, issue number) in `attributes`.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(pk_uuid(Items::Id))
                    .col(string_len(Items::Kind, 16))
                    .col(string(Items::Name))
                    .col(uuid_null(Items::OwnerId))
                    .col(
                        string_len(Items::Status, 16)
                            .default("available")
                            .check(Expr::col(Items::Status).is_in(["available", "swapped"])),
                    )
                    .col(json_binary(Items::Attributes).default("{}"))
                    .col(
                        timestamp_with_time_zone(Items::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Items::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // list(): WHERE kind = $1 AND status = 'available'
        manager
            .create_index(
                Index::create()
                    .name("idx_items_kind_status")
                    .table(Items::Table)
                    .col(Items::Kind)
                    .col(Items::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_items_owner_id")
                    .table(Items::Table)
                    .col(Items::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER items_touch_updated_at
                    BEFORE UPDATE ON items
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Kind,
    Name,
    OwnerId,
    Status,
    Attributes,
    CreatedAt,
    UpdatedAt,
}

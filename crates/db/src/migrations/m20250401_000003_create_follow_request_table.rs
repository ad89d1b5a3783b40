//! Create follow request table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowRequest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::Requester)
                            .string_len(390)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::Target)
                            .string_len(390)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::WantsReblogs)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::WantsNotifications)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FollowRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (requester, target) - at most one outstanding
        // request per ordered pair
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_requester_target")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::Requester)
                    .col(FollowRequest::Target)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: target (for listing received requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_target")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::Target)
                    .to_owned(),
            )
            .await?;

        // Index: requester (for listing sent requests)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_request_requester")
                    .table(FollowRequest::Table)
                    .col(FollowRequest::Requester)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowRequest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowRequest {
    Table,
    Id,
    Requester,
    Target,
    WantsReblogs,
    WantsNotifications,
    CreatedAt,
}

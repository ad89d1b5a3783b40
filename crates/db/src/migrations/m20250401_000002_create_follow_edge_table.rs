//! Create follow edge table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FollowEdge::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FollowEdge::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FollowEdge::Requester)
                            .string_len(390)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowEdge::Target)
                            .string_len(390)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowEdge::Reblogs)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FollowEdge::Notifications)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FollowEdge::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (requester, target) - the arbiter for concurrent
        // duplicate follows
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edge_requester_target")
                    .table(FollowEdge::Table)
                    .col(FollowEdge::Requester)
                    .col(FollowEdge::Target)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: target (for listing followers)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edge_target")
                    .table(FollowEdge::Table)
                    .col(FollowEdge::Target)
                    .to_owned(),
            )
            .await?;

        // Index: requester (for listing following)
        manager
            .create_index(
                Index::create()
                    .name("idx_follow_edge_requester")
                    .table(FollowEdge::Table)
                    .col(FollowEdge::Requester)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowEdge::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FollowEdge {
    Table,
    Id,
    Requester,
    Target,
    Reblogs,
    Notifications,
    CreatedAt,
}

//! Create block table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Block::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Block::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Block::Blocker).string_len(390).not_null())
                    .col(ColumnDef::new(Block::Blocked).string_len(390).not_null())
                    .col(
                        ColumnDef::new(Block::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (blocker, blocked) - prevent duplicate blocks
        manager
            .create_index(
                Index::create()
                    .name("idx_block_blocker_blocked")
                    .table(Block::Table)
                    .col(Block::Blocker)
                    .col(Block::Blocked)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: blocker (for the either-direction guard query)
        manager
            .create_index(
                Index::create()
                    .name("idx_block_blocker")
                    .table(Block::Table)
                    .col(Block::Blocker)
                    .to_owned(),
            )
            .await?;

        // Index: blocked (for the either-direction guard query)
        manager
            .create_index(
                Index::create()
                    .name("idx_block_blocked")
                    .table(Block::Table)
                    .col(Block::Blocked)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Block::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Block {
    Table,
    Id,
    Blocker,
    Blocked,
    CreatedAt,
}

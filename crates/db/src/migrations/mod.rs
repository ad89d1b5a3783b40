//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250401_000001_create_member_table;
mod m20250401_000002_create_follow_edge_table;
mod m20250401_000003_create_follow_request_table;
mod m20250401_000004_create_block_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_member_table::Migration),
            Box::new(m20250401_000002_create_follow_edge_table::Migration),
            Box::new(m20250401_000003_create_follow_request_table::Migration),
            Box::new(m20250401_000004_create_block_table::Migration),
        ]
    }
}

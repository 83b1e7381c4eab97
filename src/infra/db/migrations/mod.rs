//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250102_000001_create_courses_table;
mod m20250103_000001_create_requests_table;
mod m20250104_000001_create_enrollments_table;
mod m20250105_000001_create_payments_table;
mod m20250106_000001_create_sessions_table;
mod m20250107_000001_create_reviews_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250102_000001_create_courses_table::Migration),
            Box::new(m20250103_000001_create_requests_table::Migration),
            Box::new(m20250104_000001_create_enrollments_table::Migration),
            Box::new(m20250105_000001_create_payments_table::Migration),
            Box::new(m20250106_000001_create_sessions_table::Migration),
            Box::new(m20250107_000001_create_reviews_table::Migration),
        ]
    }
}

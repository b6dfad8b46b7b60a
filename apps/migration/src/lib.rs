//! Schema migrations for the Gazette content store.

pub use sea_orm_migration::prelude::*;

mod m20250310_000001_create_users;
mod m20250310_000002_create_categories;
mod m20250310_000003_create_tags;
mod m20250310_000004_create_posts;
mod m20250310_000005_create_post_tags;
mod m20250310_000006_create_post_images;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_users::Migration),
            Box::new(m20250310_000002_create_categories::Migration),
            Box::new(m20250310_000003_create_tags::Migration),
            Box::new(m20250310_000004_create_posts::Migration),
            Box::new(m20250310_000005_create_post_tags::Migration),
            Box::new(m20250310_000006_create_post_images::Migration),
        ]
    }
}

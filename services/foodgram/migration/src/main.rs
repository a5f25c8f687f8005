use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_auth_tokens;
mod m20260801_000003_create_ingredients;
mod m20260801_000004_create_tags;
mod m20260801_000005_create_recipes;
mod m20260801_000006_create_recipe_ingredients;
mod m20260801_000007_create_recipe_tags;
mod m20260801_000008_create_subscriptions;
mod m20260801_000009_create_favorites;
mod m20260801_000010_create_cart_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_auth_tokens::Migration),
            Box::new(m20260801_000003_create_ingredients::Migration),
            Box::new(m20260801_000004_create_tags::Migration),
            Box::new(m20260801_000005_create_recipes::Migration),
            Box::new(m20260801_000006_create_recipe_ingredients::Migration),
            Box::new(m20260801_000007_create_recipe_tags::Migration),
            Box::new(m20260801_000008_create_subscriptions::Migration),
            Box::new(m20260801_000009_create_favorites::Migration),
            Box::new(m20260801_000010_create_cart_items::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}

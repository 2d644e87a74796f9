//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation is idempotent and runs on
//! every start.

use crate::entities::{CostAnalysis, MarketPrice, Product, RawMaterial, Recipe, recipe};
use crate::errors::Result;
use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

/// Default `SQLite` location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/costing_buddy.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {database_url}");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet, plus the recipe uniqueness index.
///
/// Parents are created before the tables that reference them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, RawMaterial).await?;
    create_table(db, Product).await?;
    create_table(db, Recipe).await?;
    create_table(db, CostAnalysis).await?;
    create_table(db, MarketPrice).await?;

    let builder = db.get_database_backend();
    db.execute(builder.build(&recipe_pair_index())).await?;

    info!("Database tables ensured");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// One recipe line per (product, material) pair.
fn recipe_pair_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_recipes_product_material")
        .table(Recipe)
        .col(recipe::Column::ProductId)
        .col(recipe::Column::MaterialId)
        .unique()
        .if_not_exists()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        CostAnalysisModel, MarketPriceModel, ProductModel, RawMaterialModel, RecipeModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<RawMaterialModel> = RawMaterial::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<RecipeModel> = Recipe::find().limit(1).all(&db).await?;
        let _: Vec<CostAnalysisModel> = CostAnalysis::find().limit(1).all(&db).await?;
        let _: Vec<MarketPriceModel> = MarketPrice::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}

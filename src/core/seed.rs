//! Populates a database from the starter catalog.
//!
//! Seeding is additive and safe to repeat: materials and products that already
//! exist (by name) are left untouched, so operator edits survive restarts.

use crate::{
    config::{
        ConversionFactors,
        catalog::{Catalog, ProductSeed, RecipeSeed},
    },
    core::{
        material::{self, NewMaterial},
        product::{self, NewProduct},
        recipe::{self, RecipeQuantity},
    },
    entities::{product as product_entity, raw_material},
    errors::Result,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Counts reported after seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub materials_created: usize,
    pub products_created: usize,
    pub products_skipped: usize,
    pub recipe_lines_created: usize,
    pub recipe_lines_skipped: usize,
}

/// Seeds materials, then products with their formulations.
///
/// # Errors
/// Returns an error if a database operation fails or a catalog material, product or
/// recipe line fails validation. The failing product is rolled back with its recipe.
/// Recipe items naming unknown materials are skipped with a warning.
#[instrument(skip_all, fields(materials = catalog.materials.len(), products = catalog.products.len()))]
pub async fn seed_catalog(
    db: &DatabaseConnection,
    catalog: &Catalog,
    factors: &ConversionFactors,
) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for seed in &catalog.materials {
        if material::get_material_by_name(db, &seed.name).await?.is_some() {
            debug!("Material '{}' already exists. Skipping.", seed.name);
            continue;
        }
        material::create_material(
            db,
            NewMaterial {
                name: seed.name.clone(),
                unit: seed.unit,
                current_price: seed.current_price,
                stock_quantity: seed.stock_quantity,
                minimum_stock: seed.minimum_stock,
                supplier: seed.supplier.clone(),
            },
        )
        .await?;
        summary.materials_created += 1;
    }

    let materials: HashMap<String, raw_material::Model> = material::get_all_materials(db)
        .await?
        .into_iter()
        .map(|m| (m.name.clone(), m))
        .collect();

    for seed in &catalog.products {
        if product::get_product_by_name(db, &seed.name).await?.is_some() {
            debug!("Product '{}' already exists. Skipping.", seed.name);
            summary.products_skipped += 1;
            continue;
        }
        // A product is stored together with its whole formulation or not at all
        let txn = db.begin().await?;
        let created = product::create_product(&txn, new_product(seed)).await?;
        let mut lines_created = 0;

        for item in &seed.recipe {
            let Some(material) = materials.get(&item.material) else {
                warn!(
                    "Material '{}' not found for product '{}'. Skipping recipe line.",
                    item.material, created.name
                );
                summary.recipe_lines_skipped += 1;
                continue;
            };
            let Some(quantity) = seed_quantity(item, &created, material, factors) else {
                warn!(
                    "Recipe line for '{}' in '{}' has neither percentage nor quantity. Skipping.",
                    item.material, created.name
                );
                summary.recipe_lines_skipped += 1;
                continue;
            };
            recipe::upsert_recipe_line(&txn, created.id, material.id, quantity, item.notes.clone())
                .await?;
            lines_created += 1;
        }

        txn.commit().await?;
        summary.products_created += 1;
        summary.recipe_lines_created += lines_created;
    }

    info!(
        "Seeding finished: {} materials, {} products ({} skipped), {} recipe lines ({} skipped)",
        summary.materials_created,
        summary.products_created,
        summary.products_skipped,
        summary.recipe_lines_created,
        summary.recipe_lines_skipped
    );
    Ok(summary)
}

fn new_product(seed: &ProductSeed) -> NewProduct {
    NewProduct {
        name: seed.name.clone(),
        category: seed.category.clone(),
        form: seed.form,
        batch_size: seed.batch_size,
        labor_cost_per_batch: seed.labor_cost_per_batch,
        overhead_percentage: seed.overhead_percentage,
        packaging_cost: seed.packaging_cost,
        profit_margin_percentage: seed.profit_margin_percentage,
    }
}

fn seed_quantity(
    item: &RecipeSeed,
    product: &product_entity::Model,
    material: &raw_material::Model,
    factors: &ConversionFactors,
) -> Option<RecipeQuantity> {
    match (item.percentage, item.quantity) {
        (Some(percentage), _) => Some(RecipeQuantity::from_percentage(
            product,
            material.unit,
            percentage,
            factors,
        )),
        (None, Some(quantity)) => Some(RecipeQuantity::Absolute { quantity }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::recipe::load_recipe_lines;
    use crate::entities::ProductForm;
    use crate::test_utils::*;

    const CATALOG: &str = r#"
        [[materials]]
        name = "LAS"
        unit = "kg"
        current_price = 180.0
        stock_quantity = 100.0
        minimum_stock = 20.0

        [[materials]]
        name = "Lavender Fragrance"
        unit = "ml"
        current_price = 2.0

        [[products]]
        name = "Omo Advanced Powder"
        category = "Laundry Powder"
        batch_size = 1000.0
        labor_cost_per_batch = 500.0
        overhead_percentage = 18.0
        packaging_cost = 150.0
        profit_margin_percentage = 30.0
        recipe = [
            { material = "LAS", percentage = 12.0, notes = "Primary surfactant" },
            { material = "Lavender Fragrance", quantity = 5.0 },
            { material = "Unobtainium", percentage = 1.0 },
            { material = "LAS" },
        ]

        [[products]]
        name = "Omo Liquid Detergent"
        category = "Liquid Detergent"
        batch_size = 1000.0
        recipe = [{ material = "LAS", percentage = 15.0 }]
    "#;

    #[tokio::test]
    async fn test_seed_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog: Catalog = toml::from_str(CATALOG).unwrap();
        let factors = ConversionFactors::default();

        let summary = seed_catalog(&db, &catalog, &factors).await?;
        assert_eq!(
            summary,
            SeedSummary {
                materials_created: 2,
                products_created: 2,
                products_skipped: 0,
                recipe_lines_created: 3,
                recipe_lines_skipped: 2,
            }
        );

        let powder = product::get_product_by_name(&db, "Omo Advanced Powder").await?.unwrap();
        assert_eq!(powder.form, ProductForm::Solid);
        let lines = load_recipe_lines(&db, powder.id).await?;
        assert_eq!(lines.len(), 2);
        assert_close(lines[0].recipe.quantity_per_batch, 2.4);
        assert_eq!(lines[0].recipe.percentage_value, Some(12.0));
        assert_eq!(lines[0].recipe.notes.as_deref(), Some("Primary surfactant"));
        assert!(!lines[1].recipe.is_percentage_based);
        assert_eq!(lines[1].recipe.quantity_per_batch, 5.0);

        let liquid = product::get_product_by_name(&db, "Omo Liquid Detergent").await?.unwrap();
        assert_eq!(liquid.form, ProductForm::Liquid);
        assert_eq!(liquid.overhead_percentage, 15.0);
        let lines = load_recipe_lines(&db, liquid.id).await?;
        assert_close(lines[0].recipe.quantity_per_batch, 150.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_catalog_twice_is_a_no_op() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog: Catalog = toml::from_str(CATALOG).unwrap();
        let factors = ConversionFactors::default();

        seed_catalog(&db, &catalog, &factors).await?;
        let again = seed_catalog(&db, &catalog, &factors).await?;
        assert_eq!(again.materials_created, 0);
        assert_eq!(again.products_created, 0);
        assert_eq!(again.products_skipped, 2);
        assert_eq!(again.recipe_lines_created, 0);
        assert_eq!(material::get_all_materials(&db).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_recipe_line_rolls_back_its_product() -> Result<()> {
        const BROKEN: &str = r#"
            [[materials]]
            name = "LAS"
            unit = "kg"
            current_price = 180.0

            [[products]]
            name = "Omo Advanced Powder"
            category = "Laundry Powder"
            batch_size = 1000.0
            recipe = [
                { material = "LAS", percentage = 12.0 },
                { material = "LAS", percentage = 150.0 },
            ]
        "#;
        let db = setup_test_db().await?;
        let factors = ConversionFactors::default();

        let broken: Catalog = toml::from_str(BROKEN).unwrap();
        let err = seed_catalog(&db, &broken, &factors).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert!(product::get_product_by_name(&db, "Omo Advanced Powder").await?.is_none());
        // Materials are seeded before products and stay
        assert!(material::get_material_by_name(&db, "LAS").await?.is_some());

        // The corrected catalog seeds the product on the next run
        let fixed: Catalog = toml::from_str(&BROKEN.replace("150.0", "3.0")).unwrap();
        let summary = seed_catalog(&db, &fixed, &factors).await?;
        assert_eq!(summary.products_created, 1);
        assert_eq!(summary.recipe_lines_created, 2);
        let powder = product::get_product_by_name(&db, "Omo Advanced Powder").await?.unwrap();
        let lines = load_recipe_lines(&db, powder.id).await?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].recipe.percentage_value, Some(3.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_bundled_catalog_seeds_cleanly() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog: Catalog = toml::from_str(include_str!("../../catalog.toml")).unwrap();

        let summary = seed_catalog(&db, &catalog, &ConversionFactors::default()).await?;
        assert_eq!(summary.products_created, catalog.products.len());
        assert_eq!(summary.recipe_lines_skipped, 0);

        let soap = product::get_product_by_name(&db, "Sunlight Bar Soap").await?.unwrap();
        let lines = load_recipe_lines(&db, soap.id).await?;
        // 45% of 2000 bars at 20 g each
        assert_close(lines[0].recipe.quantity_per_batch, 18.0);
        Ok(())
    }
}

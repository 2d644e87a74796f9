//! Stock availability for a planned production run.
//!
//! Every recipe line is scaled linearly by `k = B / B0` from its stored
//! `quantity_per_batch`, whether or not the line is percentage-based. This differs
//! from the cost engine for percentage lines whose stored amount disagrees with the
//! percentage estimate at `B`, so the checker's required amounts need not match the
//! costed quantities.

use crate::{
    core::{cost::resolve_batch_size, product, recipe::RecipeLine},
    entities::{UnitOfMeasure, product as product_entity},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, instrument};

/// A material without enough stock for the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingMaterial {
    pub material_id: i64,
    pub material: String,
    pub unit: UnitOfMeasure,
    pub required: f64,
    pub available: f64,
    /// `required - available`, always positive
    pub shortage: f64,
}

/// A material that covers the run but sits at or below its reorder threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockMaterial {
    pub material_id: i64,
    pub material: String,
    pub unit: UnitOfMeasure,
    pub current: f64,
    pub minimum: f64,
}

/// Result of a stock check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockAvailability {
    /// True iff no material is missing
    pub can_produce: bool,
    pub missing_materials: Vec<MissingMaterial>,
    pub low_stock_materials: Vec<LowStockMaterial>,
}

/// Checks already-loaded recipe lines against current stock.
///
/// A material lands in at most one of the two lists: missing wins over low stock.
///
/// # Errors
/// Returns `InvalidBatchSize` for a non-positive or non-finite batch size.
pub fn check_stock(
    product: &product_entity::Model,
    lines: &[RecipeLine],
    batch_size: Option<f64>,
) -> Result<StockAvailability> {
    let batch_size = resolve_batch_size(product, batch_size)?;
    let scale_factor = batch_size / product.batch_size;

    let mut availability = StockAvailability::default();
    for line in lines {
        let material = &line.material;
        let required = line.recipe.quantity_per_batch * scale_factor;

        if material.stock_quantity < required {
            availability.missing_materials.push(MissingMaterial {
                material_id: material.id,
                material: material.name.clone(),
                unit: material.unit,
                required,
                available: material.stock_quantity,
                shortage: required - material.stock_quantity,
            });
        } else if material.is_low_stock() {
            availability.low_stock_materials.push(LowStockMaterial {
                material_id: material.id,
                material: material.name.clone(),
                unit: material.unit,
                current: material.stock_quantity,
                minimum: material.minimum_stock,
            });
        }
    }
    availability.can_produce = availability.missing_materials.is_empty();
    Ok(availability)
}

/// Loads a product's recipe and checks it against current stock.
///
/// # Errors
/// Returns `ProductNotFound` for an unknown product and the errors of [`check_stock`].
#[instrument(skip(db))]
pub async fn check_stock_availability(
    db: &DatabaseConnection,
    product_id: i64,
    batch_size: Option<f64>,
) -> Result<StockAvailability> {
    let product = product::require_product(db, product_id).await?;
    resolve_batch_size(&product, batch_size)?;

    let lines = crate::core::recipe::load_recipe_lines(db, product_id).await?;
    let availability = check_stock(&product, &lines, batch_size)?;
    debug!(
        "Stock check for '{}': can_produce={}, {} missing, {} low",
        product.name,
        availability.can_produce,
        availability.missing_materials.len(),
        availability.low_stock_materials.len()
    );
    Ok(availability)
}

//! Batch cost calculation.
//!
//! Turns a product, its recipe lines and an optional target batch size into a full
//! cost breakdown and a recommended price. The computation itself is a pure function
//! over already-loaded models ([`calculate_batch_cost`]); [`calculate_product_cost`]
//! only adds the database reads. Nothing here writes: persisting a snapshot of the
//! result is up to the caller (see [`crate::core::analysis`]).
//!
//! Recipe lines resolve their quantity at the target batch size under one of two
//! policies, picked by the line's percentage flag:
//!
//! - absolute lines scale the stored per-standard-batch amount by `k = B / B0`;
//! - percentage lines re-apply their percentage to an estimated batch base computed
//!   from `B` and the material's unit (see [`estimated_batch_base`]), so they do not
//!   follow `k` when the estimate disagrees with the stored amount.
//!
//! The stock checker in [`crate::core::stock`] always uses the first policy.

use crate::{
    config::ConversionFactors,
    core::{product, recipe::RecipeLine},
    entities::{ProductForm, UnitOfMeasure, product as product_entity, recipe as recipe_entity},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, instrument};

/// Cost of one ingredient at the target batch size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialLine {
    pub material_id: i64,
    /// Material name
    pub material: String,
    /// Resolved quantity at the target batch size
    pub quantity: f64,
    /// Stored quantity for one standard batch
    pub original_quantity: f64,
    pub is_percentage: bool,
    pub percentage_value: Option<f64>,
    pub unit: UnitOfMeasure,
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub total_cost: f64,
    pub notes: Option<String>,
}

/// Full cost breakdown for one product at one batch size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub product_id: i64,
    pub product_name: String,
    /// Batch size the numbers apply to
    pub batch_size: f64,
    /// `batch_size / standard batch size`
    pub scale_factor: f64,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub packaging_cost: f64,
    pub total_cost: f64,
    pub recommended_price: f64,
    pub cost_per_unit: f64,
    pub price_per_unit: f64,
    pub material_details: Vec<MaterialLine>,
}

/// Picks the batch size to cost and rejects values that cannot be divided by.
///
/// `None` means the product's standard batch size.
///
/// # Errors
/// Returns `InvalidBatchSize` for zero, negative or non-finite sizes, including a
/// corrupt standard batch size on the product itself.
pub fn resolve_batch_size(product: &product_entity::Model, requested: Option<f64>) -> Result<f64> {
    if !product.batch_size.is_finite() || product.batch_size <= 0.0 {
        return Err(Error::InvalidBatchSize {
            batch_size: product.batch_size,
        });
    }
    let batch_size = requested.unwrap_or(product.batch_size);
    if !batch_size.is_finite() || batch_size <= 0.0 {
        return Err(Error::InvalidBatchSize { batch_size });
    }
    Ok(batch_size)
}

/// Linear scaling of a stored per-standard-batch amount.
#[must_use]
pub fn resolve_absolute_quantity(quantity_per_batch: f64, scale_factor: f64) -> f64 {
    quantity_per_batch * scale_factor
}

/// Heuristic total mass, volume or count of a batch, in the material's unit.
///
/// `kg` uses the product form's per-unit weight (1.0 liquid, 0.02 solid by default),
/// `L` treats every finished unit as one milliliter, `ml` and `pieces` use the batch
/// size unchanged.
#[must_use]
pub const fn estimated_batch_base(
    unit: UnitOfMeasure,
    form: ProductForm,
    batch_size: f64,
    factors: &ConversionFactors,
) -> f64 {
    batch_size * factors.factor_for(unit, form)
}

/// Absolute quantity for a percentage of the estimated batch base.
#[must_use]
pub fn resolve_percentage_quantity(
    percentage: f64,
    unit: UnitOfMeasure,
    form: ProductForm,
    batch_size: f64,
    factors: &ConversionFactors,
) -> f64 {
    (percentage / 100.0) * estimated_batch_base(unit, form, batch_size, factors)
}

/// Resolves one recipe line to an absolute quantity at `batch_size`.
///
/// # Errors
/// Returns `InvalidInput` when a line is flagged as percentage-based but has no percentage.
pub fn resolve_line_quantity(
    line: &RecipeLine,
    form: ProductForm,
    batch_size: f64,
    scale_factor: f64,
    factors: &ConversionFactors,
) -> Result<f64> {
    let recipe = &line.recipe;
    if !recipe.is_percentage_based {
        return Ok(resolve_absolute_quantity(
            recipe.quantity_per_batch,
            scale_factor,
        ));
    }
    let percentage = required_percentage(recipe, &line.material.name)?;
    Ok(resolve_percentage_quantity(
        percentage,
        line.material.unit,
        form,
        batch_size,
        factors,
    ))
}

fn required_percentage(recipe: &recipe_entity::Model, material: &str) -> Result<f64> {
    recipe.percentage_value.ok_or_else(|| {
        Error::invalid(format!(
            "recipe line {} for '{material}' is percentage-based but has no percentage",
            recipe.id
        ))
    })
}

/// Computes the cost breakdown for already-loaded data.
///
/// # Errors
/// Returns `InvalidBatchSize` for a non-positive or non-finite batch size and
/// `InvalidInput` for a percentage line without a percentage.
pub fn calculate_batch_cost(
    product: &product_entity::Model,
    lines: &[RecipeLine],
    batch_size: Option<f64>,
    factors: &ConversionFactors,
) -> Result<CostBreakdown> {
    let batch_size = resolve_batch_size(product, batch_size)?;
    let scale_factor = batch_size / product.batch_size;

    let mut material_cost = 0.0;
    let mut material_details = Vec::with_capacity(lines.len());

    for line in lines {
        let quantity = resolve_line_quantity(line, product.form, batch_size, scale_factor, factors)?;
        let cost = quantity * line.material.current_price;
        material_cost += cost;

        material_details.push(MaterialLine {
            material_id: line.material.id,
            material: line.material.name.clone(),
            quantity,
            original_quantity: line.recipe.quantity_per_batch,
            is_percentage: line.recipe.is_percentage_based,
            percentage_value: line.recipe.percentage_value,
            unit: line.material.unit,
            unit_price: line.material.current_price,
            total_cost: cost,
            notes: line.recipe.notes.clone(),
        });
    }

    let labor_cost = product.labor_cost_per_batch * scale_factor;
    let overhead_cost = material_cost * (product.overhead_percentage / 100.0);
    let packaging_cost = product.packaging_cost * scale_factor;

    let total_cost = material_cost + labor_cost + overhead_cost + packaging_cost;
    let recommended_price = total_cost * (1.0 + product.profit_margin_percentage / 100.0);

    Ok(CostBreakdown {
        product_id: product.id,
        product_name: product.name.clone(),
        batch_size,
        scale_factor,
        material_cost,
        labor_cost,
        overhead_cost,
        packaging_cost,
        total_cost,
        recommended_price,
        cost_per_unit: total_cost / batch_size,
        price_per_unit: recommended_price / batch_size,
        material_details,
    })
}

/// Loads a product and its recipe lines, then computes the cost breakdown.
///
/// # Errors
/// Returns `ProductNotFound`/`MaterialNotFound` for missing references and the
/// errors of [`calculate_batch_cost`] for invalid input.
#[instrument(skip(db, factors))]
pub async fn calculate_product_cost(
    db: &DatabaseConnection,
    product_id: i64,
    batch_size: Option<f64>,
    factors: &ConversionFactors,
) -> Result<CostBreakdown> {
    let product = product::require_product(db, product_id).await?;
    // Fail fast before touching the recipe table
    resolve_batch_size(&product, batch_size)?;

    let lines = crate::core::recipe::load_recipe_lines(db, product_id).await?;
    let breakdown = calculate_batch_cost(&product, &lines, batch_size, factors)?;
    debug!(
        "Costed '{}' at batch {}: total {:.2}, price {:.2}",
        breakdown.product_name,
        breakdown.batch_size,
        breakdown.total_cost,
        breakdown.recommended_price
    );
    Ok(breakdown)
}

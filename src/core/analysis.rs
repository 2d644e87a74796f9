//! Cost analysis history.
//!
//! Snapshots are written once per on-demand calculation and never updated.

use crate::{
    core::cost::CostBreakdown,
    entities::{CostAnalysis, Product, cost_analysis, product},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{info, instrument};

/// Stores a snapshot of a computed breakdown.
#[instrument(skip(db, breakdown), fields(product = %breakdown.product_name))]
pub async fn record_cost_analysis(
    db: &DatabaseConnection,
    product_id: i64,
    breakdown: &CostBreakdown,
) -> Result<cost_analysis::Model> {
    let analysis = cost_analysis::ActiveModel {
        product_id: Set(product_id),
        batch_size: Set(breakdown.batch_size),
        material_cost: Set(breakdown.material_cost),
        labor_cost: Set(breakdown.labor_cost),
        overhead_cost: Set(breakdown.overhead_cost),
        packaging_cost: Set(breakdown.packaging_cost),
        total_cost: Set(breakdown.total_cost),
        recommended_price: Set(breakdown.recommended_price),
        calculated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let saved = analysis.insert(db).await?;
    info!(
        "Recorded cost analysis {} (batch {}, total {:.2})",
        saved.id, saved.batch_size, saved.total_cost
    );
    Ok(saved)
}

/// Most recent snapshots across all products, newest first, with their product.
pub async fn get_recent_analyses(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<(cost_analysis::Model, Option<product::Model>)>> {
    CostAnalysis::find()
        .order_by_desc(cost_analysis::Column::CalculatedAt)
        .order_by_desc(cost_analysis::Column::Id)
        .limit(limit)
        .find_also_related(Product)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All snapshots of one product, newest first.
pub async fn get_analyses_for_product(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<cost_analysis::Model>> {
    CostAnalysis::find()
        .filter(cost_analysis::Column::ProductId.eq(product_id))
        .order_by_desc(cost_analysis::Column::CalculatedAt)
        .order_by_desc(cost_analysis::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

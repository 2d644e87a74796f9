//! Report generation business logic.
//!
//! This module provides the dashboard summary and the formatting helpers shared by
//! the bot commands. All functions are framework-agnostic and return structured
//! data or plain strings that the bot layer places into embeds.

use crate::{
    core::{analysis, market, material},
    entities::{Product, RawMaterial, UnitOfMeasure, cost_analysis, market_price, product},
    errors::Result,
};
use sea_orm::{PaginatorTrait, prelude::*};

/// Number of recent entries shown per dashboard section.
pub const DASHBOARD_RECENT: u64 = 5;

/// Overview of the whole catalog.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub total_products: u64,
    pub total_materials: u64,
    /// Materials at or below their reorder threshold
    pub low_stock_materials: u64,
    /// Newest first, with the product when it still exists
    pub recent_analyses: Vec<(cost_analysis::Model, Option<product::Model>)>,
    /// Newest first
    pub recent_market_prices: Vec<market_price::Model>,
}

/// Gathers the counts and recent activity shown on the dashboard.
pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary> {
    let total_products = Product::find().count(db).await?;
    let total_materials = RawMaterial::find().count(db).await?;
    let low_stock_materials = material::count_low_stock_materials(db).await?;

    let recent_analyses = analysis::get_recent_analyses(db, DASHBOARD_RECENT).await?;
    let recent_market_prices = market::get_recent_market_prices(db, DASHBOARD_RECENT).await?;

    Ok(DashboardSummary {
        total_products,
        total_materials,
        low_stock_materials,
        recent_analyses,
        recent_market_prices,
    })
}

/// Stock on hand as a percentage of the reorder threshold.
///
/// - 100% = exactly at the threshold
/// - above 100% = comfortable
/// - 0% = nothing left
///
/// A zero threshold reports 100% whenever there is any stock.
#[must_use]
pub fn calculate_stock_coverage(stock: f64, minimum: f64) -> f64 {
    if minimum <= 0.0 {
        return if stock > 0.0 { 100.0 } else { 0.0 };
    }

    (stock / minimum) * 100.0
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`
///
/// # Arguments
/// * `progress_percent` - Progress percentage (0-100)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    // Result is mathematically in [0, length], truncation/sign loss intentional for display.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent:.1}%")
}

/// Formats an amount in Kenyan shillings, e.g. `KSh 1,240.50`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}KSh {grouped}.{fraction}")
}

/// Formats a material quantity with its unit, e.g. `2.400 kg` or `1000 pieces`.
#[must_use]
pub fn format_quantity(quantity: f64, unit: UnitOfMeasure) -> String {
    match unit {
        UnitOfMeasure::Piece if quantity.fract() == 0.0 => format!("{quantity:.0} {unit}"),
        _ => format!("{quantity:.3} {unit}"),
    }
}

/// One-line summary of a stored analysis.
#[must_use]
pub fn format_analysis_summary(
    analysis: &cost_analysis::Model,
    product: Option<&product::Model>,
) -> String {
    let name = product.map_or("Deleted product", |p| p.name.as_str());
    format!(
        "{name} | batch {} | cost {} | price {} | {}",
        analysis.batch_size,
        format_money(analysis.total_cost),
        format_money(analysis.recommended_price),
        analysis.calculated_at.format("%Y-%m-%d %H:%M")
    )
}

/// One-line summary of a market observation.
#[must_use]
pub fn format_market_summary(observation: &market_price::Model) -> String {
    format!(
        "{} | {} | {} | {}",
        observation.product_name,
        format_money(observation.price),
        observation.size_info,
        observation.competitor
    )
}

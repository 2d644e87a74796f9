//! Market price history and comparison against our own costing.
//!
//! Observations come from the scraper and are append-only. Matching a product to
//! observations is a plain substring search on the first word of the product name.

use crate::{
    config::ConversionFactors,
    core::{
        cost::{CostBreakdown, calculate_product_cost},
        product,
    },
    entities::{MarketPrice, market_price},
    errors::Result,
    scraper::Listing,
};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Number of observations shown next to a product's costing.
pub const COMPARISON_LIMIT: u64 = 10;

/// A product's default-batch costing next to recent competitor prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketComparison {
    pub breakdown: CostBreakdown,
    /// Text the observations were matched on
    pub search_term: String,
    /// Newest first
    pub observations: Vec<market_price::Model>,
}

impl MarketComparison {
    /// Mean listed price of the matched observations.
    #[must_use]
    pub fn average_market_price(&self) -> Option<f64> {
        if self.observations.is_empty() {
            return None;
        }
        let total: f64 = self.observations.iter().map(|o| o.price).sum();
        #[allow(clippy::cast_precision_loss)] // At most COMPARISON_LIMIT observations
        Some(total / self.observations.len() as f64)
    }
}

/// Stores a batch of scraped listings in one transaction.
#[instrument(skip(db, listings), fields(count = listings.len()))]
pub async fn record_market_prices(
    db: &DatabaseConnection,
    listings: &[Listing],
) -> Result<Vec<market_price::Model>> {
    let scraped_at = chrono::Utc::now();
    let txn = db.begin().await?;

    let mut saved = Vec::with_capacity(listings.len());
    for listing in listings {
        let observation = market_price::ActiveModel {
            product_name: Set(listing.product_name.clone()),
            competitor: Set(listing.competitor.clone()),
            price: Set(listing.price),
            url: Set(listing.url.clone()),
            size_info: Set(listing.size_info.clone()),
            scraped_at: Set(scraped_at),
            ..Default::default()
        };
        saved.push(observation.insert(&txn).await?);
    }

    txn.commit().await?;
    info!("Recorded {} market price observation(s)", saved.len());
    Ok(saved)
}

/// Most recent observations, newest first.
pub async fn get_recent_market_prices(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<market_price::Model>> {
    MarketPrice::find()
        .order_by_desc(market_price::Column::ScrapedAt)
        .order_by_desc(market_price::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Most recent observations whose listing title contains `term`.
pub async fn find_market_prices_like(
    db: &DatabaseConnection,
    term: &str,
    limit: u64,
) -> Result<Vec<market_price::Model>> {
    MarketPrice::find()
        .filter(market_price::Column::ProductName.contains(term))
        .order_by_desc(market_price::Column::ScrapedAt)
        .order_by_desc(market_price::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Search term used to match a product against listings.
#[must_use]
pub fn comparison_term(product_name: &str) -> &str {
    product_name
        .split_whitespace()
        .next()
        .unwrap_or(product_name)
}

/// Costs a product at its standard batch and pairs it with matching observations.
///
/// # Errors
/// Returns the errors of [`calculate_product_cost`].
#[instrument(skip(db, factors))]
pub async fn compare_with_market(
    db: &DatabaseConnection,
    product_id: i64,
    factors: &ConversionFactors,
) -> Result<MarketComparison> {
    let product = product::require_product(db, product_id).await?;
    let breakdown = calculate_product_cost(db, product_id, None, factors).await?;

    let search_term = comparison_term(&product.name).to_string();
    let observations = find_market_prices_like(db, &search_term, COMPARISON_LIMIT).await?;

    Ok(MarketComparison {
        breakdown,
        search_term,
        observations,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_comparison_term_is_first_word() {
        assert_eq!(comparison_term("Omo Multi Active"), "Omo");
        assert_eq!(comparison_term("  Sunlight  "), "Sunlight");
        assert_eq!(comparison_term(""), "");
    }

    #[tokio::test]
    async fn test_record_and_query_market_prices() -> Result<()> {
        let db = setup_test_db().await?;
        let listings = vec![
            test_listing("Omo Hand Wash 1kg", 320.0),
            test_listing("Ariel Detergent 500g", 210.0),
            test_listing("OMO Auto 2kg", 640.0),
        ];

        let saved = record_market_prices(&db, &listings).await?;
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[0].size_info, "1kg");
        assert_eq!(saved[0].competitor, "Jumia");

        let recent = get_recent_market_prices(&db, 2).await?;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].product_name, "OMO Auto 2kg");

        // SQLite LIKE is case-insensitive for ASCII
        let omo = find_market_prices_like(&db, "Omo", 10).await?;
        assert_eq!(omo.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_compare_with_market() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Omo Test Blend").await?;
        let mut listings: Vec<Listing> = (0..12)
            .map(|i| test_listing(&format!("Omo Pack {i}"), 100.0))
            .collect();
        listings.push(test_listing("Ariel 1kg", 999.0));
        record_market_prices(&db, &listings).await?;

        let comparison = compare_with_market(&db, product.id, &ConversionFactors::default()).await?;
        assert_eq!(comparison.search_term, "Omo");
        assert_eq!(comparison.observations.len(), 10);
        assert!(comparison.observations.iter().all(|o| o.product_name.starts_with("Omo")));
        assert_eq!(comparison.average_market_price(), Some(100.0));
        assert_eq!(comparison.breakdown.product_id, product.id);
        assert_eq!(comparison.breakdown.batch_size, product.batch_size);
        Ok(())
    }

    #[tokio::test]
    async fn test_compare_without_observations() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Harpic").await?;
        let comparison = compare_with_market(&db, product.id, &ConversionFactors::default()).await?;
        assert!(comparison.observations.is_empty());
        assert_eq!(comparison.average_market_price(), None);

        let err = compare_with_market(&db, 999, &ConversionFactors::default())
            .await
            .err();
        assert!(err.is_some_and(|e| e.is_not_found()));
        Ok(())
    }
}

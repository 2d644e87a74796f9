//! Market price entity - A competitor price observed by the scraper.
//!
//! Observations are append-only and only used for display and comparison.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Market price database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "market_prices")]
pub struct Model {
    /// Unique identifier for the observation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Listing title as shown by the retailer
    pub product_name: String,
    /// Retailer label (e.g., "Jumia")
    pub competitor: String,
    /// Listed price
    pub price: f64,
    /// Link to the listing
    pub url: String,
    /// Pack size pulled from the title (e.g., "500ml"), or "Unknown"
    pub size_info: String,
    /// When the listing was scraped
    pub scraped_at: DateTimeUtc,
}

/// Market prices are standalone observations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

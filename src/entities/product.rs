//! Product entity - Finished goods manufactured in batches.
//!
//! A product's `batch_size` is the standard batch its absolute recipe quantities,
//! labor and packaging costs are calibrated against.

use super::enums::ProductForm;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Omo Advanced Powder")
    #[sea_orm(unique)]
    pub name: String,
    /// Free-text category shown to users (e.g., "Laundry Powder")
    pub category: String,
    /// Classification used by the percentage conversion heuristic
    pub form: ProductForm,
    /// Standard batch size in finished units, always > 0
    pub batch_size: f64,
    /// Labor cost for one standard batch
    pub labor_cost_per_batch: f64,
    /// Overhead as a percentage of material cost
    pub overhead_percentage: f64,
    /// Packaging cost for one standard batch
    pub packaging_cost: f64,
    /// Markup applied on top of total cost
    pub profit_margin_percentage: f64,
    /// When the product was created
    pub created_at: DateTime,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many recipe lines
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipes,
    /// One product has many cost analysis snapshots
    #[sea_orm(has_many = "super::cost_analysis::Entity")]
    CostAnalyses,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<super::cost_analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostAnalyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

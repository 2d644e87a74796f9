//! Cost analysis entity - Immutable snapshot of one cost calculation.
//!
//! Written by the calling layer every time a cost is computed on request. The
//! engine never reads these back.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cost analysis database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    /// Batch size the numbers were computed for
    pub batch_size: f64,
    pub material_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub packaging_cost: f64,
    pub total_cost: f64,
    pub recommended_price: f64,
    pub calculated_at: DateTimeUtc,
}

/// Defines relationships between `CostAnalysis` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each snapshot belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

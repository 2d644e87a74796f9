//! Raw material entity - Inputs bought from suppliers and consumed by recipes.
//!
//! Each material carries its current unit price and on-hand stock. Materials are
//! never deleted while a recipe line still references them.

use super::enums::UnitOfMeasure;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw material database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "raw_materials")]
pub struct Model {
    /// Unique identifier for the material
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Sodium Sulfate")
    #[sea_orm(unique)]
    pub name: String,
    /// Unit the price and stock are expressed in
    pub unit: UnitOfMeasure,
    /// Current price per unit
    pub current_price: f64,
    /// Quantity on hand, in `unit`
    pub stock_quantity: f64,
    /// Reorder threshold, in `unit`
    pub minimum_stock: f64,
    /// Supplier name, if known
    pub supplier: Option<String>,
    /// When price or stock last changed
    pub last_updated: DateTime,
}

/// Defines relationships between `RawMaterial` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One material appears in many recipe lines
    #[sea_orm(has_many = "super::recipe::Entity")]
    Recipes,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when stock has fallen to or below the reorder threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.minimum_stock
    }
}

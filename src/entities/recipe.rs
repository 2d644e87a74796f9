//! Recipe entity - One ingredient line joining a product to a raw material.
//!
//! `quantity_per_batch` is always the resolved absolute amount for one standard
//! batch. Percentage-based lines also keep the original `percentage_value`, which
//! the cost engine re-applies at the requested batch size.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    /// Unique identifier for the recipe line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product this line belongs to
    pub product_id: i64,
    /// Material consumed by this line
    pub material_id: i64,
    /// Absolute quantity per standard batch, in the material's unit
    pub quantity_per_batch: f64,
    /// Whether `percentage_value` is the authoritative amount
    pub is_percentage_based: bool,
    /// Percentage of the estimated batch base, kept for display and rescaling
    pub percentage_value: Option<f64>,
    /// Operator note (e.g., "Primary surfactant")
    pub notes: Option<String>,
    /// When the line was first recorded
    pub created_at: DateTime,
    /// When the line was last overwritten
    pub updated_at: DateTime,
}

/// Defines relationships between Recipe and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each line consumes one raw material
    #[sea_orm(
        belongs_to = "super::raw_material::Entity",
        from = "Column::MaterialId",
        to = "super::raw_material::Column::Id"
    )]
    RawMaterial,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::raw_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RawMaterial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Quantity as shown to operators, with the percentage when there is one.
    #[must_use]
    pub fn display_quantity(&self) -> String {
        match (self.is_percentage_based, self.percentage_value) {
            (true, Some(percentage)) => {
                format!("{:.3} ({percentage}%)", self.quantity_per_batch)
            }
            _ => format!("{:.3}", self.quantity_per_batch),
        }
    }
}

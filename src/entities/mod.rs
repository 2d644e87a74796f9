//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cost_analysis;
pub mod enums;
pub mod market_price;
pub mod product;
pub mod raw_material;
pub mod recipe;

// Re-export specific types to avoid conflicts
pub use cost_analysis::{
    Column as CostAnalysisColumn, Entity as CostAnalysis, Model as CostAnalysisModel,
};
pub use enums::{ProductForm, UnitOfMeasure};
pub use market_price::{
    Column as MarketPriceColumn, Entity as MarketPrice, Model as MarketPriceModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use raw_material::{
    Column as RawMaterialColumn, Entity as RawMaterial, Model as RawMaterialModel,
};
pub use recipe::{Column as RecipeColumn, Entity as Recipe, Model as RecipeModel};

//! Core business logic, independent of the bot layer.
//!
//! Every function takes a `DatabaseConnection` (or already-loaded models) and
//! returns `crate::errors::Result`, so the same operations back the slash commands,
//! the catalog seeding and the tests.

/// Cost analysis history
pub mod analysis;
/// Batch cost calculation engine
pub mod cost;
/// Competitor price history and comparison
pub mod market;
/// Raw material records, prices and stock
pub mod material;
/// Finished products and their cost parameters
pub mod product;
/// Recipe lines and percentage reconciliation
pub mod recipe;
/// Dashboard summary and display formatting
pub mod report;
/// Starter catalog seeding
pub mod seed;
/// Stock availability for a production run
pub mod stock;

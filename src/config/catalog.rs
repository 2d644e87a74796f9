//! Seed catalog loading from catalog.toml
//!
//! This module provides functionality to load a starter catalog of raw materials
//! and product formulations from a TOML file. The catalog is used to populate a
//! fresh database for demonstration; it plays no part in costing at runtime.

use crate::entities::{ProductForm, UnitOfMeasure};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Catalog {
    /// Raw materials to create when missing
    #[serde(default)]
    pub materials: Vec<MaterialSeed>,
    /// Products with their formulations
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// Seed entry for a single raw material
#[derive(Debug, Deserialize, Clone)]
pub struct MaterialSeed {
    /// Unique material name
    pub name: String,
    /// Unit the material is stocked in
    pub unit: UnitOfMeasure,
    /// Price per unit
    pub current_price: f64,
    /// Quantity on hand
    #[serde(default)]
    pub stock_quantity: f64,
    /// Reorder threshold
    #[serde(default)]
    pub minimum_stock: f64,
    /// Supplier name
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Seed entry for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Unique product name
    pub name: String,
    /// Display category (e.g., "Laundry Powder")
    pub category: String,
    /// Explicit form; derived from the category when omitted
    #[serde(default)]
    pub form: Option<ProductForm>,
    /// Standard batch size in finished units
    pub batch_size: f64,
    /// Labor cost per standard batch
    #[serde(default)]
    pub labor_cost_per_batch: f64,
    /// Overhead percentage of material cost
    #[serde(default = "default_overhead")]
    pub overhead_percentage: f64,
    /// Packaging cost per standard batch
    #[serde(default)]
    pub packaging_cost: f64,
    /// Profit margin percentage
    #[serde(default = "default_margin")]
    pub profit_margin_percentage: f64,
    /// Formulation lines
    #[serde(default)]
    pub recipe: Vec<RecipeSeed>,
}

/// Seed entry for a single formulation line.
///
/// Exactly one of `percentage` and `quantity` should be set; `percentage` wins if both are.
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeSeed {
    /// Name of an existing or seeded material
    pub material: String,
    /// Share of the estimated batch base
    #[serde(default)]
    pub percentage: Option<f64>,
    /// Absolute amount per standard batch
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Operator note
    #[serde(default)]
    pub notes: Option<String>,
}

const fn default_overhead() -> f64 {
    15.0
}

const fn default_margin() -> f64 {
    25.0
}

/// Loads the seed catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog.toml: {e}"),
    })
}

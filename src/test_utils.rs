//! Shared test utilities for `CostingBuddy`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and building in-memory models
//! for the pure costing functions.

#![allow(clippy::float_cmp)]

use crate::{
    core::{
        material::{self, NewMaterial},
        product::{self, NewProduct},
        recipe::RecipeLine,
    },
    entities::{
        ProductForm, UnitOfMeasure, market_price, product as product_entity, raw_material, recipe,
    },
    errors::Result,
    scraper::{Listing, extract_size_info},
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Asserts two floats agree to within `1e-9`, relative to their magnitude.
///
/// # Panics
/// Panics when the values differ by more than the tolerance.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Material arguments with zero stock and no supplier.
pub fn material_args(name: &str, unit: UnitOfMeasure, price: f64) -> NewMaterial {
    NewMaterial {
        name: name.to_string(),
        unit,
        current_price: price,
        stock_quantity: 0.0,
        minimum_stock: 0.0,
        supplier: None,
    }
}

/// Creates a test material with zero stock and a zero reorder threshold.
pub async fn create_test_material(
    db: &DatabaseConnection,
    name: &str,
    unit: UnitOfMeasure,
    price: f64,
) -> Result<raw_material::Model> {
    material::create_material(db, material_args(name, unit, price)).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * category: "Laundry Bar Soap" (solid)
/// * `batch_size`: 100.0
/// * overhead 15%, margin 25%, no labor or packaging
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<product_entity::Model> {
    product::create_product(db, NewProduct::new(name, "Laundry Bar Soap", 100.0)).await
}

/// Creates "Soap A": batch 1000, labor 500, overhead 18%, packaging 150, margin 30%.
pub async fn create_soap_a(db: &DatabaseConnection) -> Result<product_entity::Model> {
    product::create_product(
        db,
        NewProduct {
            labor_cost_per_batch: 500.0,
            overhead_percentage: 18.0,
            packaging_cost: 150.0,
            profit_margin_percentage: 30.0,
            ..NewProduct::new("Soap A", "Laundry Bar Soap", 1000.0)
        },
    )
    .await
}

/// Sets up a database with one product and one material, ready for recipe lines.
/// Returns (db, product, material); the material is "Test Material" in kg at 10.0.
pub async fn setup_with_recipe_parts() -> Result<(
    DatabaseConnection,
    product_entity::Model,
    raw_material::Model,
)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Test Product").await?;
    let material = create_test_material(&db, "Test Material", UnitOfMeasure::Kilogram, 10.0).await?;
    Ok((db, product, material))
}

fn epoch() -> chrono::NaiveDateTime {
    chrono::NaiveDateTime::default()
}

/// In-memory product; the form follows the category like a stored product's.
pub fn product_model(id: i64, name: &str, category: &str, batch_size: f64) -> product_entity::Model {
    product_entity::Model {
        id,
        name: name.to_string(),
        category: category.to_string(),
        form: ProductForm::classify(category),
        batch_size,
        labor_cost_per_batch: 0.0,
        overhead_percentage: 15.0,
        packaging_cost: 0.0,
        profit_margin_percentage: 25.0,
        created_at: epoch(),
    }
}

/// In-memory material with zero stock.
pub fn material_model(id: i64, name: &str, unit: UnitOfMeasure, price: f64) -> raw_material::Model {
    raw_material::Model {
        id,
        name: name.to_string(),
        unit,
        current_price: price,
        stock_quantity: 0.0,
        minimum_stock: 0.0,
        supplier: None,
        last_updated: epoch(),
    }
}

fn line(
    recipe_id: i64,
    material: raw_material::Model,
    quantity: f64,
    percentage: Option<f64>,
) -> RecipeLine {
    RecipeLine {
        recipe: recipe::Model {
            id: recipe_id,
            product_id: 1,
            material_id: material.id,
            quantity_per_batch: quantity,
            is_percentage_based: percentage.is_some(),
            percentage_value: percentage,
            notes: None,
            created_at: epoch(),
            updated_at: epoch(),
        },
        material,
    }
}

/// In-memory absolute recipe line for product 1.
pub fn absolute_line(recipe_id: i64, material: raw_material::Model, quantity: f64) -> RecipeLine {
    line(recipe_id, material, quantity, None)
}

/// In-memory percentage recipe line for product 1 with the given stored quantity.
pub fn percentage_line(
    recipe_id: i64,
    material: raw_material::Model,
    quantity: f64,
    percentage: f64,
) -> RecipeLine {
    line(recipe_id, material, quantity, Some(percentage))
}

/// A Jumia listing as the parser would produce it.
pub fn test_listing(name: &str, price: f64) -> Listing {
    Listing {
        product_name: name.to_string(),
        competitor: "Jumia".to_string(),
        price,
        url: "https://www.jumia.co.ke/test-listing.html".to_string(),
        size_info: extract_size_info(name),
    }
}

/// A stored Jumia observation scraped at the Unix epoch.
pub fn market_model(id: i64, name: &str, price: f64) -> market_price::Model {
    market_price::Model {
        id,
        product_name: name.to_string(),
        competitor: "Jumia".to_string(),
        price,
        url: "https://www.jumia.co.ke/test-listing.html".to_string(),
        size_info: extract_size_info(name),
        scraped_at: chrono::DateTime::default(),
    }
}

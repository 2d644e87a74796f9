//! Product business logic - Finished goods and their per-batch cost parameters.
//!
//! This module provides functions for creating and retrieving products. A product's
//! standard batch size anchors every scaling computation, so it must be a positive,
//! finite number; all other cost parameters must be finite and non-negative.

use crate::{
    core::material::ensure_non_negative,
    entities::{Product, ProductForm, product},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Arguments for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    /// Derived from `category` when `None`
    pub form: Option<ProductForm>,
    pub batch_size: f64,
    pub labor_cost_per_batch: f64,
    pub overhead_percentage: f64,
    pub packaging_cost: f64,
    pub profit_margin_percentage: f64,
}

impl NewProduct {
    /// Product with the default overhead (15%) and margin (25%) and no fixed costs.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, batch_size: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            form: None,
            batch_size,
            labor_cost_per_batch: 0.0,
            overhead_percentage: 15.0,
            packaging_cost: 0.0,
            profit_margin_percentage: 25.0,
        }
    }
}

/// Retrieves all products, ordered alphabetically by name.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its exact name.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_product_by_id`] but fails with `ProductNotFound` when absent.
pub async fn require_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: product_id.to_string(),
        })
}

/// Looks a product up by the name an operator typed.
///
/// # Errors
/// Returns `ProductNotFound` carrying the name when no product matches.
pub async fn require_product_by_name(db: &DatabaseConnection, name: &str) -> Result<product::Model> {
    get_product_by_name(db, name.trim())
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            id: name.trim().to_string(),
        })
}

/// Creates a new product, performing input validation.
///
/// Accepts any connection so callers can create a product inside their own transaction.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The batch size is not a positive finite number
/// - Any cost or percentage is negative or not finite
/// - The database insert fails (including a duplicate name)
#[instrument(skip(db))]
pub async fn create_product<C: ConnectionTrait>(db: &C, args: NewProduct) -> Result<product::Model> {
    if args.name.trim().is_empty() {
        return Err(Error::invalid("Product name cannot be empty"));
    }
    if !args.batch_size.is_finite() || args.batch_size <= 0.0 {
        return Err(Error::InvalidBatchSize {
            batch_size: args.batch_size,
        });
    }
    ensure_non_negative("labor_cost_per_batch", args.labor_cost_per_batch)?;
    ensure_non_negative("overhead_percentage", args.overhead_percentage)?;
    ensure_non_negative("packaging_cost", args.packaging_cost)?;
    ensure_non_negative("profit_margin_percentage", args.profit_margin_percentage)?;

    let category = args.category.trim().to_string();
    let form = args
        .form
        .unwrap_or_else(|| ProductForm::classify(&category));

    let product = product::ActiveModel {
        name: Set(args.name.trim().to_string()),
        category: Set(category),
        form: Set(form),
        batch_size: Set(args.batch_size),
        labor_cost_per_batch: Set(args.labor_cost_per_batch),
        overhead_percentage: Set(args.overhead_percentage),
        packaging_cost: Set(args.packaging_cost),
        profit_margin_percentage: Set(args.profit_margin_percentage),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let created = product.insert(db).await?;
    info!(
        "Created product '{}' (id {}, {} form, batch {})",
        created.name, created.id, created.form, created.batch_size
    );
    Ok(created)
}

//! Raw material business logic - Inventory records, prices and stock levels.
//!
//! All functions are async and return Result types for proper error handling.
//! Prices and quantities are validated to be finite and non-negative before any write.

use crate::{
    entities::{RawMaterial, Recipe, UnitOfMeasure, raw_material, recipe},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Select, Set, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

/// Arguments for creating a raw material.
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub name: String,
    pub unit: UnitOfMeasure,
    pub current_price: f64,
    pub stock_quantity: f64,
    pub minimum_stock: f64,
    pub supplier: Option<String>,
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Retrieves all raw materials, ordered alphabetically by name.
pub async fn get_all_materials(db: &DatabaseConnection) -> Result<Vec<raw_material::Model>> {
    RawMaterial::find()
        .order_by_asc(raw_material::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific raw material by its unique ID.
pub async fn get_material_by_id(
    db: &DatabaseConnection,
    material_id: i64,
) -> Result<Option<raw_material::Model>> {
    RawMaterial::find_by_id(material_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a raw material by its exact name.
pub async fn get_material_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<raw_material::Model>> {
    RawMaterial::find()
        .filter(raw_material::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_material_by_id`] but fails with `MaterialNotFound` when absent.
pub async fn require_material(
    db: &DatabaseConnection,
    material_id: i64,
) -> Result<raw_material::Model> {
    get_material_by_id(db, material_id)
        .await?
        .ok_or_else(|| Error::MaterialNotFound {
            id: material_id.to_string(),
        })
}

/// Looks a material up by the name an operator typed.
///
/// # Errors
/// Returns `MaterialNotFound` carrying the name when no material matches.
pub async fn require_material_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<raw_material::Model> {
    get_material_by_name(db, name.trim())
        .await?
        .ok_or_else(|| Error::MaterialNotFound {
            id: name.trim().to_string(),
        })
}

fn low_stock() -> Select<RawMaterial> {
    RawMaterial::find().filter(
        Expr::col(raw_material::Column::StockQuantity)
            .lte(Expr::col(raw_material::Column::MinimumStock)),
    )
}

/// Materials whose stock is at or below their minimum threshold.
pub async fn get_low_stock_materials(db: &DatabaseConnection) -> Result<Vec<raw_material::Model>> {
    low_stock()
        .order_by_asc(raw_material::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Number of materials [`get_low_stock_materials`] would return.
pub async fn count_low_stock_materials(db: &DatabaseConnection) -> Result<u64> {
    low_stock().count(db).await.map_err(Into::into)
}

/// Creates a new raw material after validating name, price and quantities.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - Price, stock or minimum stock is negative or not finite
/// - The database insert fails (including a duplicate name)
#[instrument(skip(db))]
pub async fn create_material(
    db: &DatabaseConnection,
    args: NewMaterial,
) -> Result<raw_material::Model> {
    if args.name.trim().is_empty() {
        return Err(Error::invalid("Material name cannot be empty"));
    }
    ensure_non_negative("current_price", args.current_price)?;
    ensure_non_negative("stock_quantity", args.stock_quantity)?;
    ensure_non_negative("minimum_stock", args.minimum_stock)?;

    let supplier = args
        .supplier
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let material = raw_material::ActiveModel {
        name: Set(args.name.trim().to_string()),
        unit: Set(args.unit),
        current_price: Set(args.current_price),
        stock_quantity: Set(args.stock_quantity),
        minimum_stock: Set(args.minimum_stock),
        supplier: Set(supplier),
        last_updated: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };
    let created = material.insert(db).await?;
    info!("Created raw material '{}' (id {})", created.name, created.id);
    Ok(created)
}

/// Sets a new unit price for a material.
#[instrument(skip(db))]
pub async fn update_material_price(
    db: &DatabaseConnection,
    material_id: i64,
    new_price: f64,
) -> Result<raw_material::Model> {
    ensure_non_negative("current_price", new_price)?;

    let mut material: raw_material::ActiveModel = require_material(db, material_id).await?.into();
    material.current_price = Set(new_price);
    material.last_updated = Set(chrono::Utc::now().naive_utc());
    material.update(db).await.map_err(Into::into)
}

/// Sets the on-hand quantity and, optionally, the reorder threshold.
#[instrument(skip(db))]
pub async fn update_material_stock(
    db: &DatabaseConnection,
    material_id: i64,
    stock_quantity: f64,
    minimum_stock: Option<f64>,
) -> Result<raw_material::Model> {
    ensure_non_negative("stock_quantity", stock_quantity)?;
    if let Some(minimum) = minimum_stock {
        ensure_non_negative("minimum_stock", minimum)?;
    }

    let mut material: raw_material::ActiveModel = require_material(db, material_id).await?.into();
    material.stock_quantity = Set(stock_quantity);
    if let Some(minimum) = minimum_stock {
        material.minimum_stock = Set(minimum);
    }
    material.last_updated = Set(chrono::Utc::now().naive_utc());
    material.update(db).await.map_err(Into::into)
}

/// Deletes a material that no recipe line references.
///
/// # Errors
/// Returns `MaterialInUse` if any recipe line still uses the material.
#[instrument(skip(db))]
pub async fn delete_material(db: &DatabaseConnection, material_id: i64) -> Result<()> {
    let material = require_material(db, material_id).await?;

    let references = Recipe::find()
        .filter(recipe::Column::MaterialId.eq(material_id))
        .count(db)
        .await?;
    if references > 0 {
        return Err(Error::MaterialInUse {
            name: material.name,
            recipes: references,
        });
    }

    RawMaterial::delete_by_id(material_id).exec(db).await?;
    info!("Deleted raw material '{}'", material.name);
    Ok(())
}

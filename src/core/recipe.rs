//! Recipe business logic - Recording formulation lines and reconciling percentages.
//!
//! A line is either an absolute amount per standard batch or a percentage of the
//! estimated batch base. Both are stored: `quantity_per_batch` always holds the
//! absolute amount (the stock checker scales it), and percentage lines also keep
//! the percentage (the cost engine re-applies it). A (product, material) pair has at
//! most one line; recording the pair again overwrites it.

use crate::{
    config::ConversionFactors,
    core::cost::{estimated_batch_base, resolve_percentage_quantity},
    entities::{Product, RawMaterial, Recipe, UnitOfMeasure, product, raw_material, recipe},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// A recipe line together with the material it consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeLine {
    pub recipe: recipe::Model,
    pub material: raw_material::Model,
}

/// How an operator expressed a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecipeQuantity {
    /// Fixed amount per standard batch
    Absolute { quantity: f64 },
    /// Percentage of the estimated batch base, with its resolved amount per standard batch
    Percentage { percentage: f64, quantity: f64 },
}

impl RecipeQuantity {
    /// Builds a percentage line, resolving the absolute amount at the product's standard batch.
    #[must_use]
    pub fn from_percentage(
        product: &product::Model,
        unit: UnitOfMeasure,
        percentage: f64,
        factors: &ConversionFactors,
    ) -> Self {
        Self::Percentage {
            percentage,
            quantity: percentage_to_quantity(product, unit, percentage, factors),
        }
    }

    const fn quantity(self) -> f64 {
        match self {
            Self::Absolute { quantity } | Self::Percentage { quantity, .. } => quantity,
        }
    }

    const fn percentage(self) -> Option<f64> {
        match self {
            Self::Absolute { .. } => None,
            Self::Percentage { percentage, .. } => Some(percentage),
        }
    }

    fn validate(self) -> Result<()> {
        let quantity = self.quantity();
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(Error::invalid(format!(
                "quantity must be a non-negative number, got {quantity}"
            )));
        }
        if let Some(percentage) = self.percentage()
            && (!percentage.is_finite() || !(0.0..=100.0).contains(&percentage))
        {
            return Err(Error::invalid(format!(
                "percentage must be between 0 and 100, got {percentage}"
            )));
        }
        Ok(())
    }
}

/// Result of [`upsert_recipe_line`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeUpsert {
    /// The stored line
    pub line: recipe::Model,
    /// False when an existing line for the pair was overwritten
    pub created: bool,
}

/// Absolute amount per standard batch for a percentage of the estimated batch base.
#[must_use]
pub fn percentage_to_quantity(
    product: &product::Model,
    unit: UnitOfMeasure,
    percentage: f64,
    factors: &ConversionFactors,
) -> f64 {
    resolve_percentage_quantity(percentage, unit, product.form, product.batch_size, factors)
}

/// Percentage shown next to a line.
///
/// Percentage lines report their stored percentage. Absolute lines report what their
/// amount would be as a share of the estimated batch base at the standard batch size,
/// or `None` when that base is zero.
#[must_use]
pub fn estimate_percentage(
    line: &RecipeLine,
    product: &product::Model,
    factors: &ConversionFactors,
) -> Option<f64> {
    if line.recipe.is_percentage_based {
        return line.recipe.percentage_value;
    }
    let base = estimated_batch_base(line.material.unit, product.form, product.batch_size, factors);
    (base > 0.0).then(|| line.recipe.quantity_per_batch / base * 100.0)
}

/// Loads every line of a product's recipe, joined with its material, in insertion order.
///
/// # Errors
/// Returns `MaterialNotFound` if a line references a material that no longer exists.
pub async fn load_recipe_lines(db: &DatabaseConnection, product_id: i64) -> Result<Vec<RecipeLine>> {
    let rows = Recipe::find()
        .filter(recipe::Column::ProductId.eq(product_id))
        .order_by_asc(recipe::Column::Id)
        .find_also_related(RawMaterial)
        .all(db)
        .await?;

    rows.into_iter()
        .map(|(recipe, material)| {
            let material = material.ok_or_else(|| Error::MaterialNotFound {
                id: recipe.material_id.to_string(),
            })?;
            Ok(RecipeLine { recipe, material })
        })
        .collect()
}

/// Records a recipe line, overwriting any existing line for the same pair.
///
/// Inside an open transaction the write becomes a savepoint of it.
///
/// # Errors
/// Returns an error if:
/// - The quantity is negative or not finite, or the percentage is outside 0–100
/// - The product or the material does not exist
/// - The database write fails
#[instrument(skip(db, notes))]
pub async fn upsert_recipe_line<C>(
    db: &C,
    product_id: i64,
    material_id: i64,
    quantity: RecipeQuantity,
    notes: Option<String>,
) -> Result<RecipeUpsert>
where
    C: ConnectionTrait + TransactionTrait,
{
    quantity.validate()?;
    let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

    let txn = db.begin().await?;

    if Product::find_by_id(product_id).one(&txn).await?.is_none() {
        return Err(Error::ProductNotFound {
            id: product_id.to_string(),
        });
    }
    if RawMaterial::find_by_id(material_id).one(&txn).await?.is_none() {
        return Err(Error::MaterialNotFound {
            id: material_id.to_string(),
        });
    }

    let existing = Recipe::find()
        .filter(recipe::Column::ProductId.eq(product_id))
        .filter(recipe::Column::MaterialId.eq(material_id))
        .one(&txn)
        .await?;

    let now = chrono::Utc::now().naive_utc();
    let (line, created) = if let Some(existing) = existing {
        let mut active: recipe::ActiveModel = existing.into();
        active.quantity_per_batch = Set(quantity.quantity());
        active.is_percentage_based = Set(quantity.percentage().is_some());
        active.percentage_value = Set(quantity.percentage());
        active.notes = Set(notes);
        active.updated_at = Set(now);
        (active.update(&txn).await?, false)
    } else {
        let active = recipe::ActiveModel {
            product_id: Set(product_id),
            material_id: Set(material_id),
            quantity_per_batch: Set(quantity.quantity()),
            is_percentage_based: Set(quantity.percentage().is_some()),
            percentage_value: Set(quantity.percentage()),
            notes: Set(notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        (active.insert(&txn).await?, true)
    };

    txn.commit().await?;

    info!(
        "{} recipe line {} (product {product_id}, material {material_id}): {}",
        if created { "Added" } else { "Updated" },
        line.id,
        line.display_quantity()
    );
    Ok(RecipeUpsert { line, created })
}

/// Removes the line for a (product, material) pair.
///
/// # Errors
/// Returns `RecipeNotFound` if the pair has no line.
#[instrument(skip(db))]
pub async fn remove_recipe_line(
    db: &DatabaseConnection,
    product_id: i64,
    material_id: i64,
) -> Result<()> {
    let result = Recipe::delete_many()
        .filter(recipe::Column::ProductId.eq(product_id))
        .filter(recipe::Column::MaterialId.eq(material_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::RecipeNotFound {
            product_id,
            material_id,
        });
    }
    info!("Removed recipe line for product {product_id}, material {material_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::ProductForm;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_line_with_second_values() -> Result<()> {
        let (db, product, material) = setup_with_recipe_parts().await?;

        let first = upsert_recipe_line(
            &db,
            product.id,
            material.id,
            RecipeQuantity::Absolute { quantity: 5.0 },
            Some("first".to_string()),
        )
        .await?;
        assert!(first.created);

        let second = upsert_recipe_line(
            &db,
            product.id,
            material.id,
            RecipeQuantity::Percentage {
                percentage: 12.0,
                quantity: 2.4,
            },
            Some("second".to_string()),
        )
        .await?;
        assert!(!second.created);
        assert_eq!(second.line.id, first.line.id);

        let count = Recipe::find()
            .filter(recipe::Column::ProductId.eq(product.id))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        let lines = load_recipe_lines(&db, product.id).await?;
        assert_eq!(lines.len(), 1);
        let stored = &lines[0].recipe;
        assert_eq!(stored.quantity_per_batch, 2.4);
        assert!(stored.is_percentage_based);
        assert_eq!(stored.percentage_value, Some(12.0));
        assert_eq!(stored.notes.as_deref(), Some("second"));
        assert_eq!(lines[0].material.id, material.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_switching_to_absolute_clears_percentage() -> Result<()> {
        let (db, product, material) = setup_with_recipe_parts().await?;
        upsert_recipe_line(
            &db,
            product.id,
            material.id,
            RecipeQuantity::Percentage {
                percentage: 10.0,
                quantity: 2.0,
            },
            None,
        )
        .await?;
        let updated = upsert_recipe_line(
            &db,
            product.id,
            material.id,
            RecipeQuantity::Absolute { quantity: 7.0 },
            Some("   ".to_string()),
        )
        .await?;

        assert!(!updated.line.is_percentage_based);
        assert_eq!(updated.line.percentage_value, None);
        assert_eq!(updated.line.notes, None);
        assert_eq!(updated.line.display_quantity(), "7.000");
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_missing_references() -> Result<()> {
        let (db, product, material) = setup_with_recipe_parts().await?;
        let quantity = RecipeQuantity::Absolute { quantity: 1.0 };

        let err = upsert_recipe_line(&db, 999, material.id, quantity, None).await.unwrap_err();
        assert!(matches!(err, Error::ProductNotFound { .. }));

        let err = upsert_recipe_line(&db, product.id, 999, quantity, None).await.unwrap_err();
        assert!(matches!(err, Error::MaterialNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_validation() -> Result<()> {
        let (db, product, material) = setup_with_recipe_parts().await?;
        let bad = [
            RecipeQuantity::Absolute { quantity: -1.0 },
            RecipeQuantity::Absolute { quantity: f64::NAN },
            RecipeQuantity::Percentage {
                percentage: 120.0,
                quantity: 1.0,
            },
            RecipeQuantity::Percentage {
                percentage: -0.5,
                quantity: 1.0,
            },
            RecipeQuantity::Percentage {
                percentage: 10.0,
                quantity: f64::INFINITY,
            },
        ];
        for quantity in bad {
            let err = upsert_recipe_line(&db, product.id, material.id, quantity, None)
                .await
                .unwrap_err();
            assert!(err.is_invalid_input(), "{quantity:?} should be rejected");
        }
        assert!(load_recipe_lines(&db, product.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_recipe_line() -> Result<()> {
        let (db, product, material) = setup_with_recipe_parts().await?;
        upsert_recipe_line(
            &db,
            product.id,
            material.id,
            RecipeQuantity::Absolute { quantity: 3.0 },
            None,
        )
        .await?;

        remove_recipe_line(&db, product.id, material.id).await?;
        assert!(load_recipe_lines(&db, product.id).await?.is_empty());

        let err = remove_recipe_line(&db, product.id, material.id).await.unwrap_err();
        assert!(err.is_not_found());
        Ok(())
    }

    #[test]
    fn test_percentage_to_quantity_at_standard_batch() {
        let factors = ConversionFactors::default();
        let powder = product_model(1, "Omo", "Laundry Powder", 1000.0);
        let liquid = product_model(2, "Msafi", "Liquid Detergent", 1000.0);

        assert_close(percentage_to_quantity(&powder, UnitOfMeasure::Kilogram, 12.0, &factors), 2.4);
        assert_close(percentage_to_quantity(&liquid, UnitOfMeasure::Kilogram, 12.0, &factors), 120.0);
        assert_close(percentage_to_quantity(&powder, UnitOfMeasure::Liter, 50.0, &factors), 0.5);
        assert_close(percentage_to_quantity(&powder, UnitOfMeasure::Milliliter, 0.5, &factors), 5.0);
        assert_close(percentage_to_quantity(&powder, UnitOfMeasure::Piece, 100.0, &factors), 1000.0);

        let built = RecipeQuantity::from_percentage(&powder, UnitOfMeasure::Kilogram, 25.0, &factors);
        assert!(matches!(built, RecipeQuantity::Percentage { percentage, quantity }
            if percentage == 25.0 && (quantity - 5.0).abs() < 1e-9));
    }

    #[test]
    fn test_estimate_percentage() {
        let factors = ConversionFactors::default();
        let product = product_model(1, "Omo", "Laundry Powder", 1000.0);
        assert_eq!(product.form, ProductForm::Solid);

        let absolute = absolute_line(1, material_model(1, "LAS", UnitOfMeasure::Kilogram, 1.0), 2.0);
        assert_close(estimate_percentage(&absolute, &product, &factors).unwrap(), 10.0);

        let percentage = percentage_line(2, material_model(2, "STPP", UnitOfMeasure::Kilogram, 1.0), 5.0, 25.0);
        assert_eq!(estimate_percentage(&percentage, &product, &factors), Some(25.0));

        let zero_factor = ConversionFactors {
            pieces_per_unit: 0.0,
            ..ConversionFactors::default()
        };
        let pieces = absolute_line(3, material_model(3, "Caps", UnitOfMeasure::Piece, 1.0), 10.0);
        assert_eq!(estimate_percentage(&pieces, &product, &zero_factor), None);
    }
}

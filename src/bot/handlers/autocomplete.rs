//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for command parameters like
//! product names, material names and units, improving the user experience by
//! suggesting valid options as the user types.

use crate::{
    bot::BotData,
    core::{material, product},
    entities::UnitOfMeasure,
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Case-insensitive substring filter, sorted alphabetically for consistent UX.
fn matching_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Provides autocomplete suggestions for product names.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
///
/// # Returns
/// Up to 25 product names that contain the partial input
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(products) = product::get_all_products(db).await else {
        return Vec::new();
    };

    matching_names(products.into_iter().map(|p| p.name), partial)
}

/// Provides autocomplete suggestions for raw material names.
pub async fn autocomplete_material_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(materials) = material::get_all_materials(db).await else {
        return Vec::new();
    };

    matching_names(materials.into_iter().map(|m| m.name), partial)
}

/// Provides the supported units of measure.
///
/// # Arguments
/// * `_ctx` - The poise context (unused, but required by poise signature)
/// * `partial` - The partial string the user has typed so far
pub async fn autocomplete_unit(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    unit_suggestions(partial)
}

fn unit_suggestions(partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    UnitOfMeasure::ALL
        .iter()
        .map(|unit| unit.symbol())
        .filter(|symbol| symbol.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_is_case_insensitive_and_sorted() {
        let names = ["Zeolite 4A", "Sodium Sulfate", "sodium carbonate", "Glycerin"]
            .map(String::from);
        assert_eq!(
            matching_names(names, "SODIUM"),
            vec!["Sodium Sulfate".to_string(), "sodium carbonate".to_string()]
        );
    }

    #[test]
    fn test_matching_names_caps_suggestions() {
        let names = (0..40).map(|i| format!("Material {i:02}"));
        let matching = matching_names(names, "");
        assert_eq!(matching.len(), MAX_SUGGESTIONS);
        assert_eq!(matching[0], "Material 00");
    }

    #[test]
    fn test_unit_suggestions() {
        assert_eq!(unit_suggestions(""), vec!["kg", "L", "ml", "pieces"]);
        assert_eq!(unit_suggestions("l"), vec!["L", "ml"]);
        assert_eq!(unit_suggestions("pc"), Vec::<String>::new());
    }
}

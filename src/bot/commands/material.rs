//! Raw material Discord commands - `material add/list/price/stock/delete`.
//!
//! Materials are looked up by their exact name; autocomplete offers the existing ones.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete, reply_error},
        core::{
            material::{self, NewMaterial},
            report,
        },
        entities::UnitOfMeasure,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for managing raw materials.
    ///
    /// Running this command by itself displays help text for its subcommands.
    #[poise::command(
        slash_command,
        rename = "material",
        subcommands(
            "material_add",
            "material_list",
            "material_price",
            "material_stock",
            "material_delete"
        )
    )]
    pub async fn material_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Raw material management command. Available subcommands:\n\
            `/material add` - Add a new raw material\n\
            `/material list` - List materials with stock levels (optionally only low stock)\n\
            `/material price` - Update a material's unit price\n\
            `/material stock` - Update on-hand stock and reorder threshold\n\
            `/material delete` - Delete a material no recipe uses";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new raw material to the inventory.
    #[poise::command(slash_command, rename = "add")]
    pub async fn material_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique name for the material (e.g., 'Sodium Carbonate')"] name: String,
        #[description = "Unit the material is bought in (kg, L, ml, pieces)"]
        #[autocomplete = "autocomplete::autocomplete_unit"]
        unit: String,
        #[description = "Price per unit in KSh"] price: f64,
        #[description = "Quantity on hand (defaults to 0)"] stock: Option<f64>,
        #[description = "Reorder threshold (defaults to 0)"] minimum: Option<f64>,
        #[description = "Supplier name"] supplier: Option<String>,
    ) -> Result<()> {
        let unit = match unit.parse::<UnitOfMeasure>() {
            Ok(unit) => unit,
            Err(e) => return reply_error(ctx, e).await,
        };

        let db = &ctx.data().database;
        let args = NewMaterial {
            name,
            unit,
            current_price: price,
            stock_quantity: stock.unwrap_or(0.0),
            minimum_stock: minimum.unwrap_or(0.0),
            supplier,
        };

        match material::create_material(db, args).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Added material **{}** at {} per {} ({} in stock).",
                    created.name,
                    report::format_money(created.current_price),
                    created.unit,
                    report::format_quantity(created.stock_quantity, created.unit)
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }

    /// Lists raw materials with prices and stock coverage.
    #[poise::command(slash_command, rename = "list")]
    pub async fn material_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only show materials at or below their reorder threshold"]
        low_only: Option<bool>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let low_only = low_only.unwrap_or(false);

        let materials = if low_only {
            material::get_low_stock_materials(db).await?
        } else {
            material::get_all_materials(db).await?
        };

        if materials.is_empty() {
            let message = if low_only {
                "🟢 Every material is above its reorder threshold."
            } else {
                "No raw materials have been added yet. Use `/material add` to create some!"
            };
            ctx.say(message).await?;
            return Ok(());
        }

        // Discord caps embeds at 25 fields
        let embed_fields: Vec<(String, String, bool)> = materials
            .iter()
            .take(25)
            .map(|m| {
                let status = if m.is_low_stock() { "🔴" } else { "🟢" };
                let coverage = report::calculate_stock_coverage(m.stock_quantity, m.minimum_stock);
                let field_name = format!(
                    "{status} {} ({} / {})",
                    m.name,
                    report::format_money(m.current_price),
                    m.unit
                );
                let field_value = format!(
                    "Stock: {} (min {})\n{}",
                    report::format_quantity(m.stock_quantity, m.unit),
                    report::format_quantity(m.minimum_stock, m.unit),
                    report::format_progress_bar(coverage, Some(10))
                );
                (field_name, field_value, false)
            })
            .collect();

        let mut list_embed = serenity::CreateEmbed::default()
            .title(if low_only {
                "🔴 Low Stock Materials"
            } else {
                "🧪 Raw Materials"
            })
            .color(0x0058_65F2) // Discord purple
            .fields(embed_fields);
        if materials.len() > 25 {
            list_embed = list_embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing 25 of {} materials",
                materials.len()
            )));
        }

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Updates the unit price of a raw material.
    #[poise::command(slash_command, rename = "price")]
    pub async fn material_price(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the material"]
        #[autocomplete = "autocomplete::autocomplete_material_name"]
        name: String,
        #[description = "New price per unit in KSh"] price: f64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let existing = match material::require_material_by_name(db, &name).await {
            Ok(m) => m,
            Err(e) => return reply_error(ctx, e).await,
        };

        match material::update_material_price(db, existing.id, price).await {
            Ok(updated) => {
                ctx.say(format!(
                    "✅ **{}** now costs {} per {} (was {}).",
                    updated.name,
                    report::format_money(updated.current_price),
                    updated.unit,
                    report::format_money(existing.current_price)
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }

    /// Sets the on-hand stock and, optionally, the reorder threshold of a material.
    #[poise::command(slash_command, rename = "stock")]
    pub async fn material_stock(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the material"]
        #[autocomplete = "autocomplete::autocomplete_material_name"]
        name: String,
        #[description = "Quantity now on hand"] quantity: f64,
        #[description = "New reorder threshold"] minimum: Option<f64>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let existing = match material::require_material_by_name(db, &name).await {
            Ok(m) => m,
            Err(e) => return reply_error(ctx, e).await,
        };

        match material::update_material_stock(db, existing.id, quantity, minimum).await {
            Ok(updated) => {
                let warning = if updated.is_low_stock() {
                    " ⚠️ At or below the reorder threshold."
                } else {
                    ""
                };
                ctx.say(format!(
                    "✅ **{}** stock set to {} (min {}).{warning}",
                    updated.name,
                    report::format_quantity(updated.stock_quantity, updated.unit),
                    report::format_quantity(updated.minimum_stock, updated.unit)
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }

    /// Deletes a raw material that no recipe line uses.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn material_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Name of the material to delete"]
        #[autocomplete = "autocomplete::autocomplete_material_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let existing = match material::require_material_by_name(db, &name).await {
            Ok(m) => m,
            Err(e) => return reply_error(ctx, e).await,
        };

        match material::delete_material(db, existing.id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Material **{}** deleted.", existing.name))
                    .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }
}

// Re-export all commands
pub use inner::*;

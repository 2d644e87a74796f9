//! Recipe Discord commands - `recipe set/show/remove`.
//!
//! A line is entered as a percentage of the batch, as an absolute quantity per
//! standard batch, or as a percentage together with the quantity it stands for.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, fit_message, handlers::autocomplete, reply_error},
        config::ConversionFactors,
        core::{
            material, product,
            recipe::{self, RecipeLine, RecipeQuantity},
            report,
        },
        entities::{UnitOfMeasure, product as product_entity},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Parent command for managing product formulations.
    ///
    /// Running this command by itself displays help text for its subcommands.
    #[poise::command(
        slash_command,
        rename = "recipe",
        subcommands("recipe_set", "recipe_show", "recipe_remove")
    )]
    pub async fn recipe_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Recipe management command. Available subcommands:\n\
            `/recipe set` - Add or replace a material in a product's recipe\n\
            `/recipe show` - Show a product's recipe\n\
            `/recipe remove` - Remove a material from a product's recipe";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Picks the quantity policy from the two optional arguments.
    ///
    /// A percentage alone has its quantity resolved at the standard batch; a percentage
    /// with a quantity keeps the operator's quantity for the stock checker.
    fn requested_quantity(
        product: &product_entity::Model,
        unit: UnitOfMeasure,
        percentage: Option<f64>,
        quantity: Option<f64>,
        factors: &ConversionFactors,
    ) -> Result<RecipeQuantity> {
        match (percentage, quantity) {
            (Some(percentage), None) => Ok(RecipeQuantity::from_percentage(
                product, unit, percentage, factors,
            )),
            (None, Some(quantity)) => Ok(RecipeQuantity::Absolute { quantity }),
            (Some(percentage), Some(quantity)) => Ok(RecipeQuantity::Percentage {
                percentage,
                quantity,
            }),
            (None, None) => Err(Error::invalid("give a percentage or a quantity")),
        }
    }

    fn recipe_reply(
        found: &product_entity::Model,
        lines: &[RecipeLine],
        factors: &ConversionFactors,
    ) -> Result<String> {
        let mut response = format!(
            "📋 **Recipe: {}** (standard batch {} units, {})\n\n",
            found.name, found.batch_size, found.form
        );
        for line in lines {
            let share = recipe::estimate_percentage(line, found, factors)
                .map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}%"));
            let kind = if line.recipe.is_percentage_based {
                "percentage"
            } else {
                "fixed"
            };
            write!(
                &mut response,
                "• **{}**: {} ({share}, {kind}) = {}",
                line.material.name,
                report::format_quantity(line.recipe.quantity_per_batch, line.material.unit),
                report::format_money(line.recipe.quantity_per_batch * line.material.current_price)
            )?;
            if let Some(notes) = &line.recipe.notes {
                write!(&mut response, " _{notes}_")?;
            }
            writeln!(&mut response)?;
        }
        Ok(fit_message(response))
    }

    /// Adds a material to a product's recipe, or replaces its existing line.
    #[poise::command(slash_command, rename = "set")]
    pub async fn recipe_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product the recipe belongs to"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "Raw material used"]
        #[autocomplete = "autocomplete::autocomplete_material_name"]
        material_name: String,
        #[description = "Share of the batch in percent (0-100)"] percentage: Option<f64>,
        #[description = "Quantity per standard batch in the material's unit (with a percentage: its stocked amount)"]
        quantity: Option<f64>,
        #[description = "Notes about this ingredient"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };
        let raw = match material::require_material_by_name(db, &material_name).await {
            Ok(m) => m,
            Err(e) => return reply_error(ctx, e).await,
        };

        let requested = match requested_quantity(
            &found,
            raw.unit,
            percentage,
            quantity,
            &data.settings.conversion,
        ) {
            Ok(q) => q,
            Err(e) => return reply_error(ctx, e).await,
        };

        match recipe::upsert_recipe_line(db, found.id, raw.id, requested, notes).await {
            Ok(upsert) => {
                let verb = if upsert.created { "Added" } else { "Updated" };
                ctx.say(format!(
                    "✅ {verb} **{}** in **{}**: {} {} per batch of {}.",
                    raw.name,
                    found.name,
                    upsert.line.display_quantity(),
                    raw.unit,
                    found.batch_size
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }

    /// Shows every line of a product's recipe with cost per standard batch.
    #[poise::command(slash_command, rename = "show")]
    pub async fn recipe_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to show"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };
        let lines = recipe::load_recipe_lines(db, found.id).await?;

        if lines.is_empty() {
            ctx.say(format!(
                "📋 **{}** has no recipe yet. Use `/recipe set` to add materials.",
                found.name
            ))
            .await?;
            return Ok(());
        }

        ctx.say(recipe_reply(&found, &lines, &data.settings.conversion)?)
            .await?;
        Ok(())
    }

    /// Removes a material from a product's recipe.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn recipe_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product the recipe belongs to"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "Raw material to remove"]
        #[autocomplete = "autocomplete::autocomplete_material_name"]
        material_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };
        let raw = match material::require_material_by_name(db, &material_name).await {
            Ok(m) => m,
            Err(e) => return reply_error(ctx, e).await,
        };

        match recipe::remove_recipe_line(db, found.id, raw.id).await {
            Ok(()) => {
                ctx.say(format!(
                    "🗑️ Removed **{}** from the recipe of **{}**.",
                    raw.name, found.name
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }

}

// Re-export all commands
pub use inner::*;

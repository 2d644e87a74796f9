//! Product Discord commands - `product add` and `product list`.
//!
//! Products carry the per-batch cost parameters the costing commands use.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, reply_error},
        core::{
            product::{self, NewProduct},
            report,
        },
        entities::ProductForm,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for managing finished products.
    ///
    /// Running this command by itself displays help text for its subcommands.
    #[poise::command(
        slash_command,
        rename = "product",
        subcommands("product_add", "product_list")
    )]
    pub async fn product_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Product management command. Available subcommands:\n\
            `/product add` - Add a new product\n\
            `/product list` - List all products with their cost parameters";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new product with its standard batch size and cost parameters.
    ///
    /// The product form (liquid or solid) follows the category unless `liquid` is given.
    #[poise::command(slash_command, rename = "add")]
    pub async fn product_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique name for the product (e.g., 'Premium Bar Soap')"] name: String,
        #[description = "Category (e.g., 'Laundry Powder', 'Dishwashing Liquid')"]
        category: String,
        #[description = "Standard batch size in finished units"] batch_size: f64,
        #[description = "Labor cost per standard batch in KSh (defaults to 0)"] labor: Option<f64>,
        #[description = "Overhead as a percentage of material cost (defaults to 15)"]
        overhead: Option<f64>,
        #[description = "Packaging cost per batch in KSh (defaults to 0)"] packaging: Option<f64>,
        #[description = "Profit margin percentage (defaults to 25)"] margin: Option<f64>,
        #[description = "Override the form derived from the category"] liquid: Option<bool>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let defaults = NewProduct::new(name, category, batch_size);
        let args = NewProduct {
            form: liquid.map(|l| if l { ProductForm::Liquid } else { ProductForm::Solid }),
            labor_cost_per_batch: labor.unwrap_or(defaults.labor_cost_per_batch),
            overhead_percentage: overhead.unwrap_or(defaults.overhead_percentage),
            packaging_cost: packaging.unwrap_or(defaults.packaging_cost),
            profit_margin_percentage: margin.unwrap_or(defaults.profit_margin_percentage),
            ..defaults
        };

        match product::create_product(db, args).await {
            Ok(created) => {
                ctx.say(format!(
                    "✅ Product **{}** added ({}, {}) with a standard batch of {} units.",
                    created.name, created.category, created.form, created.batch_size
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_error(ctx, e).await,
        }
    }

    /// Lists all products with their batch size and cost parameters.
    #[poise::command(slash_command, rename = "list")]
    pub async fn product_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let products = product::get_all_products(db).await?;

        if products.is_empty() {
            ctx.say("No products have been defined yet. Use `/product add` to create some!")
                .await?;
            return Ok(());
        }

        let embed_fields: Vec<(String, String, bool)> = products
            .iter()
            .take(25)
            .map(|p| {
                let field_name = format!("{} ({})", p.name, p.category);
                let field_value = format!(
                    "Batch: {} units ({})\nLabor: {} | Packaging: {}\nOverhead: {}% | Margin: {}%",
                    p.batch_size,
                    p.form,
                    report::format_money(p.labor_cost_per_batch),
                    report::format_money(p.packaging_cost),
                    p.overhead_percentage,
                    p.profit_margin_percentage
                );
                (field_name, field_value, false)
            })
            .collect();

        let list_embed = serenity::CreateEmbed::default()
            .title("**Product List**")
            .color(0x0058_65F2) // Discord purple
            .fields(embed_fields);

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

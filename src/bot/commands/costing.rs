//! Costing Discord commands - `cost`, `stock`, `compare` and `history`.
//!
//! `/cost` is the only command that records a cost analysis snapshot. The others
//! are read-only.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, fit_field, fit_message, handlers::autocomplete, reply_error},
        core::{
            analysis,
            cost::{self, CostBreakdown},
            market, product, report,
            stock::{self, StockAvailability},
        },
        entities::{cost_analysis, product as product_entity},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Snapshots shown by `/history`
    const HISTORY_SHOWN: usize = 10;

    fn cost_summary(breakdown: &CostBreakdown) -> Result<String> {
        let mut summary = String::new();
        writeln!(
            &mut summary,
            "**Materials:** {}",
            report::format_money(breakdown.material_cost)
        )?;
        writeln!(
            &mut summary,
            "**Labor:** {}",
            report::format_money(breakdown.labor_cost)
        )?;
        writeln!(
            &mut summary,
            "**Overhead:** {}",
            report::format_money(breakdown.overhead_cost)
        )?;
        writeln!(
            &mut summary,
            "**Packaging:** {}",
            report::format_money(breakdown.packaging_cost)
        )?;
        writeln!(
            &mut summary,
            "**Total:** {}",
            report::format_money(breakdown.total_cost)
        )?;
        write!(
            &mut summary,
            "**Recommended price:** {}",
            report::format_money(breakdown.recommended_price)
        )?;
        Ok(summary)
    }

    fn material_details(breakdown: &CostBreakdown) -> Result<String> {
        if breakdown.material_details.is_empty() {
            return Ok("_No recipe lines. Use `/recipe set` to add materials._".to_string());
        }
        let mut details = String::new();
        for line in &breakdown.material_details {
            let share = line
                .percentage_value
                .filter(|_| line.is_percentage)
                .map(|p| format!(" ({p}%)"))
                .unwrap_or_default();
            writeln!(
                &mut details,
                "• {}{share}: {} × {} = {}",
                line.material,
                report::format_quantity(line.quantity, line.unit),
                report::format_money(line.unit_price),
                report::format_money(line.total_cost)
            )?;
        }
        Ok(fit_field(details))
    }

    fn history_reply(
        found: &product_entity::Model,
        analyses: &[cost_analysis::Model],
    ) -> Result<String> {
        let mut response = format!("🕘 **Cost history: {}**", found.name);
        if analyses.len() > HISTORY_SHOWN {
            write!(&mut response, " (latest {HISTORY_SHOWN} of {})", analyses.len())?;
        }
        writeln!(&mut response, "\n")?;
        for analysis in analyses.iter().take(HISTORY_SHOWN) {
            writeln!(
                &mut response,
                "• {}",
                report::format_analysis_summary(analysis, Some(found))
            )?;
        }
        Ok(fit_message(response))
    }

    fn stock_summary(availability: &StockAvailability) -> Result<String> {
        let mut summary = String::new();
        if availability.can_produce {
            writeln!(&mut summary, "✅ Enough stock for this batch")?;
        } else {
            writeln!(&mut summary, "❌ Not enough stock for this batch")?;
        }
        for missing in &availability.missing_materials {
            writeln!(
                &mut summary,
                "• **{}**: need {}, have {} (short {})",
                missing.material,
                report::format_quantity(missing.required, missing.unit),
                report::format_quantity(missing.available, missing.unit),
                report::format_quantity(missing.shortage, missing.unit)
            )?;
        }
        for low in &availability.low_stock_materials {
            writeln!(
                &mut summary,
                "• ⚠️ **{}** is low: {} (min {})",
                low.material,
                report::format_quantity(low.current, low.unit),
                report::format_quantity(low.minimum, low.unit)
            )?;
        }
        Ok(fit_field(summary))
    }

    /// Calculates the cost of a production batch and records the analysis.
    ///
    /// The batch size defaults to the product's standard batch. The reply also shows
    /// whether current stock covers the batch.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cost(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to cost"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "Batch size in finished units (defaults to the standard batch)"]
        batch_size: Option<f64>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };

        let breakdown =
            match cost::calculate_product_cost(db, found.id, batch_size, &data.settings.conversion)
                .await
            {
                Ok(b) => b,
                Err(e) => return reply_error(ctx, e).await,
            };
        let availability = stock::check_stock_availability(db, found.id, batch_size).await?;
        analysis::record_cost_analysis(db, found.id, &breakdown).await?;

        let color = if availability.can_produce {
            0x0057_F287 // Green
        } else {
            0x00ED_4245 // Red
        };

        let cost_embed = serenity::CreateEmbed::default()
            .title(format!("💰 Cost Analysis: {}", breakdown.product_name))
            .description(format!(
                "Batch of {} units (scale ×{:.3})",
                breakdown.batch_size, breakdown.scale_factor
            ))
            .color(color)
            .field("Batch Cost", cost_summary(&breakdown)?, true)
            .field(
                "Per Unit",
                format!(
                    "**Cost:** {}\n**Price:** {}",
                    report::format_money(breakdown.cost_per_unit),
                    report::format_money(breakdown.price_per_unit)
                ),
                true,
            )
            .field("Materials", material_details(&breakdown)?, false)
            .field("Stock", stock_summary(&availability)?, false);

        ctx.send(poise::CreateReply::default().embed(cost_embed))
            .await?;
        Ok(())
    }

    /// Checks whether current stock covers a production batch.
    #[poise::command(slash_command, prefix_command, rename = "stock")]
    pub async fn stock_check(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to check"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "Batch size in finished units (defaults to the standard batch)"]
        batch_size: Option<f64>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };

        let availability = match stock::check_stock_availability(db, found.id, batch_size).await
        {
            Ok(a) => a,
            Err(e) => return reply_error(ctx, e).await,
        };

        let batch = batch_size.unwrap_or(found.batch_size);
        ctx.say(format!(
            "📦 **Stock check: {}** (batch of {batch} units)\n{}",
            found.name,
            stock_summary(&availability)?
        ))
        .await?;
        Ok(())
    }

    /// Compares a product's recommended price with recent competitor listings.
    #[poise::command(slash_command, prefix_command)]
    pub async fn compare(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to compare"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };

        let comparison =
            match market::compare_with_market(db, found.id, &data.settings.conversion).await {
                Ok(c) => c,
                Err(e) => return reply_error(ctx, e).await,
            };
        let breakdown = &comparison.breakdown;

        let mut listings = String::new();
        if comparison.observations.is_empty() {
            write!(
                &mut listings,
                "_No market prices matching '{}'. Try `/scrape {}`._",
                comparison.search_term, comparison.search_term
            )?;
        } else {
            for observation in &comparison.observations {
                writeln!(&mut listings, "• {}", report::format_market_summary(observation))?;
            }
        }

        let average = comparison.average_market_price().map_or_else(
            || "n/a".to_string(),
            report::format_money,
        );

        let compare_embed = serenity::CreateEmbed::default()
            .title(format!("⚖️ Market Comparison: {}", breakdown.product_name))
            .color(0x0034_98DB) // Blue color
            .field(
                "Our Price (per unit)",
                format!(
                    "**Cost:** {}\n**Recommended:** {}",
                    report::format_money(breakdown.cost_per_unit),
                    report::format_money(breakdown.price_per_unit)
                ),
                true,
            )
            .field("Average Listing", average, true)
            .field(
                format!("Listings matching '{}'", comparison.search_term),
                fit_field(listings),
                false,
            );

        ctx.send(poise::CreateReply::default().embed(compare_embed))
            .await?;
        Ok(())
    }

    /// Lists the cost analyses recorded for a product, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product whose analyses to show"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let found = match product::require_product_by_name(db, &product_name).await {
            Ok(p) => p,
            Err(e) => return reply_error(ctx, e).await,
        };
        let analyses = analysis::get_analyses_for_product(db, found.id).await?;

        if analyses.is_empty() {
            ctx.say(format!(
                "🕘 No cost analyses for **{}** yet. Run `/cost` to record one.",
                found.name
            ))
            .await?;
            return Ok(());
        }

        ctx.say(history_reply(&found, &analyses)?).await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        #![allow(clippy::unwrap_used)]
        use super::*;
        use crate::core::stock::MissingMaterial;
        use crate::entities::UnitOfMeasure;
        use crate::test_utils::product_model;

        fn snapshot(id: i64, total_cost: f64) -> cost_analysis::Model {
            cost_analysis::Model {
                id,
                product_id: 1,
                batch_size: 1000.0,
                material_cost: total_cost,
                labor_cost: 0.0,
                overhead_cost: 0.0,
                packaging_cost: 0.0,
                total_cost,
                recommended_price: total_cost * 1.25,
                calculated_at: chrono::DateTime::default(),
            }
        }

        #[test]
        fn test_history_reply_shows_latest_snapshots() {
            let soap = product_model(1, "Sunlight Bar Soap", "Laundry Bar Soap", 1000.0);

            let one = history_reply(&soap, &[snapshot(1, 400.0)]).unwrap();
            assert!(one.starts_with("🕘 **Cost history: Sunlight Bar Soap**\n\n• Sunlight Bar Soap | batch 1000"));

            let many: Vec<_> = (1..=12).map(|id| snapshot(id, 400.0)).collect();
            let reply = history_reply(&soap, &many).unwrap();
            assert!(reply.contains("(latest 10 of 12)"));
            assert_eq!(reply.matches("• ").count(), HISTORY_SHOWN);
        }

        #[test]
        fn test_stock_summary_lists_shortages() {
            let availability = StockAvailability {
                can_produce: false,
                missing_materials: vec![MissingMaterial {
                    material_id: 1,
                    material: "LABSA".to_string(),
                    unit: UnitOfMeasure::Kilogram,
                    required: 20.0,
                    available: 5.0,
                    shortage: 15.0,
                }],
                low_stock_materials: Vec::new(),
            };
            let summary = stock_summary(&availability).unwrap();
            assert!(summary.starts_with("❌"));
            assert!(summary.contains("need 20.000 kg, have 5.000 kg (short 15.000 kg)"));

            let ok = stock_summary(&StockAvailability {
                can_produce: true,
                ..StockAvailability::default()
            })
            .unwrap();
            assert_eq!(ok, "✅ Enough stock for this batch\n");
        }
    }
}

// Re-export all commands
pub use inner::*;

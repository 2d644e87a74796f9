//! General Discord commands - ping, help and the dashboard.
//! Ping and help don't touch the database; the dashboard gives an overview of the
//! whole catalog and its recent activity.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::report,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**CostingBuddy Help**\n\
        Here is a summary of all available commands for CostingBuddy.\n\n\
        **Costing Commands**\n\
        • `/cost <product> [batch_size]` - Costs a batch, checks stock and records the analysis.\n\
        • `/stock <product> [batch_size]` - Checks whether current stock covers a batch.\n\
        • `/compare <product>` - Compares our price with recent competitor listings.\n\
        • `/history <product>` - Lists the cost analyses recorded for a product.\n\
        • `/dashboard` - Shows catalog totals and recent activity.\n\n\
        **Market Commands**\n\
        • `/scrape <term> [max_results]` - Fetches competitor prices for a search term.\n\
        • `/market [limit]` - Lists the most recent competitor prices.\n\n\
        **Management Commands**\n\
        • `/material <subcommand>` - Manage raw materials (add, list, price, stock, delete).\n\
        • `/product <subcommand>` - Manage products (add, list).\n\
        • `/recipe <subcommand>` - Manage formulations (set, show, remove).\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows catalog totals, recent cost analyses and recent market prices.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let summary = report::dashboard_summary(db).await?;

        let mut analyses = String::new();
        if summary.recent_analyses.is_empty() {
            analyses.push_str("_No cost analyses yet. Run `/cost` to create one._");
        } else {
            for (analysis, product) in &summary.recent_analyses {
                writeln!(
                    &mut analyses,
                    "• {}",
                    report::format_analysis_summary(analysis, product.as_ref())
                )?;
            }
        }

        let mut prices = String::new();
        if summary.recent_market_prices.is_empty() {
            prices.push_str("_No market prices yet. Run `/scrape` to collect some._");
        } else {
            for observation in &summary.recent_market_prices {
                writeln!(&mut prices, "• {}", report::format_market_summary(observation))?;
            }
        }

        let low_stock_label = if summary.low_stock_materials == 0 {
            "🟢 0".to_string()
        } else {
            format!("🔴 {}", summary.low_stock_materials)
        };

        let dashboard_embed = serenity::CreateEmbed::default()
            .title("📊 Production Dashboard")
            .color(0x0034_98DB) // Blue color
            .field("Products", summary.total_products.to_string(), true)
            .field("Raw Materials", summary.total_materials.to_string(), true)
            .field("Low Stock", low_stock_label, true)
            .field("Recent Cost Analyses", analyses, false)
            .field("Recent Market Prices", prices, false);

        ctx.send(poise::CreateReply::default().embed(dashboard_embed))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

//! Market Discord commands - `scrape` and `market`.
//!
//! Scraping is always explicit: nothing else in the bot reaches out to the retailer.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, fit_message, reply_error},
        core::{market, report},
        entities::market_price,
        errors::{Error, Result},
        scraper::ItemSkip,
    };
    use std::fmt::Write;

    /// Upper bound on listings per scrape or listing request
    const MAX_LISTINGS: u8 = 25;

    fn scrape_reply(
        competitor: &str,
        term: &str,
        saved: &[market_price::Model],
        skipped: &[ItemSkip],
    ) -> Result<String> {
        let mut response = format!(
            "🛒 **{competitor}** results for '{term}': {} saved",
            saved.len()
        );
        if !skipped.is_empty() {
            write!(&mut response, ", {} skipped", skipped.len())?;
        }
        writeln!(&mut response, "\n")?;
        for observation in saved {
            writeln!(&mut response, "• {}", report::format_market_summary(observation))?;
        }
        for skip in skipped {
            writeln!(&mut response, "• ⚠️ Skipped: {skip}")?;
        }
        Ok(fit_message(response))
    }

    fn market_reply(observations: &[market_price::Model]) -> Result<String> {
        let mut response = String::from("🛒 **Recent Market Prices**\n\n");
        for observation in observations {
            writeln!(
                &mut response,
                "• {} ({})",
                report::format_market_summary(observation),
                observation.scraped_at.format("%Y-%m-%d %H:%M")
            )?;
        }
        Ok(fit_message(response))
    }

    /// Fetches competitor prices for a search term and stores them.
    #[poise::command(slash_command, prefix_command)]
    pub async fn scrape(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search term (e.g., 'omo 1kg')"] term: String,
        #[description = "Maximum listings to read (defaults to the configured value)"]
        #[max = 25]
        max_results: Option<u8>,
    ) -> Result<()> {
        let data = ctx.data();

        if term.trim().is_empty() {
            return reply_error(ctx, Error::invalid("search term cannot be empty")).await;
        }
        let max_results = max_results
            .map_or_else(|| data.scraper.default_max_results(), usize::from)
            .min(usize::from(MAX_LISTINGS));

        // Acknowledge command quickly
        ctx.defer().await?;

        let scrape_report = data.scraper.scrape(&term, max_results).await;
        if let Some(failure) = &scrape_report.failure {
            ctx.say(format!(
                "❌ Could not fetch prices from {} for '{term}': {failure}",
                data.scraper.competitor()
            ))
            .await?;
            return Ok(());
        }

        let saved = market::record_market_prices(&data.database, &scrape_report.listings).await?;

        let response = scrape_reply(
            data.scraper.competitor(),
            &term,
            &saved,
            &scrape_report.skipped,
        )?;
        ctx.say(response).await?;
        Ok(())
    }

    /// Lists the most recent competitor prices.
    #[poise::command(slash_command, prefix_command)]
    pub async fn market(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many prices to show (defaults to 10)"]
        #[max = 25]
        limit: Option<u8>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let limit = limit
            .map_or(market::COMPARISON_LIMIT, u64::from)
            .min(u64::from(MAX_LISTINGS));

        let observations = market::get_recent_market_prices(db, limit).await?;

        if observations.is_empty() {
            ctx.say("🛒 No market prices recorded yet. Use `/scrape` to collect some!")
                .await?;
            return Ok(());
        }

        ctx.say(market_reply(&observations)?).await?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        #![allow(clippy::unwrap_used)]
        use super::*;
        use crate::bot::MESSAGE_LIMIT;
        use crate::test_utils::market_model;

        const LONG_TITLE: &str =
            "OMO Multi Active Washing Powder Hand Wash Detergent With Stain Remover 1kg";

        fn full_page() -> Vec<market_price::Model> {
            (1..=i64::from(MAX_LISTINGS))
                .map(|id| market_model(id, LONG_TITLE, 245.0))
                .collect()
        }

        #[test]
        fn test_scrape_reply_fits_in_one_message() {
            let skipped = vec![ItemSkip::MissingPrice {
                name: LONG_TITLE.to_string(),
            }];
            let reply = scrape_reply("Jumia", "omo 1kg", &full_page(), &skipped).unwrap();

            assert!(reply.len() <= MESSAGE_LIMIT);
            assert!(reply.starts_with("🛒 **Jumia** results for 'omo 1kg': 25 saved, 1 skipped"));
            assert!(reply.ends_with('…'));
        }

        #[test]
        fn test_short_scrape_reply_is_untouched() {
            let saved = vec![market_model(1, "Omo 500g", 120.0)];
            let reply = scrape_reply("Jumia", "omo", &saved, &[]).unwrap();

            assert!(reply.starts_with("🛒 **Jumia** results for 'omo': 1 saved\n\n• Omo 500g"));
            assert!(!reply.ends_with('…'));
        }

        #[test]
        fn test_market_reply_fits_in_one_message() {
            let reply = market_reply(&full_page()).unwrap();
            assert!(reply.len() <= MESSAGE_LIMIT);
            assert!(reply.starts_with("🛒 **Recent Market Prices**"));
        }
    }
}

// Re-export all commands
pub use inner::*;

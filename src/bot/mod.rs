//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `CostingBuddy` application,
//! including all slash commands, autocomplete handlers, and bot context management.
//! Commands call into [`crate::core`] and are the only place cost analyses and
//! market prices are persisted.

/// Discord command implementations (materials, products, recipes, costing, market, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::Settings,
    errors::{Error, Result},
    scraper::JumiaScraper,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the loaded settings and the
/// market scraper that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Conversion factors and scraper tuning
    pub settings: Settings,
    /// HTTP client for competitor prices
    pub scraper: JumiaScraper,
}

impl BotData {
    /// Creates a new `BotData` instance.
    /// This is typically called during bot initialization to set up the
    /// shared context for all commands.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings, scraper: JumiaScraper) -> Self {
        Self {
            database,
            settings,
            scraper,
        }
    }
}

/// Discord rejects embed field values longer than this
pub const FIELD_LIMIT: usize = 1024;
/// Discord rejects plain messages longer than this
pub const MESSAGE_LIMIT: usize = 2000;

const TRUNCATION_MARKER: &str = "\n…";

/// Cuts `text` to at most `limit` bytes on a char boundary, marking the cut.
#[must_use]
pub fn fit_text(mut text: String, limit: usize) -> String {
    if text.len() > limit {
        let mut cut = limit.saturating_sub(TRUNCATION_MARKER.len());
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

/// [`fit_text`] for an embed field value.
#[must_use]
pub fn fit_field(text: String) -> String {
    fit_text(text, FIELD_LIMIT)
}

/// [`fit_text`] for a plain message.
#[must_use]
pub fn fit_message(text: String) -> String {
    fit_text(text, MESSAGE_LIMIT)
}

/// Text shown to the user for errors caused by their input.
///
/// Returns `None` for errors the user cannot fix, which are left to [`on_error`].
#[must_use]
pub fn user_message(error: &Error) -> Option<String> {
    match error {
        Error::Database(db_err) => {
            let text = db_err.to_string();
            (text.contains("UNIQUE") || text.contains("unique"))
                .then(|| "A record with that name already exists. Names must be unique.".to_string())
        }
        e if e.is_not_found() || e.is_invalid_input() => Some(e.to_string()),
        _ => None,
    }
}

/// Replies with the user-facing text of `error`, or hands it back to the framework.
///
/// # Errors
/// Returns `error` itself when it is not something the user can act on.
pub async fn reply_error(ctx: poise::Context<'_, BotData, Error>, error: Error) -> Result<()> {
    match user_message(&error) {
        Some(message) => {
            ctx.say(format!("❌ {message}")).await?;
            Ok(())
        }
        None => Err(error),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx
                .say("❌ Something went wrong while running that command. Please try again later.")
                .await
            {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::dashboard(),
        commands::material_manage(),
        commands::product_manage(),
        commands::recipe_manage(),
        commands::cost(),
        commands::stock_check(),
        commands::compare(),
        commands::history(),
        commands::scrape(),
        commands::market(),
    ]
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns `Framework` if the client cannot be created or the gateway connection fails.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    // Prefix commands (ping/help) need message content
    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_user_message_for_input_errors() {
        let message = user_message(&Error::InvalidBatchSize { batch_size: 0.0 });
        assert_eq!(
            message.as_deref(),
            Some("Invalid batch size: 0 (must be a positive number)")
        );

        let message = user_message(&Error::ProductNotFound {
            id: "Omo".to_string(),
        });
        assert_eq!(message.as_deref(), Some("Product not found: Omo"));

        assert!(user_message(&Error::invalid("bad")).is_some());
    }

    #[test]
    fn test_user_message_for_unique_violation() {
        let err = Error::Database(DbErr::Custom(
            "UNIQUE constraint failed: products.name".to_string(),
        ));
        assert!(user_message(&err).is_some_and(|m| m.contains("already exists")));
    }

    #[test]
    fn test_internal_errors_are_not_shown() {
        let err = Error::Database(DbErr::Custom("disk I/O error".to_string()));
        assert!(user_message(&err).is_none());
        assert!(user_message(&Error::Config { message: "x".to_string() }).is_none());
    }

    #[test]
    fn test_fit_text_respects_discord_limits() {
        assert_eq!(fit_message("short".to_string()), "short");

        let exact = "a".repeat(MESSAGE_LIMIT);
        assert_eq!(fit_message(exact.clone()), exact);

        let fitted = fit_field("é".repeat(FIELD_LIMIT));
        assert!(fitted.len() <= FIELD_LIMIT);
        assert!(fitted.ends_with('…'));

        let fitted = fit_message("• row\n".repeat(MESSAGE_LIMIT));
        assert!(fitted.len() <= MESSAGE_LIMIT);
        assert!(fitted.ends_with("\n…"));
    }

    #[test]
    fn test_all_commands_have_unique_names() {
        let commands = all_commands();
        let mut names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
        assert!(names.contains(&"cost"));
        assert!(names.contains(&"stock"));
        assert!(names.contains(&"product"));
        assert!(names.contains(&"history"));
    }
}

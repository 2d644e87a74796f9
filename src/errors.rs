//! Unified error type for the costing toolkit.
//!
//! Lookup failures and rejected input are separate variants so the calling layer
//! can tell the user what went wrong instead of surfacing a raw database error.

use thiserror::Error;

/// All errors produced by the core, the configuration loaders and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A product id or name did not resolve
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The id or name that was looked up
        id: String,
    },

    /// A raw material id or name did not resolve
    #[error("Raw material not found: {id}")]
    MaterialNotFound {
        /// The id or name that was looked up
        id: String,
    },

    /// No recipe line exists for the product/material pair
    #[error("No recipe line for product {product_id} and material {material_id}")]
    RecipeNotFound {
        /// Product side of the pair
        product_id: i64,
        /// Material side of the pair
        material_id: i64,
    },

    /// A field failed validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Which field and why
        message: String,
    },

    /// Batch size was zero, negative or not a number
    #[error("Invalid batch size: {batch_size} (must be a positive number)")]
    InvalidBatchSize {
        /// The rejected value
        batch_size: f64,
    },

    /// The material is still referenced by recipe lines
    #[error("Raw material '{name}' is used by {recipes} recipe line(s)")]
    MaterialInUse {
        /// Material name
        name: String,
        /// Number of referencing recipe lines
        recipes: u64,
    },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Building a reply string failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl Error {
    /// Shorthand for an [`Error::InvalidInput`] with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// True for errors caused by a referenced entity being absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound { .. } | Self::MaterialNotFound { .. } | Self::RecipeNotFound { .. }
        )
    }

    /// True for errors caused by rejected caller input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InvalidBatchSize { .. } | Self::MaterialInUse { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

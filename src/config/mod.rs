/// Database configuration and connection management
pub mod database;

/// Seed catalog loading from catalog.toml
pub mod catalog;

/// Conversion factors and scraper settings from config.toml
pub mod settings;

pub use settings::{ConversionFactors, ScraperSettings, Settings};

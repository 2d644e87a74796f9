//! Runtime settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine. The
//! `[conversion]` table holds the per-unit factors used to turn a percentage of a
//! batch into an absolute quantity; the `[scraper]` table tunes the market scraper.

use crate::entities::{ProductForm, UnitOfMeasure};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Top-level structure of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Batch-base estimation factors
    pub conversion: ConversionFactors,
    /// Market scraper tuning
    pub scraper: ScraperSettings,
}

/// Quantity of each unit one finished unit is assumed to contain.
///
/// The estimated batch base for a percentage line is `batch_size * factor`.
/// Only mass units depend on the product form.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversionFactors {
    /// Kilograms per finished unit of a liquid product
    pub liquid_kg_per_unit: f64,
    /// Kilograms per finished unit of a solid product
    pub solid_kg_per_unit: f64,
    /// Liters per finished unit
    pub liters_per_unit: f64,
    /// Milliliters per finished unit
    pub milliliters_per_unit: f64,
    /// Pieces per finished unit
    pub pieces_per_unit: f64,
}

impl Default for ConversionFactors {
    fn default() -> Self {
        Self {
            liquid_kg_per_unit: 1.0,
            solid_kg_per_unit: 0.02,
            liters_per_unit: 0.001,
            milliliters_per_unit: 1.0,
            pieces_per_unit: 1.0,
        }
    }
}

impl ConversionFactors {
    /// Factor for a material unit in a product of the given form.
    #[must_use]
    pub const fn factor_for(&self, unit: UnitOfMeasure, form: ProductForm) -> f64 {
        match (unit, form) {
            (UnitOfMeasure::Kilogram, ProductForm::Liquid) => self.liquid_kg_per_unit,
            (UnitOfMeasure::Kilogram, ProductForm::Solid) => self.solid_kg_per_unit,
            (UnitOfMeasure::Liter, _) => self.liters_per_unit,
            (UnitOfMeasure::Milliliter, _) => self.milliliters_per_unit,
            (UnitOfMeasure::Piece, _) => self.pieces_per_unit,
        }
    }

    /// Rejects negative or non-finite factors.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("liquid_kg_per_unit", self.liquid_kg_per_unit),
            ("solid_kg_per_unit", self.solid_kg_per_unit),
            ("liters_per_unit", self.liters_per_unit),
            ("milliliters_per_unit", self.milliliters_per_unit),
            ("pieces_per_unit", self.pieces_per_unit),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config {
                    message: format!("conversion.{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Settings for the competitor price scraper.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScraperSettings {
    /// Retailer root, used for the search endpoint and for resolving links
    pub base_url: String,
    /// Label stored with every observation
    pub competitor: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Default cap on listings per search
    pub max_results: usize,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.jumia.co.ke".to_string(),
            competitor: "Jumia".to_string(),
            timeout_secs: 10,
            max_results: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// Parses settings from TOML text and validates the conversion factors.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })?;
    settings.conversion.validate()?;
    Ok(settings)
}

/// Loads settings from a TOML file, falling back to defaults when it does not exist.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No settings file at {path:?}, using defaults");
        return Ok(Settings::default());
    }
    debug!("Loading settings from {path:?}");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {path:?}: {e}"),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `CONFIG_PATH`, or `./config.toml` when unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}

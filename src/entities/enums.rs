//! Enumerated columns shared by several entities.
//!
//! Both enums are stored as short text values so the database stays readable
//! with any SQLite client.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit a raw material is bought, stocked and priced in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum UnitOfMeasure {
    /// Kilograms
    #[sea_orm(string_value = "kg")]
    #[serde(rename = "kg")]
    Kilogram,
    /// Liters
    #[sea_orm(string_value = "L")]
    #[serde(rename = "L")]
    Liter,
    /// Milliliters
    #[sea_orm(string_value = "ml")]
    #[serde(rename = "ml")]
    Milliliter,
    /// Individual pieces
    #[sea_orm(string_value = "pieces")]
    #[serde(rename = "pieces")]
    Piece,
}

impl UnitOfMeasure {
    /// Every supported unit, in display order.
    pub const ALL: [Self; 4] = [Self::Kilogram, Self::Liter, Self::Milliliter, Self::Piece];

    /// Short label used in storage and in chat output.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Liter => "L",
            Self::Milliliter => "ml",
            Self::Piece => "pieces",
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for UnitOfMeasure {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(Self::Kilogram),
            "l" | "liter" | "liters" | "litre" | "litres" => Ok(Self::Liter),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Ok(Self::Milliliter)
            }
            "pieces" | "piece" | "pcs" | "pc" | "units" => Ok(Self::Piece),
            other => Err(crate::errors::Error::invalid(format!(
                "unknown unit '{other}' (expected kg, L, ml or pieces)"
            ))),
        }
    }
}

/// Physical form of a finished product.
///
/// Consulted by the conversion-factor lookup when a percentage of a mass-unit
/// material is turned into an absolute quantity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ProductForm {
    /// Poured products; one finished unit weighs about one mass unit
    #[sea_orm(string_value = "liquid")]
    Liquid,
    /// Powders, bars and other solids
    #[default]
    #[sea_orm(string_value = "solid")]
    Solid,
}

impl ProductForm {
    /// Classifies a free-text category name.
    ///
    /// A category is liquid when its name contains `Liquid` (case-sensitive),
    /// which keeps existing catalogs costing the same numbers.
    #[must_use]
    pub fn classify(category: &str) -> Self {
        if category.contains("Liquid") {
            Self::Liquid
        } else {
            Self::Solid
        }
    }
}

impl fmt::Display for ProductForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Liquid => f.write_str("liquid"),
            Self::Solid => f.write_str("solid"),
        }
    }
}

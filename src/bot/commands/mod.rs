//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Cost calculation, stock check and market comparison commands
pub mod costing;

/// General utility commands
pub mod general;

/// Competitor price scraping and history commands
pub mod market;

/// Raw material management commands
pub mod material;

/// Product management commands
pub mod product;

/// Recipe line management commands
pub mod recipe;

// Export commands
pub use costing::*;
pub use general::*;
pub use market::*;
pub use material::*;
pub use product::*;
pub use recipe::*;

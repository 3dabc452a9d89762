//! Bagquote
//!
//! Bagquote prices custom-printed bags. Quantity tiers discount the unit price,
//! print tiers add a per-item charge for the chosen number of colors, and both can
//! be overridden per product category.

pub mod config;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod quote;
pub mod resolver;
pub mod rules;
pub mod store;
pub mod tiers;

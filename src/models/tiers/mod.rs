//! Quantity discount tiers
//!
//! Resolves the price multiplier for an order quantity from the discount
//! ladder, with per-size overrides taking precedence, and previews the next
//! threshold a customer could reach.

pub mod resolver;

pub use resolver::*;

//! # Sticker-Pricing: Custom-Size Sticker Quoting Engine
//!
//! `sticker-pricing` quotes a total price for any sticker size and order quantity. It
//! reproduces a table of known reference prices exactly and extrapolates smoothly to
//! every other size, while applying a published bulk-discount ladder.
//!
//! ## Core Features
//!
//! - **Anchor Calibration**: Per-area prices backed out of known quotes, averaged per size
//! - **Power-Law Curve**: Log-log least squares fit for sizes never quoted before
//! - **Discount Ladder**: Quantity tiers with a strict lower-tier tie-break
//! - **Size Overrides**: Hand-pinned factors for exact size and quantity pairs
//!
//! ## Quick Start
//!
//! ```rust
//! use sticker_pricing::{default_configs, PricingEngine};
//!
//! let engine = PricingEngine::new(default_configs::sticker_shop())?;
//!
//! let quote = engine.quote(50.0, 50.0, 50.0);
//! assert_eq!(quote.total, 82.00);
//!
//! // One unit short of the 100 tier still pays the 50-unit rate
//! let quote = engine.quote(50.0, 50.0, 99.0);
//! assert_eq!(quote.factor_used, 1.0);
//! assert_eq!(quote.next_tier.map(|t| t.add_more), Some(1));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Rule Precedence
//!
//! For the discount factor:
//! 1. Size override for the exact size and quantity (including factors pinned on anchors)
//! 2. Discount ladder under the configured tie-break
//!
//! For the per-area price:
//! 1. Exact-size cache (mean of every anchor at that size)
//! 2. Fitted power-law curve, clamped to the configured band
//!
//! ## Lifecycle
//!
//! Derivation happens once, in [`derive_price_model`] (or [`PricingEngine::new`]). The
//! resulting model is immutable, `Send + Sync`, and every [`quote`] call is a pure function
//! of its arguments.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod calibration;
pub mod models;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::Result;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Reference data and configuration
pub use calibration::{
    config::{CatalogConfig, PriceClamp, PricingConfig, SupportedBounds},
    ingest::{load_anchors_csv, read_anchors},
    pipeline::{derive_price_model, DerivedPriceModel},
    types::{
        AnchorObservation, DiscountLadder, LadderTier, SizeKey, SizeOverride, SizeOverrideTable,
        TieBreak,
    },
};

// Curve, tiers and quotes
pub use models::{
    power_law::{CurveShape, FitDiagnostics, PowerLawCurve},
    quote::{price_grid, quote, NextTier, Quote},
    tiers::{ladder_factor, next_tier, resolve_factor},
    traits::PriceCurve,
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-built pricing configurations.
///
/// # Available Configurations
///
/// - [`sticker_shop()`]: Storefront reference tables
/// - [`minimal()`]: Flat fallback rate, no discounts
pub mod default_configs {
    use crate::calibration::config::PricingConfig;

    /// Storefront reference tables.
    ///
    /// **Characteristics:**
    /// - Reference quantity: 50
    /// - Sizes 20–1000 mm, quantities 10–200,000
    /// - Twelve anchors from 50×50 mm to 200×200 mm (50×50 @ 50 = 82.00)
    /// - Twelve ladder tiers from 50 (no discount) to 20,000 (86.5% off)
    /// - Per-area price clamped to [40, 1200] per m²
    ///
    /// # Example
    ///
    /// ```rust
    /// use sticker_pricing::default_configs;
    ///
    /// let config = default_configs::sticker_shop();
    /// assert_eq!(config.reference_quantity, 50);
    /// ```
    pub fn sticker_shop() -> PricingConfig {
        PricingConfig::sticker_shop()
    }

    /// No anchors and an empty ladder.
    ///
    /// Every size is priced at the fallback per-area rate with no quantity
    /// discount. Useful as a base for synthetic tables in tests.
    pub fn minimal() -> PricingConfig {
        PricingConfig::minimal()
    }
}

/// Configuration paired with the model derived from it.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
    model: DerivedPriceModel,
}

impl PricingEngine {
    /// Validate `config` and derive its price model.
    ///
    /// # Errors
    ///
    /// * `anyhow::Error` if the configuration fails [`PricingConfig::validate`]
    pub fn new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        let model = derive_price_model(&config);
        Ok(Self { config, model })
    }

    /// Load a TOML configuration file and build the engine.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::new(PricingConfig::from_toml_file(path)?)
    }

    /// Quote `quantity` stickers of `width_mm` × `height_mm`. Never fails.
    pub fn quote(&self, width_mm: f64, height_mm: f64, quantity: f64) -> Quote {
        quote(&self.model, width_mm, height_mm, quantity)
    }

    /// Quote every catalog size against every catalog quantity.
    pub fn standard_grid(&self) -> Vec<Quote> {
        price_grid(
            &self.model,
            &self.config.catalog.standard_sizes(),
            &self.config.catalog.quantities,
        )
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn model(&self) -> &DerivedPriceModel {
        &self.model
    }
}

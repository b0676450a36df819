use crate::calibration::types::{
    AnchorObservation, DiscountLadder, SizeKey, SizeOverrideTable, TieBreak,
};
use crate::models::utils::is_discount_factor;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inclusive input ranges a quote is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SupportedBounds {
    /// Width range in millimetres
    pub width_mm: (u32, u32),
    /// Height range in millimetres
    pub height_mm: (u32, u32),
    /// Order quantity range
    pub quantity: (u32, u32),
}

impl Default for SupportedBounds {
    fn default() -> Self {
        Self {
            width_mm: (20, 1000),
            height_mm: (20, 1000),
            quantity: (10, 200_000),
        }
    }
}

/// Band the fitted per-area price is clamped into (currency per m²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceClamp {
    pub min: f64,
    pub max: f64,
}

impl Default for PriceClamp {
    fn default() -> Self {
        Self {
            min: 40.0,
            max: 1200.0,
        }
    }
}

impl PriceClamp {
    pub fn apply(&self, price_per_area: f64) -> f64 {
        price_per_area.max(self.min).min(self.max)
    }
}

/// Preset sizes and quantities offered by the storefront dropdowns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogConfig {
    /// Side lengths of the standard square sizes, in millimetres
    pub sizes_mm: Vec<u32>,
    /// Standard order quantities
    pub quantities: Vec<u32>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            sizes_mm: vec![50, 75, 100, 125],
            quantities: vec![
                50, 100, 200, 300, 500, 1000, 2000, 3000, 5000, 10_000, 15_000, 20_000,
            ],
        }
    }
}

impl CatalogConfig {
    pub fn standard_sizes(&self) -> Vec<SizeKey> {
        self.sizes_mm
            .iter()
            .map(|&side| SizeKey::new(side, side))
            .collect()
    }
}

/// Everything the engine needs at construction time.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Baseline order size the per-area price is normalised against
    #[serde(default = "default_reference_quantity")]
    pub reference_quantity: u32,

    /// Ladder policy for quantities between two thresholds.
    ///
    /// Only [`TieBreak::Lower`] reproduces the published storefront ladder;
    /// the other policies change every price strictly between thresholds.
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Per-area price used when no anchor yields a usable point
    #[serde(default = "default_fallback_price_per_area")]
    pub fallback_price_per_area: f64,

    #[serde(default)]
    pub bounds: SupportedBounds,

    #[serde(default)]
    pub price_per_area_clamp: PriceClamp,

    #[serde(default)]
    pub anchors: Vec<AnchorObservation>,

    #[serde(default)]
    pub ladder: DiscountLadder,

    #[serde(default)]
    pub size_overrides: SizeOverrideTable,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

/// Reference anchors for the storefront: (width, height, quantity, total, pinned factor).
const STICKER_SHOP_ANCHORS: &[(u32, u32, u32, f64, Option<f64>)] = &[
    (50, 50, 50, 82.00, None),
    (50, 50, 100, 131.20, None),
    (50, 50, 500, 352.60, Some(0.43)),
    (75, 75, 50, 128.00, None),
    (75, 75, 200, 317.44, None),
    (75, 75, 3000, 1804.80, Some(0.235)),
    (100, 50, 50, 118.00, None),
    (100, 100, 50, 179.00, None),
    (100, 100, 1000, 1217.20, None),
    (125, 125, 50, 236.00, None),
    (125, 125, 300, 778.80, None),
    (200, 200, 50, 489.00, None),
];

const STICKER_SHOP_LADDER: &[(u32, f64)] = &[
    (50, 1.0),
    (100, 0.80),
    (200, 0.62),
    (300, 0.55),
    (500, 0.45),
    (1000, 0.34),
    (2000, 0.27),
    (3000, 0.24),
    (5000, 0.20),
    (10_000, 0.16),
    (15_000, 0.145),
    (20_000, 0.135),
];

const STICKER_SHOP_OVERRIDES: &[(u32, u32, u32, f64)] =
    &[(50, 50, 500, 0.43), (50, 50, 1000, 0.33)];

impl PricingConfig {
    /// Storefront reference tables: twelve anchors, a twelve-step ladder and
    /// hand-tuned factors for the 50×50 mm size.
    pub fn sticker_shop() -> Self {
        let anchors = STICKER_SHOP_ANCHORS
            .iter()
            .map(|&(width, height, quantity, total, factor)| AnchorObservation {
                width,
                height,
                quantity,
                total,
                factor_override: factor,
            })
            .collect();

        let mut size_overrides = SizeOverrideTable::new();
        for &(width, height, quantity, factor) in STICKER_SHOP_OVERRIDES {
            size_overrides.insert(SizeKey::new(width, height), quantity, factor);
        }

        Self {
            reference_quantity: default_reference_quantity(),
            tie_break: TieBreak::Lower,
            fallback_price_per_area: default_fallback_price_per_area(),
            bounds: SupportedBounds::default(),
            price_per_area_clamp: PriceClamp::default(),
            anchors,
            ladder: DiscountLadder::new(STICKER_SHOP_LADDER.iter().copied()),
            size_overrides,
            catalog: CatalogConfig::default(),
        }
    }

    /// No anchors and no discounts: every size is priced at the fallback rate.
    pub fn minimal() -> Self {
        Self {
            reference_quantity: default_reference_quantity(),
            tie_break: TieBreak::Lower,
            fallback_price_per_area: default_fallback_price_per_area(),
            bounds: SupportedBounds::default(),
            price_per_area_clamp: PriceClamp::default(),
            anchors: Vec::new(),
            ladder: DiscountLadder::default(),
            size_overrides: SizeOverrideTable::new(),
            catalog: CatalogConfig::default(),
        }
    }

    /// Parse a TOML document. Omitted sections take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("invalid pricing config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read pricing config {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("failed to load pricing config {}", path.display()))
    }

    /// Reject tables that would make quotes meaningless.
    ///
    /// Anchors are not checked here: a malformed anchor is dropped during
    /// derivation instead of failing the whole configuration.
    pub fn validate(&self) -> Result<()> {
        if self.reference_quantity == 0 {
            return Err(anyhow!("reference_quantity must be > 0"));
        }

        check_range("bounds.width_mm", self.bounds.width_mm)?;
        check_range("bounds.height_mm", self.bounds.height_mm)?;
        check_range("bounds.quantity", self.bounds.quantity)?;

        let clamp = self.price_per_area_clamp;
        if !(clamp.min.is_finite() && clamp.max.is_finite()) || clamp.min <= 0.0 {
            return Err(anyhow!(
                "price_per_area_clamp must be finite with min > 0, got [{}, {}]",
                clamp.min,
                clamp.max
            ));
        }
        if clamp.min > clamp.max {
            return Err(anyhow!(
                "price_per_area_clamp min ({}) exceeds max ({})",
                clamp.min,
                clamp.max
            ));
        }

        if !self.fallback_price_per_area.is_finite() || self.fallback_price_per_area <= 0.0 {
            return Err(anyhow!(
                "fallback_price_per_area must be > 0 and finite, got {}",
                self.fallback_price_per_area
            ));
        }

        for (&threshold, &factor) in self.ladder.tiers() {
            check_factor(factor)
                .with_context(|| format!("ladder tier at quantity {}", threshold))?;
        }

        for (size, quantity, factor) in self.size_overrides.entries() {
            if size.width == 0 || size.height == 0 {
                return Err(anyhow!("size override {} has a zero dimension", size));
            }
            check_factor(factor)
                .with_context(|| format!("size override {} at quantity {}", size, quantity))?;
        }

        Ok(())
    }
}

fn check_range(name: &str, (min, max): (u32, u32)) -> Result<()> {
    if min == 0 {
        return Err(anyhow!("{} minimum must be > 0", name));
    }
    if min > max {
        return Err(anyhow!("{} is inverted: [{}, {}]", name, min, max));
    }
    Ok(())
}

fn check_factor(factor: f64) -> Result<()> {
    if !is_discount_factor(factor) {
        return Err(anyhow!("discount factor must be in (0, 1], got {}", factor));
    }
    Ok(())
}

fn default_reference_quantity() -> u32 {
    50
}

fn default_fallback_price_per_area() -> f64 {
    300.0
}

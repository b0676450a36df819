use std::collections::HashMap;

use tracing::{debug, warn};

use crate::calibration::config::{PricingConfig, SupportedBounds};
use crate::calibration::types::{
    AnchorObservation, DiscountLadder, SizeKey, SizeOverrideTable, TieBreak,
};
use crate::models::power_law::{fit_power_law, FitDiagnostics, PowerLawCurve};
use crate::models::quote::NextTier;
use crate::models::tiers::{next_tier, resolve_factor};
use crate::models::traits::PriceCurve;
use crate::models::utils::is_discount_factor;

/// Running mean of per-area prices observed at one size.
#[derive(Debug, Clone, Copy)]
struct RunningMean {
    mean: f64,
    count: u32,
}

impl RunningMean {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
    }
}

/// Per-area price implied by one anchor, before filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedPoint {
    pub size: SizeKey,
    pub area_m2: f64,
    /// Factor the anchor's total was assumed to include
    pub factor: f64,
    pub price_per_area: f64,
}

impl ImpliedPoint {
    /// Positive area, a discount factor in (0, 1] and a finite positive price.
    pub fn is_usable(&self) -> bool {
        self.area_m2 > 0.0
            && is_discount_factor(self.factor)
            && self.price_per_area.is_finite()
            && self.price_per_area > 0.0
    }
}

/// Back out the reference-quantity price per m² an anchor implies.
///
/// The factor is the anchor's own override, else the configured size
/// override for that size and quantity, else the ladder factor.
pub fn implied_point(anchor: &AnchorObservation, config: &PricingConfig) -> ImpliedPoint {
    let size = anchor.size_key();
    let area_m2 = size.area_m2();
    let factor = anchor.factor_override.unwrap_or_else(|| {
        resolve_factor(
            anchor.quantity,
            size,
            &config.ladder,
            &config.size_overrides,
            config.tie_break,
        )
    });

    let reference_quantity = config.reference_quantity as f64;
    let base = anchor.total / (factor * (anchor.quantity as f64 / reference_quantity));
    let price_per_area = base / (area_m2 * reference_quantity);

    ImpliedPoint {
        size,
        area_m2,
        factor,
        price_per_area,
    }
}

/// Immutable price model derived once from a [`PricingConfig`].
///
/// Holds everything a quote needs, so it can be shared across threads and
/// queried without further access to the configuration.
#[derive(Debug, Clone)]
pub struct DerivedPriceModel {
    reference_quantity: u32,
    bounds: SupportedBounds,
    tie_break: TieBreak,
    ladder: DiscountLadder,
    overrides: SizeOverrideTable,
    exact_sizes: HashMap<SizeKey, f64>,
    curve: PowerLawCurve,
    diagnostics: FitDiagnostics,
}

impl DerivedPriceModel {
    pub fn reference_quantity(&self) -> u32 {
        self.reference_quantity
    }

    pub fn bounds(&self) -> SupportedBounds {
        self.bounds
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn ladder(&self) -> &DiscountLadder {
        &self.ladder
    }

    /// Configured size overrides merged with anchor-pinned factors.
    pub fn overrides(&self) -> &SizeOverrideTable {
        &self.overrides
    }

    pub fn curve(&self) -> &PowerLawCurve {
        &self.curve
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    /// Averaged per-area price for a size that appears among the anchors.
    pub fn exact_price_per_area(&self, size: SizeKey) -> Option<f64> {
        self.exact_sizes.get(&size).copied()
    }

    /// Sizes with an exact-size cache entry, sorted.
    pub fn anchored_sizes(&self) -> Vec<SizeKey> {
        let mut sizes: Vec<SizeKey> = self.exact_sizes.keys().copied().collect();
        sizes.sort();
        sizes
    }

    /// Exact-size cache first, fitted curve otherwise.
    pub fn price_per_area(&self, size: SizeKey) -> f64 {
        self.exact_price_per_area(size)
            .unwrap_or_else(|| self.curve.price_per_area(size.area_m2()))
    }

    pub fn resolve_factor(&self, size: SizeKey, quantity: u32) -> f64 {
        resolve_factor(quantity, size, &self.ladder, &self.overrides, self.tie_break)
    }

    pub fn next_tier(&self, size: SizeKey, quantity: u32) -> Option<NextTier> {
        next_tier(quantity, size, &self.ladder, &self.overrides)
    }
}

/// Derive the price model from reference data.
///
/// Pure and infallible: anchors that do not yield a finite positive per-area
/// price, or whose pinned factor lies outside (0, 1], are dropped with a
/// warning. An anchor table with no usable rows falls back to a constant curve.
pub fn derive_price_model(config: &PricingConfig) -> DerivedPriceModel {
    let mut exact: HashMap<SizeKey, RunningMean> = HashMap::new();
    let mut fit_points: Vec<(f64, f64)> = Vec::with_capacity(config.anchors.len());
    let mut pinned: Vec<(SizeKey, u32, f64)> = Vec::new();
    let mut dropped = 0usize;

    for anchor in &config.anchors {
        let point = implied_point(anchor, config);
        if !point.is_usable() {
            warn!(
                size = %point.size,
                quantity = anchor.quantity,
                total = anchor.total,
                factor = point.factor,
                price_per_area = point.price_per_area,
                "dropping anchor without a usable factor and per-area price"
            );
            dropped += 1;
            continue;
        }

        exact
            .entry(point.size)
            .or_insert(RunningMean { mean: 0.0, count: 0 })
            .push(point.price_per_area);
        fit_points.push((point.area_m2, point.price_per_area));
        if anchor.factor_override.is_some() {
            pinned.push((point.size, anchor.quantity, point.factor));
        }
    }

    let (curve, mut diagnostics) = fit_power_law(
        &fit_points,
        config.price_per_area_clamp,
        config.fallback_price_per_area,
    );
    diagnostics.points_dropped = dropped;

    debug!(
        points_used = diagnostics.points_used,
        points_dropped = diagnostics.points_dropped,
        slope = diagnostics.slope,
        intercept = diagnostics.intercept,
        r_squared = ?diagnostics.r_squared,
        exact_sizes = exact.len(),
        "derived price model"
    );

    DerivedPriceModel {
        reference_quantity: config.reference_quantity,
        bounds: config.bounds,
        tie_break: config.tie_break,
        ladder: config.ladder.clone(),
        overrides: effective_overrides(config, pinned),
        exact_sizes: exact
            .into_iter()
            .map(|(size, running)| (size, running.mean))
            .collect(),
        curve,
        diagnostics,
    }
}

/// Configured size overrides plus the factors pinned on accepted anchors.
///
/// An anchor override is authoritative for its exact size and quantity, so it
/// replaces a configured override for the same pair.
fn effective_overrides(
    config: &PricingConfig,
    pinned: Vec<(SizeKey, u32, f64)>,
) -> SizeOverrideTable {
    let mut overrides = config.size_overrides.clone();
    for (size, quantity, factor) in pinned {
        overrides.insert(size, quantity, factor);
    }
    overrides
}

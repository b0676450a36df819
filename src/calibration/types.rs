use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Composite `(width, height)` key in millimetres.
///
/// Orientation is significant: a 100×50 sticker and a 50×100 sticker are
/// distinct sizes with their own cache entries and overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SizeKey {
    pub width: u32,
    pub height: u32,
}

impl SizeKey {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Printable area in square metres.
    pub fn area_m2(&self) -> f64 {
        (self.width as f64 / 1000.0) * (self.height as f64 / 1000.0)
    }
}

impl fmt::Display for SizeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}mm", self.width, self.height)
    }
}

/// A known-correct price for one exact size and quantity.
///
/// Anchors calibrate the per-area price model. When `factor_override` is set
/// it is the discount factor that applied to this exact triple, taking
/// precedence over both the size overrides and the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorObservation {
    /// Width in millimetres
    pub width: u32,
    /// Height in millimetres
    pub height: u32,
    /// Order quantity the total was quoted for
    pub quantity: u32,
    /// Observed total price for the whole order
    pub total: f64,
    /// Discount factor that produced `total`, if it was set by hand
    #[serde(default)]
    pub factor_override: Option<f64>,
}

impl AnchorObservation {
    pub fn new(width: u32, height: u32, quantity: u32, total: f64) -> Self {
        Self {
            width,
            height,
            quantity,
            total,
            factor_override: None,
        }
    }

    /// Same anchor with a pinned discount factor.
    pub fn with_factor_override(mut self, factor: f64) -> Self {
        self.factor_override = Some(factor);
        self
    }

    pub fn size_key(&self) -> SizeKey {
        SizeKey::new(self.width, self.height)
    }
}

/// How a quantity strictly between two ladder thresholds is priced.
///
/// `Lower` is the storefront policy. `Upper` and `Nearest` exist for
/// experimenting with alternative ladders and must be opted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// The lower tier applies; the next discount is earned only at its threshold.
    #[default]
    Lower,
    /// The higher tier applies as soon as the lower threshold is passed.
    Upper,
    /// The closer threshold applies; equidistant quantities take the lower tier.
    Nearest,
}

/// One row of a discount ladder as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LadderTier {
    pub quantity: u32,
    pub factor: f64,
}

/// Step function from order quantity to a price multiplier.
///
/// Factors are multipliers on the reference-quantity price: `1.0` means no
/// discount and smaller values mean deeper discounts. Correct pricing relies on
/// factors being non-increasing as the threshold grows; this is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LadderTier>", into = "Vec<LadderTier>")]
pub struct DiscountLadder {
    tiers: BTreeMap<u32, f64>,
}

impl DiscountLadder {
    /// Build from `(threshold, factor)` pairs; a repeated threshold keeps the last factor.
    pub fn new<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        Self {
            tiers: tiers.into_iter().collect(),
        }
    }

    /// Thresholds in ascending order with their factors.
    pub fn tiers(&self) -> &BTreeMap<u32, f64> {
        &self.tiers
    }

    /// Factor at an exact threshold.
    pub fn factor_at(&self, threshold: u32) -> Option<f64> {
        self.tiers.get(&threshold).copied()
    }

    pub fn thresholds(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Configuration rows must name each threshold once.
impl TryFrom<Vec<LadderTier>> for DiscountLadder {
    type Error = String;

    fn try_from(rows: Vec<LadderTier>) -> Result<Self, Self::Error> {
        let mut tiers = BTreeMap::new();
        for row in rows {
            if tiers.insert(row.quantity, row.factor).is_some() {
                return Err(format!("duplicate ladder threshold {}", row.quantity));
            }
        }
        Ok(Self { tiers })
    }
}

impl From<DiscountLadder> for Vec<LadderTier> {
    fn from(ladder: DiscountLadder) -> Self {
        ladder
            .tiers
            .into_iter()
            .map(|(quantity, factor)| LadderTier { quantity, factor })
            .collect()
    }
}

/// One pinned factor for an exact size and quantity, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeOverride {
    pub width: u32,
    pub height: u32,
    pub quantity: u32,
    pub factor: f64,
}

/// Manual discount exceptions keyed by exact size, then exact quantity.
///
/// Lookups never interpolate: a size override applies only to the quantity it
/// names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SizeOverride>", into = "Vec<SizeOverride>")]
pub struct SizeOverrideTable {
    by_size: HashMap<SizeKey, BTreeMap<u32, f64>>,
}

impl SizeOverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `factor` for `size` at `quantity`, replacing any previous entry.
    pub fn insert(&mut self, size: SizeKey, quantity: u32, factor: f64) {
        self.by_size.entry(size).or_default().insert(quantity, factor);
    }

    pub fn get(&self, size: SizeKey, quantity: u32) -> Option<f64> {
        self.by_size
            .get(&size)
            .and_then(|factors| factors.get(&quantity))
            .copied()
    }

    /// All pinned quantities for one size.
    pub fn for_size(&self, size: SizeKey) -> Option<&BTreeMap<u32, f64>> {
        self.by_size.get(&size)
    }

    /// Every `(size, quantity, factor)` entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (SizeKey, u32, f64)> + '_ {
        self.by_size.iter().flat_map(|(&size, factors)| {
            factors
                .iter()
                .map(move |(&quantity, &factor)| (size, quantity, factor))
        })
    }

    /// Number of pinned `(size, quantity)` pairs.
    pub fn len(&self) -> usize {
        self.by_size.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Configuration rows must pin each `(size, quantity)` pair once.
impl TryFrom<Vec<SizeOverride>> for SizeOverrideTable {
    type Error = String;

    fn try_from(rows: Vec<SizeOverride>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for row in rows {
            let size = SizeKey::new(row.width, row.height);
            if table.get(size, row.quantity).is_some() {
                return Err(format!(
                    "duplicate size override {} at quantity {}",
                    size, row.quantity
                ));
            }
            table.insert(size, row.quantity, row.factor);
        }
        Ok(table)
    }
}

impl From<SizeOverrideTable> for Vec<SizeOverride> {
    fn from(table: SizeOverrideTable) -> Self {
        let mut rows: Vec<SizeOverride> = table
            .entries()
            .map(|(size, quantity, factor)| SizeOverride {
                width: size.width,
                height: size.height,
                quantity,
                factor,
            })
            .collect();
        rows.sort_by_key(|row| (row.width, row.height, row.quantity));
        rows
    }
}

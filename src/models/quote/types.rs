use serde::{Deserialize, Serialize};

/// Preview of the next discount threshold above the quoted quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTier {
    /// Ladder threshold being previewed
    pub threshold: u32,
    /// Additional units needed to reach it
    pub add_more: u32,
    /// Whole-percent discount that applies once reached
    pub next_save_percent: u32,
}

/// Price quote for one size and quantity.
///
/// Dimensions and quantity are the post-clamp values actually priced.
/// `total` and `unit_price` are rounded to cents, `price_per_area` to four
/// decimals; `factor_used` is reported as resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub width: u32,
    pub height: u32,
    pub quantity: u32,
    pub total: f64,
    pub unit_price: f64,
    /// Currency per square metre
    pub price_per_area: f64,
    /// Price multiplier in (0, 1]; 1.0 is the undiscounted reference price
    pub factor_used: f64,
    pub save_percent: u32,
    pub next_tier: Option<NextTier>,
}

impl Quote {
    /// All-zero quote returned instead of dividing by a zero quantity.
    ///
    /// The factor is `1.0`, matching a `save_percent` of zero.
    pub fn zero(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            quantity: 0,
            total: 0.0,
            unit_price: 0.0,
            price_per_area: 0.0,
            factor_used: 1.0,
            save_percent: 0,
            next_tier: None,
        }
    }

    /// True for the zero-quantity placeholder quote.
    pub fn is_zero(&self) -> bool {
        self.quantity == 0
    }
}

use std::ops::Bound;

use crate::calibration::types::{DiscountLadder, SizeKey, SizeOverrideTable, TieBreak};
use crate::models::quote::NextTier;
use crate::models::utils::save_percent;

/// Factor applied when the ladder has no tiers at all.
pub const NO_DISCOUNT: f64 = 1.0;

/// Ladder factor for `quantity` under `tie_break`.
///
/// Quantities at or below the first threshold take the first factor, at or
/// above the last threshold the last factor. A quantity exactly on a
/// threshold always takes that threshold's factor; only quantities strictly
/// between two thresholds consult the tie-break.
pub fn ladder_factor(quantity: u32, ladder: &DiscountLadder, tie_break: TieBreak) -> f64 {
    let tiers = ladder.tiers();
    let (Some((&first_q, &first_f)), Some((&last_q, &last_f))) =
        (tiers.first_key_value(), tiers.last_key_value())
    else {
        return NO_DISCOUNT;
    };

    if quantity <= first_q {
        return first_f;
    }
    if quantity >= last_q {
        return last_f;
    }

    let below = tiers.range(..=quantity).next_back();
    let above = tiers
        .range((Bound::Excluded(quantity), Bound::Unbounded))
        .next();

    match (below, above) {
        (Some((&lo_q, &lo_f)), Some((&hi_q, &hi_f))) => {
            if lo_q == quantity {
                return lo_f;
            }
            match tie_break {
                TieBreak::Lower => lo_f,
                TieBreak::Upper => hi_f,
                TieBreak::Nearest => {
                    if quantity - lo_q <= hi_q - quantity {
                        lo_f
                    } else {
                        hi_f
                    }
                }
            }
        }
        // Unreachable once the range checks above pass
        (Some((_, &lo_f)), None) => lo_f,
        (None, Some((_, &hi_f))) => hi_f,
        (None, None) => NO_DISCOUNT,
    }
}

/// Discount factor for `size` at `quantity`.
///
/// An exact size override wins verbatim; otherwise the ladder applies.
pub fn resolve_factor(
    quantity: u32,
    size: SizeKey,
    ladder: &DiscountLadder,
    overrides: &SizeOverrideTable,
    tie_break: TieBreak,
) -> f64 {
    overrides
        .get(size, quantity)
        .unwrap_or_else(|| ladder_factor(quantity, ladder, tie_break))
}

/// The first ladder threshold strictly above `quantity`, if any.
///
/// The preview factor honours a size override pinned at that threshold.
pub fn next_tier(
    quantity: u32,
    size: SizeKey,
    ladder: &DiscountLadder,
    overrides: &SizeOverrideTable,
) -> Option<NextTier> {
    let (&threshold, &ladder_f) = ladder
        .tiers()
        .range((Bound::Excluded(quantity), Bound::Unbounded))
        .next()?;

    let factor = overrides.get(size, threshold).unwrap_or(ladder_f);
    Some(NextTier {
        threshold,
        add_more: threshold - quantity,
        next_save_percent: save_percent(factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> DiscountLadder {
        DiscountLadder::new([(50, 1.0), (100, 0.8), (200, 0.62), (500, 0.45)])
    }

    #[test]
    fn test_lower_tie_break_at_boundaries() {
        let ladder = ladder();
        assert_eq!(ladder_factor(10, &ladder, TieBreak::Lower), 1.0);
        assert_eq!(ladder_factor(50, &ladder, TieBreak::Lower), 1.0);
        assert_eq!(ladder_factor(99, &ladder, TieBreak::Lower), 1.0);
        assert_eq!(ladder_factor(100, &ladder, TieBreak::Lower), 0.8);
        assert_eq!(ladder_factor(101, &ladder, TieBreak::Lower), 0.8);
        assert_eq!(ladder_factor(499, &ladder, TieBreak::Lower), 0.62);
        assert_eq!(ladder_factor(500, &ladder, TieBreak::Lower), 0.45);
        assert_eq!(ladder_factor(100_000, &ladder, TieBreak::Lower), 0.45);
    }

    #[test]
    fn test_alternative_tie_breaks() {
        let ladder = ladder();
        assert_eq!(ladder_factor(51, &ladder, TieBreak::Upper), 0.8);
        assert_eq!(ladder_factor(200, &ladder, TieBreak::Upper), 0.62);
        assert_eq!(ladder_factor(74, &ladder, TieBreak::Nearest), 1.0);
        assert_eq!(ladder_factor(75, &ladder, TieBreak::Nearest), 1.0);
        assert_eq!(ladder_factor(76, &ladder, TieBreak::Nearest), 0.8);
        // Below the first and above the last threshold are unaffected
        assert_eq!(ladder_factor(10, &ladder, TieBreak::Upper), 1.0);
        assert_eq!(ladder_factor(900, &ladder, TieBreak::Nearest), 0.45);
    }

    #[test]
    fn test_empty_ladder_means_no_discount() {
        let empty = DiscountLadder::default();
        assert_eq!(ladder_factor(1234, &empty, TieBreak::Lower), NO_DISCOUNT);
        assert!(next_tier(10, SizeKey::new(50, 50), &empty, &SizeOverrideTable::new()).is_none());
    }

    #[test]
    fn test_override_takes_precedence_only_at_exact_quantity() {
        let ladder = ladder();
        let size = SizeKey::new(50, 50);
        let mut overrides = SizeOverrideTable::new();
        overrides.insert(size, 200, 0.5);

        assert_eq!(resolve_factor(200, size, &ladder, &overrides, TieBreak::Lower), 0.5);
        assert_eq!(resolve_factor(201, size, &ladder, &overrides, TieBreak::Lower), 0.62);
        assert_eq!(
            resolve_factor(200, SizeKey::new(50, 51), &ladder, &overrides, TieBreak::Lower),
            0.62
        );
    }

    #[test]
    fn test_next_tier_preview() {
        let ladder = ladder();
        let size = SizeKey::new(75, 75);
        let mut overrides = SizeOverrideTable::new();

        let next = next_tier(99, size, &ladder, &overrides).unwrap();
        assert_eq!(next.threshold, 100);
        assert_eq!(next.add_more, 1);
        assert_eq!(next.next_save_percent, 20);

        // Exactly on a threshold previews the following one
        let next = next_tier(100, size, &ladder, &overrides).unwrap();
        assert_eq!(next.threshold, 200);
        assert_eq!(next.add_more, 100);

        overrides.insert(size, 200, 0.5);
        let next = next_tier(100, size, &ladder, &overrides).unwrap();
        assert_eq!(next.next_save_percent, 50);

        assert!(next_tier(500, size, &ladder, &overrides).is_none());
        assert!(next_tier(u32::MAX, size, &ladder, &overrides).is_none());
    }
}

pub mod power_law;
pub mod quote;
pub mod tiers;

/// Common traits shared by price models
pub mod traits {
    /// Continuous per-area price as a function of printable area.
    pub trait PriceCurve {
        /// Currency per square metre for an item of `area_m2` square metres.
        fn price_per_area(&self, area_m2: f64) -> f64;

        /// Inclusive `(min, max)` band every evaluation falls into.
        fn output_band(&self) -> (f64, f64);
    }
}

/// Numeric helpers used at the quote boundary
pub mod utils {
    /// Round to `decimals` places, half away from zero.
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let scale = 10f64.powi(decimals);
        (value * scale).round() / scale
    }

    /// Round money to cents.
    pub fn round_money(value: f64) -> f64 {
        round_to(value, 2)
    }

    /// Round and clamp a free-form input into an inclusive integer range.
    ///
    /// NaN maps to the minimum so exploratory input always yields a price.
    pub fn clamp_round(value: f64, (min, max): (u32, u32)) -> u32 {
        if value.is_nan() {
            return min;
        }
        value.round().max(min as f64).min(max as f64) as u32
    }

    /// True for a usable discount multiplier: finite, above zero, at most `1.0`.
    pub fn is_discount_factor(factor: f64) -> bool {
        factor.is_finite() && factor > 0.0 && factor <= 1.0
    }

    /// Whole-percent discount for a price multiplier, clamped to 0..=100.
    pub fn save_percent(factor: f64) -> u32 {
        ((1.0 - factor) * 100.0).round().clamp(0.0, 100.0) as u32
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_clamp_round() {
            assert_eq!(clamp_round(49.6, (20, 1000)), 50);
            assert_eq!(clamp_round(5.0, (20, 1000)), 20);
            assert_eq!(clamp_round(5000.0, (20, 1000)), 1000);
            assert_eq!(clamp_round(f64::NAN, (20, 1000)), 20);
            assert_eq!(clamp_round(f64::INFINITY, (20, 1000)), 1000);
            assert_eq!(clamp_round(-3.0, (10, 200_000)), 10);
        }

        #[test]
        fn test_save_percent() {
            assert_eq!(save_percent(1.0), 0);
            assert_eq!(save_percent(0.8), 20);
            assert_eq!(save_percent(0.16), 84);
            assert_eq!(save_percent(0.0), 100);
            assert_eq!(save_percent(1.3), 0);
        }

        #[test]
        fn test_is_discount_factor() {
            assert!(is_discount_factor(1.0));
            assert!(is_discount_factor(0.135));
            assert!(!is_discount_factor(0.0));
            assert!(!is_discount_factor(1.5));
            assert!(!is_discount_factor(f64::NAN));
        }

        #[test]
        fn test_round_money() {
            assert_eq!(round_money(131.199_999_9), 131.2);
            assert_eq!(round_money(0.005), 0.01);
            assert_eq!(round_to(655.999_96, 4), 656.0);
        }
    }
}

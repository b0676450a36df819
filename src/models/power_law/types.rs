use crate::calibration::config::PriceClamp;
use crate::models::traits::PriceCurve;
use serde::{Deserialize, Serialize};

/// Shape of the fitted per-area price before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveShape {
    /// Same price per m² at every area
    Constant(f64),
    /// `exp(intercept + slope · ln(area))`, i.e. `e^intercept · area^slope`
    PowerLaw { intercept: f64, slope: f64 },
}

/// Per-area price curve clamped into a configured band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerLawCurve {
    pub shape: CurveShape,
    pub clamp: PriceClamp,
}

impl PowerLawCurve {
    pub fn constant(price_per_area: f64, clamp: PriceClamp) -> Self {
        Self {
            shape: CurveShape::Constant(price_per_area),
            clamp,
        }
    }

    pub fn power_law(intercept: f64, slope: f64, clamp: PriceClamp) -> Self {
        Self {
            shape: CurveShape::PowerLaw { intercept, slope },
            clamp,
        }
    }

    /// Unclamped value of the curve.
    pub fn raw_price_per_area(&self, area_m2: f64) -> f64 {
        match self.shape {
            CurveShape::Constant(value) => value,
            CurveShape::PowerLaw { intercept, slope } => (intercept + slope * area_m2.ln()).exp(),
        }
    }
}

impl PriceCurve for PowerLawCurve {
    fn price_per_area(&self, area_m2: f64) -> f64 {
        let raw = self.raw_price_per_area(area_m2);
        if raw.is_nan() {
            // ln(0) or a degenerate fit; the band floor keeps quotes defined
            return self.clamp.min;
        }
        self.clamp.apply(raw)
    }

    fn output_band(&self) -> (f64, f64) {
        (self.clamp.min, self.clamp.max)
    }
}

/// Summary of a curve derivation, for logs and diagnostics screens.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FitDiagnostics {
    /// Anchors that produced a usable per-area price
    pub points_used: usize,
    /// Anchors dropped for a non-finite or non-positive per-area price
    pub points_dropped: usize,
    /// Log-log slope (0 for constant curves)
    pub slope: f64,
    /// Log-log intercept (ln of the constant for constant curves)
    pub intercept: f64,
    /// Coefficient of determination in log-log space, when defined
    pub r_squared: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_law_evaluation_and_clamp() {
        let clamp = PriceClamp {
            min: 50.0,
            max: 500.0,
        };
        // 100 · area^-0.5
        let curve = PowerLawCurve::power_law(100f64.ln(), -0.5, clamp);

        assert!((curve.price_per_area(0.25) - 200.0).abs() < 1e-9);
        assert!((curve.price_per_area(1.0) - 100.0).abs() < 1e-9);
        assert_eq!(curve.price_per_area(0.0001), 500.0);
        assert_eq!(curve.price_per_area(16.0), 50.0);
        assert_eq!(curve.output_band(), (50.0, 500.0));
    }

    #[test]
    fn test_constant_curve_is_clamped() {
        let clamp = PriceClamp {
            min: 50.0,
            max: 500.0,
        };
        assert_eq!(PowerLawCurve::constant(900.0, clamp).price_per_area(0.3), 500.0);
        assert_eq!(PowerLawCurve::constant(120.0, clamp).price_per_area(0.3), 120.0);
    }
}

//! Log-log least squares for per-area pricing.
//!
//! Unit price per square metre is expected to fall roughly as a power of the
//! printable area, so the fit is
//!
//! ```text
//! ln(price_per_area) = a + b · ln(area)
//! ```
//!
//! solved by ordinary least squares on the log-transformed points. There is
//! no iterative solver: the closed form is deterministic and well behaved for
//! the dozen or so anchors a storefront maintains.

use statrs::statistics::Statistics;

use super::types::{FitDiagnostics, PowerLawCurve};
use crate::calibration::config::PriceClamp;

/// Closed-form simple linear regression result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// `1 - SS_res / SS_tot`, `None` when the response has no spread
    pub r_squared: Option<f64>,
}

/// Ordinary least squares of `y` on `x`.
///
/// Returns `None` for fewer than two points. When every `x` is equal the
/// slope is zero and the intercept is the mean response.
pub fn ordinary_least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let x_mean = points.iter().map(|p| p.0).mean();
    let y_mean = points.iter().map(|p| p.1).mean();

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
        let dx = x - x_mean;
        (sxy + dx * (y - y_mean), sxx + dx * dx)
    });

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * x_mean;

    let (ss_res, ss_tot) = points.iter().fold((0.0, 0.0), |(res, tot), &(x, y)| {
        let fitted = intercept + slope * x;
        (res + (y - fitted).powi(2), tot + (y - y_mean).powi(2))
    });
    let r_squared = if ss_tot > 0.0 {
        Some(1.0 - ss_res / ss_tot)
    } else {
        None
    };

    Some(LinearFit {
        intercept,
        slope,
        r_squared,
    })
}

/// Fit a clamped power-law curve to `(area_m2, price_per_area)` points.
///
/// Points must already be filtered to finite positive values.
/// - no points: constant `fallback`
/// - one point: constant at that point's price
/// - two or more: log-log OLS
///
/// The returned diagnostics have `points_dropped` left at zero for the caller
/// to fill in.
pub fn fit_power_law(
    points: &[(f64, f64)],
    clamp: PriceClamp,
    fallback: f64,
) -> (PowerLawCurve, FitDiagnostics) {
    match points {
        [] => (
            PowerLawCurve::constant(fallback, clamp),
            FitDiagnostics {
                intercept: fallback.ln(),
                ..FitDiagnostics::default()
            },
        ),
        [(_, price)] => (
            PowerLawCurve::constant(*price, clamp),
            FitDiagnostics {
                points_used: 1,
                intercept: price.ln(),
                ..FitDiagnostics::default()
            },
        ),
        _ => {
            let log_points: Vec<(f64, f64)> = points
                .iter()
                .map(|&(area, price)| (area.ln(), price.ln()))
                .collect();

            // Two or more points always produce a fit
            let fit = ordinary_least_squares(&log_points).unwrap_or(LinearFit {
                intercept: fallback.ln(),
                slope: 0.0,
                r_squared: None,
            });

            (
                PowerLawCurve::power_law(fit.intercept, fit.slope, clamp),
                FitDiagnostics {
                    points_used: points.len(),
                    points_dropped: 0,
                    slope: fit.slope,
                    intercept: fit.intercept,
                    r_squared: fit.r_squared,
                },
            )
        }
    }
}

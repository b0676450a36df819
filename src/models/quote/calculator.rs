use tracing::trace;

use super::types::Quote;
use crate::calibration::pipeline::DerivedPriceModel;
use crate::calibration::types::SizeKey;
use crate::models::utils::{clamp_round, round_money, round_to, save_percent};

/// Quote `quantity` stickers of `width_mm` × `height_mm`.
///
/// Inputs outside the supported ranges are rounded and clamped rather than
/// rejected, so a preview is always available while the user types. The
/// result depends only on the arguments and the immutable model.
///
/// # Pricing steps
///
/// 1. `area = width/1000 · height/1000` (m²)
/// 2. `price_per_area` from the exact-size cache, else the fitted curve
/// 3. `factor` from the size overrides, else the discount ladder
/// 4. `base = price_per_area · area · reference_quantity`
/// 5. `total = base · factor · quantity / reference_quantity`
pub fn quote(model: &DerivedPriceModel, width_mm: f64, height_mm: f64, quantity: f64) -> Quote {
    let bounds = model.bounds();
    let width = clamp_round(width_mm, bounds.width_mm);
    let height = clamp_round(height_mm, bounds.height_mm);
    let quantity = clamp_round(quantity, bounds.quantity);

    let reference_quantity = model.reference_quantity();
    if quantity == 0 || reference_quantity == 0 {
        return Quote::zero(width, height);
    }

    let size = SizeKey::new(width, height);
    let area = size.area_m2();
    let price_per_area = model.price_per_area(size);
    let factor = model.resolve_factor(size, quantity);

    let reference_quantity = reference_quantity as f64;
    let base = price_per_area * area * reference_quantity;
    let total = base * factor * (quantity as f64 / reference_quantity);
    let unit_price = total / quantity as f64;

    trace!(%size, quantity, price_per_area, factor, total, "quoted");

    Quote {
        width,
        height,
        quantity,
        total: round_money(total),
        unit_price: round_money(unit_price),
        price_per_area: round_to(price_per_area, 4),
        factor_used: factor,
        save_percent: save_percent(factor),
        next_tier: model.next_tier(size, quantity),
    }
}

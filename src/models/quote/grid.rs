use super::calculator::quote;
use super::types::Quote;
use crate::calibration::pipeline::DerivedPriceModel;
use crate::calibration::types::SizeKey;

/// Quote every size against every quantity.
///
/// Results are row-major: all quantities for the first size, then the next
/// size, in the order given.
pub fn price_grid(model: &DerivedPriceModel, sizes: &[SizeKey], quantities: &[u32]) -> Vec<Quote> {
    let mut quotes = Vec::with_capacity(sizes.len() * quantities.len());
    for size in sizes {
        for &quantity in quantities {
            quotes.push(quote(
                model,
                size.width as f64,
                size.height as f64,
                quantity as f64,
            ));
        }
    }
    quotes
}

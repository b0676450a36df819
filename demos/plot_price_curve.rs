// Example: plot_price_curve.rs
// Derives the price model from the storefront tables (or a TOML config plus an
// anchor CSV) and renders an SVG comparing the per-area price implied by each
// anchor with the fitted, clamped power-law curve.
//
// Usage:
//     cargo run --example plot_price_curve -- [config.toml anchors.csv]
//
// The output image will be written to price_curve.svg in the working directory.

use std::env;
use std::error::Error;

use plotters::prelude::*;
use sticker_pricing::calibration::pipeline::implied_point;
use sticker_pricing::{
    default_configs, load_anchors_csv, PriceCurve, PricingConfig, PricingEngine,
};

fn load_config(args: &[String]) -> Result<PricingConfig, Box<dyn Error>> {
    if args.len() < 3 {
        return Ok(default_configs::sticker_shop());
    }
    let mut config = PricingConfig::from_toml_file(&args[1])?;
    config.anchors = load_anchors_csv(&args[2])?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let config = load_config(&args)?;
    let engine = PricingEngine::new(config)?;
    let config = engine.config();
    let model = engine.model();

    // Anchor points split by whether they made it into the fit
    let mut used = Vec::new();
    let mut dropped = 0;
    for anchor in &config.anchors {
        let point = implied_point(anchor, config);
        if point.is_usable() {
            used.push((point.area_m2, point.price_per_area));
        } else {
            dropped += 1;
        }
    }
    println!("{} anchors plotted, {} dropped", used.len(), dropped);

    // Curve across the whole supported domain
    let bounds = config.bounds;
    let area_min = (bounds.width_mm.0 as f64 / 1000.0) * (bounds.height_mm.0 as f64 / 1000.0);
    let area_max = (bounds.width_mm.1 as f64 / 1000.0) * (bounds.height_mm.1 as f64 / 1000.0);
    let steps = 250;
    let curve_line: Vec<(f64, f64)> = (0..=steps)
        .map(|i| {
            let frac = i as f64 / steps as f64;
            let area = (area_min.ln() + (area_max.ln() - area_min.ln()) * frac).exp();
            (area, model.curve().price_per_area(area))
        })
        .collect();

    let (band_min, band_max) = model.curve().output_band();
    let y_max = used
        .iter()
        .map(|p| p.1)
        .fold(band_max, f64::max)
        * 1.05;
    let y_min = (band_min * 0.9).max(0.0);

    let root = SVGBackend::new("price_curve.svg", (1280, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let diagnostics = model.diagnostics();
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            format!(
                "Price per m² vs area | slope {:.3}, R² {}",
                diagnostics.slope,
                diagnostics
                    .r_squared
                    .map(|r| format!("{:.3}", r))
                    .unwrap_or_else(|| "n/a".to_string())
            ),
            ("sans-serif", 30),
        )
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((area_min..area_max).log_scale(), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Area (m², log scale)")
        .y_desc("Price per m² at reference quantity")
        .draw()?;

    // Clamp band
    for level in [band_min, band_max] {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(area_min, level), (area_max, level)],
            BLACK.mix(0.3).stroke_width(1),
        )))?;
    }

    // Fitted curve
    chart.draw_series(vec![PathElement::new(curve_line, RED)])?;

    // Anchors
    chart.draw_series(used.iter().map(|pt| Circle::new(*pt, 4, BLUE.filled())))?;

    println!("Chart saved to price_curve.svg");
    Ok(())
}

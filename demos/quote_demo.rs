// demos/quote_demo.rs

//! Demonstration of anchor calibration and sticker quoting
//!
//! This example shows how to:
//! 1. Build an engine from the storefront tables (or a TOML file)
//! 2. Inspect the fitted per-area curve
//! 3. Quote custom sizes, including out-of-range input
//! 4. Print the catalog price grid
//!
//! Usage:
//!     cargo run --example quote_demo -- [config.toml]
//!
//! Set `RUST_LOG=sticker_pricing=debug` to see derivation events.

use anyhow::Result;
use sticker_pricing::{default_configs, PricingEngine, Quote};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Sticker Pricing Demo");
    println!("====================");

    let engine = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading config from {}", path);
            PricingEngine::from_toml_file(path)?
        }
        None => PricingEngine::new(default_configs::sticker_shop())?,
    };

    let diagnostics = engine.model().diagnostics();
    println!("\nStep 1: Derived price model");
    println!("  Anchors used:    {}", diagnostics.points_used);
    println!("  Anchors dropped: {}", diagnostics.points_dropped);
    println!("  ln(ppa) = {:.4} + {:.4} · ln(area)", diagnostics.intercept, diagnostics.slope);
    if let Some(r2) = diagnostics.r_squared {
        println!("  R² (log-log):    {:.4}", r2);
    }

    println!("\nStep 2: Custom quotes");
    println!(
        "{:<14} {:>8} {:>10} {:>10} {:>10} {:>6}  {}",
        "Size", "Qty", "Total", "Each", "$/m²", "Save", "Next tier"
    );
    println!("{}", "-".repeat(80));

    let requests = [
        (50.0, 50.0, 50.0),
        (50.0, 50.0, 99.0),
        (50.0, 50.0, 100.0),
        (63.0, 41.0, 250.0),
        (150.0, 80.0, 1500.0),
        (10.0, 2000.0, 5.0),
    ];
    for (w, h, q) in requests {
        print_quote(&engine.quote(w, h, q));
    }

    println!("\nStep 3: Catalog grid (total per order)");
    let catalog = &engine.config().catalog;
    print!("{:<10}", "Size");
    for q in &catalog.quantities {
        print!("{:>10}", q);
    }
    println!();

    let grid = engine.standard_grid();
    for (row, side) in grid
        .chunks(catalog.quantities.len().max(1))
        .zip(&catalog.sizes_mm)
    {
        print!("{:<10}", format!("{0}x{0}", side));
        for quote in row {
            print!("{:>10.2}", quote.total);
        }
        println!();
    }

    Ok(())
}

fn print_quote(quote: &Quote) {
    let next = match quote.next_tier {
        Some(tier) => format!(
            "+{} for {}% off",
            tier.add_more, tier.next_save_percent
        ),
        None => "top tier".to_string(),
    };
    println!(
        "{:<14} {:>8} {:>10.2} {:>10.2} {:>10.2} {:>5}%  {}",
        format!("{}x{}mm", quote.width, quote.height),
        quote.quantity,
        quote.total,
        quote.unit_price,
        quote.price_per_area,
        quote.save_percent,
        next
    );
}

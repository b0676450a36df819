
use sticker_pricing::{
    default_configs, derive_price_model, AnchorObservation, CurveShape, PriceCurve,
    PricingConfig, PricingEngine, SizeKey, TieBreak,
};
use test_utils::{
    assert_close, fixture_path, load_fixture_config, sticker_shop_engine, synthetic_config,
};

/// The TOML + CSV fixtures describe the same tables as the built-in preset.
#[test]
fn test_fixture_config_matches_preset() {
    let fixture = load_fixture_config();
    let preset = default_configs::sticker_shop();

    assert_eq!(fixture.anchors, preset.anchors);
    assert_eq!(fixture.ladder, preset.ladder);
    assert_eq!(fixture.size_overrides, preset.size_overrides);
    assert_eq!(fixture.bounds, preset.bounds);
    assert_eq!(fixture.catalog, preset.catalog);

    let from_fixture = PricingEngine::new(fixture).unwrap();
    let from_preset = sticker_shop_engine();
    for (w, h, q) in [(50.0, 50.0, 50.0), (63.0, 88.0, 1234.0), (999.0, 21.0, 15_000.0)] {
        assert_eq!(from_fixture.quote(w, h, q), from_preset.quote(w, h, q));
    }
}

/// Log-log fit over the storefront anchors.
#[test]
fn test_storefront_fit_diagnostics() {
    let engine = sticker_shop_engine();
    let diagnostics = engine.model().diagnostics();

    println!("Storefront fit: {:?}", diagnostics);

    assert_eq!(diagnostics.points_used, 12);
    assert_eq!(diagnostics.points_dropped, 0);
    assert_close(diagnostics.slope, -0.381, 1e-3, "log-log slope");
    assert_close(diagnostics.intercept, 4.1638, 1e-3, "log-log intercept");
    assert_close(diagnostics.r_squared.unwrap(), 0.980, 1e-3, "r squared");

    // Per-area price falls as area grows
    let curve = engine.model().curve();
    assert!(curve.price_per_area(0.01) > curve.price_per_area(0.1));
    assert!(curve.price_per_area(0.1) > curve.price_per_area(1.0));
}

/// A table generated from an exact power law is recovered, including off-anchor sizes.
#[test]
fn test_synthetic_power_law_is_recovered() {
    let mut config = synthetic_config();
    // price_per_area = 200 · area^-0.25 at the reference quantity of 10
    for (w, h) in [(30, 30), (80, 40), (150, 150), (400, 250), (900, 900)] {
        let size = SizeKey::new(w, h);
        let area = size.area_m2();
        let total = 200.0 * area.powf(-0.25) * area * 10.0;
        config.anchors.push(AnchorObservation::new(w, h, 10, total));
    }

    let model = derive_price_model(&config);
    assert_close(model.diagnostics().slope, -0.25, 1e-9, "slope");
    assert_close(model.diagnostics().intercept, 200f64.ln(), 1e-9, "intercept");

    let off_anchor = SizeKey::new(500, 120);
    let expected = 200.0 * off_anchor.area_m2().powf(-0.25);
    assert_close(model.price_per_area(off_anchor), expected, 1e-6, "off-anchor price");
}

/// Anchors at a non-reference quantity are normalised through the ladder.
#[test]
fn test_anchor_at_discounted_quantity_calibrates_reference_price() {
    let mut config = synthetic_config();
    // 100 units quoted at 90.00 under the 0.9 tier
    config
        .anchors
        .push(AnchorObservation::new(100, 100, 100, 90.0));
    let engine = PricingEngine::new(config).unwrap();

    // Reference price for 10 units: 90 / (0.9 · 100/10) = 10.00
    let reference = engine.quote(100.0, 100.0, 10.0);
    assert_eq!(reference.total, 10.00);
    assert_eq!(engine.quote(100.0, 100.0, 100.0).total, 90.00);
    // Between tiers, the 100 tier still applies until 1000
    assert_eq!(engine.quote(100.0, 100.0, 999.0).factor_used, 0.9);
    assert_eq!(engine.quote(100.0, 100.0, 1000.0).factor_used, 0.7);
}

/// Alternative tie-break policies only change strictly-between quantities.
#[test]
fn test_tie_break_policies() {
    let quote_at = |tie_break: TieBreak, quantity: f64| {
        let config = PricingConfig {
            tie_break,
            ..synthetic_config()
        };
        PricingEngine::new(config)
            .unwrap()
            .quote(100.0, 100.0, quantity)
            .factor_used
    };

    assert_eq!(quote_at(TieBreak::Lower, 99.0), 1.0);
    assert_eq!(quote_at(TieBreak::Upper, 99.0), 0.9);
    assert_eq!(quote_at(TieBreak::Nearest, 99.0), 0.9);
    assert_eq!(quote_at(TieBreak::Nearest, 55.0), 1.0);

    for tie_break in [TieBreak::Lower, TieBreak::Upper, TieBreak::Nearest] {
        assert_eq!(quote_at(tie_break, 100.0), 0.9);
        assert_eq!(quote_at(tie_break, 5000.0), 0.7);
    }
}

/// A single usable anchor yields a constant curve at its price.
#[test]
fn test_single_anchor_is_constant_curve() {
    let mut config = synthetic_config();
    config.anchors.push(AnchorObservation::new(200, 100, 10, 40.0));
    config.anchors.push(AnchorObservation::new(0, 100, 10, 40.0));

    let model = derive_price_model(&config);
    assert_eq!(model.diagnostics().points_used, 1);
    assert_eq!(model.diagnostics().points_dropped, 1);
    match model.curve().shape {
        CurveShape::Constant(value) => assert_close(value, 200.0, 1e-9, "constant price"),
        other => panic!("expected constant curve, got {:?}", other),
    }
}

/// A pinned factor above 1.0 is rejected like a bad size override would be.
#[test]
fn test_anchor_with_out_of_range_factor_is_ignored() {
    let mut config = synthetic_config();
    config.anchors.push(AnchorObservation::new(50, 50, 100, 200.0).with_factor_override(1.5));
    let engine = PricingEngine::new(config).unwrap();

    assert_eq!(engine.model().diagnostics().points_dropped, 1);
    let quote = engine.quote(50.0, 50.0, 100.0);
    assert_eq!(quote.factor_used, 0.9);
    assert!(quote.factor_used > 0.0 && quote.factor_used <= 1.0);

    // The same factor as a configured override fails validation
    let mut config = synthetic_config();
    config.size_overrides.insert(SizeKey::new(50, 50), 100, 1.5);
    assert!(PricingEngine::new(config).is_err());
}

/// Invalid files fail with context instead of panicking.
#[test]
fn test_invalid_config_file_is_rejected() {
    let err = PricingEngine::from_toml_file(fixture_path("bad_ladder.toml")).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("bad_ladder.toml"), "got: {}", message);
    assert!(message.contains("ladder tier at quantity 100"), "got: {}", message);

    assert!(PricingEngine::from_toml_file(fixture_path("missing.toml")).is_err());
    assert!(PricingConfig::from_toml_str("reference_quantity = \"fifty\"").is_err());
}

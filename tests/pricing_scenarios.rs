//! Quotes against the `default` fixture set.
//!
//! The default set has global quantity bands `0-99 x1`, `100-499 x0.9`,
//! `500-999 x0.85` and `1000-9999 x0.8`, print tiers for one to four colors, a
//! jute discount override and a one-color print override for paper bags.

use rust_decimal::Decimal;
use testresult::TestResult;

use bagquote::{
    fixtures::Fixture,
    pricing::{PriceInput, calculate_price, price_ladder},
    resolver::{RuleOrigin, resolve_print_price, resolve_quantity_multiplier},
    rules::RuleSnapshot,
};

#[test]
fn unprinted_cotton_tote_gets_global_discount() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();
    let tote = fixture.product("cotton-tote")?;

    let result = calculate_price(&rules, &PriceInput::new(tote, 150));

    assert_eq!(result.base_price, Decimal::from(10));
    assert_eq!(result.breakdown.discount, Decimal::ONE);
    assert_eq!(result.print_cost, Decimal::ZERO);
    assert_eq!(result.price_per_item, Decimal::from(9));
    assert_eq!(result.total_price, Decimal::from(1350));

    Ok(())
}

#[test]
fn printed_cotton_tote_adds_print_cost() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();
    let tote = fixture.product("cotton-tote")?;

    let result = calculate_price(&rules, &PriceInput::new(tote, 150).with_print(2));

    assert_eq!(result.print_cost, Decimal::new(30, 2));
    assert_eq!(result.price_per_item, Decimal::new(930, 2));
    assert_eq!(result.total_price, Decimal::from(1395));

    Ok(())
}

#[test]
fn size_surcharge_is_added_per_unit() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();
    let tote = fixture.product("cotton-tote")?;

    let input = PriceInput::new(tote, 150).with_print(2).with_size("50x50");
    let result = calculate_price(&rules, &input);

    assert_eq!(result.breakdown.size_modifier, Decimal::new(60, 2));
    assert_eq!(result.price_per_item, Decimal::new(990, 2));
    assert_eq!(result.total_price, Decimal::from(1485));

    Ok(())
}

#[test]
fn jute_override_wins_at_both_band_edges() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();

    assert_eq!(resolve_quantity_multiplier(&rules, "jute", 100), Decimal::new(88, 2));
    assert_eq!(resolve_quantity_multiplier(&rules, "jute", 499), Decimal::new(88, 2));
    assert_eq!(resolve_quantity_multiplier(&rules, "cotton", 499), Decimal::new(9, 1));

    // No jute band covers small orders, so the global band applies.
    assert_eq!(resolve_quantity_multiplier(&rules, "jute", 50), Decimal::ONE);

    Ok(())
}

#[test]
fn paper_print_override_only_covers_one_color() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();

    assert_eq!(resolve_print_price(&rules, "paper", 150, 1), Decimal::new(12, 2));
    assert_eq!(resolve_print_price(&rules, "paper", 150, 2), Decimal::new(30, 2));

    Ok(())
}

#[test]
fn quantity_beyond_every_band_fails_open() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();
    let tote = fixture.product("cotton-tote")?;

    let result = calculate_price(&rules, &PriceInput::new(tote, 10_000).with_print(2));

    assert_eq!(result.breakdown.multiplier, Decimal::ONE);
    assert_eq!(result.breakdown.multiplier_origin, RuleOrigin::Default);
    assert_eq!(result.print_cost, Decimal::ZERO);
    assert_eq!(result.price_per_item, Decimal::from(10));

    Ok(())
}

#[test]
fn sentinel_end_is_an_ordinary_bound() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();

    assert_eq!(resolve_quantity_multiplier(&rules, "cotton", 9999), Decimal::new(8, 1));
    assert_eq!(resolve_quantity_multiplier(&rules, "cotton", 10_000), Decimal::ONE);

    Ok(())
}

#[test]
fn removing_an_override_falls_back_to_global() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let mut set = fixture.rules().clone();

    set.category_quantity_tiers
        .retain(|scoped| !(scoped.product_type == "jute" && scoped.tier.range_start == 100));

    let rules = RuleSnapshot::from(set);

    assert_eq!(resolve_quantity_multiplier(&rules, "jute", 150), Decimal::new(9, 1));
    assert_eq!(resolve_quantity_multiplier(&rules, "jute", 600), Decimal::new(82, 2));

    Ok(())
}

#[test]
fn quotes_are_repeatable_and_totals_consistent() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();

    for (key, product) in fixture.products() {
        for quantity in [1, 99, 100, 499, 500, 999, 1000, 9999, 10_000] {
            for colors in 0..=4 {
                let input = PriceInput::new(product, quantity).with_print(colors);
                let first = calculate_price(&rules, &input);
                let second = calculate_price(&rules, &input);

                assert_eq!(first, second, "{key} x{quantity} in {colors} colors changed");
                assert_eq!(
                    first.total_price,
                    first.price_per_item * Decimal::from(quantity),
                    "{key} x{quantity} total is not per-item times quantity"
                );
            }
        }
    }

    Ok(())
}

#[test]
fn zero_colors_never_costs_anything() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();

    for category in ["cotton", "paper", "jute", "unknown"] {
        assert_eq!(
            resolve_print_price(&rules, category, 150, 0),
            Decimal::ZERO,
            "{category} charged for zero colors"
        );
    }

    Ok(())
}

#[test]
fn default_rules_have_no_gaps_or_overlaps() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let report = fixture.snapshot().integrity_report(9999);

    assert!(report.is_clean(), "unexpected findings: {:?}", report.findings());

    Ok(())
}

#[test]
fn jute_ladder_hides_global_bands_inside_overrides() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let rules = fixture.snapshot();
    let jute = fixture.product("jute-shopper")?;

    let origins: Vec<(u32, RuleOrigin)> = price_ladder(&rules, jute, 0, false)
        .into_iter()
        .map(|row| (row.quantity, row.origin))
        .collect();

    assert_eq!(
        origins,
        vec![
            (1, RuleOrigin::Global),
            (100, RuleOrigin::Category),
            (500, RuleOrigin::Category),
        ]
    );

    Ok(())
}

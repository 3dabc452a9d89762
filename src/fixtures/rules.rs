//! Rule Fixtures
//!
//! Rule files hold the four flat collections exactly as the data layer stores
//! them. Values are checked on load so that bad data shows up as a fixture error
//! rather than as a strange quote.

use rust_decimal::Decimal;

use crate::{
    fixtures::FixtureError,
    rules::RuleSet,
    tiers::{PrintPriceTier, QuantityTier, Tier},
};

/// Check every tier in `set` for malformed values.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidRule`] describing the first problem found.
pub fn validate_rule_set(set: &RuleSet) -> Result<(), FixtureError> {
    for tier in &set.quantity_tiers {
        validate_quantity_tier("global", tier)?;
    }

    for tier in &set.print_tiers {
        validate_print_tier("global", tier)?;
    }

    for scoped in &set.category_quantity_tiers {
        validate_quantity_tier(&scoped.product_type, &scoped.tier)?;
    }

    for scoped in &set.category_print_tiers {
        validate_print_tier(&scoped.product_type, &scoped.tier)?;
    }

    Ok(())
}

fn validate_quantity_tier(scope: &str, tier: &QuantityTier) -> Result<(), FixtureError> {
    validate_range(scope, tier)?;

    if tier.multiplier <= Decimal::ZERO || tier.multiplier > Decimal::ONE {
        return Err(FixtureError::InvalidRule(format!(
            "{scope} quantity tier {}: multiplier {} is outside (0, 1]",
            tier.range(),
            tier.multiplier
        )));
    }

    Ok(())
}

fn validate_print_tier(scope: &str, tier: &PrintPriceTier) -> Result<(), FixtureError> {
    validate_range(scope, tier)?;

    if tier.colors_count == 0 {
        return Err(FixtureError::InvalidRule(format!(
            "{scope} print tier {}: colors_count must be at least 1",
            tier.range()
        )));
    }

    if tier.price_per_item.is_sign_negative() {
        return Err(FixtureError::InvalidRule(format!(
            "{scope} print tier {}: negative price_per_item {}",
            tier.range(),
            tier.price_per_item
        )));
    }

    Ok(())
}

fn validate_range(scope: &str, tier: &impl Tier) -> Result<(), FixtureError> {
    let range = tier.range();

    if range.is_well_formed() {
        Ok(())
    } else {
        Err(FixtureError::InvalidRule(format!(
            "{scope} tier: range_end {} is before range_start {}",
            range.end(),
            range.start()
        )))
    }
}

#[cfg(test)]
mod tests {
    use crate::tiers::CategoryTier;

    use super::*;

    #[test]
    fn accepts_well_formed_rules() -> Result<(), FixtureError> {
        let set = RuleSet {
            quantity_tiers: vec![QuantityTier::new(0, 9999, Decimal::ONE)],
            print_tiers: vec![PrintPriceTier::new(0, 9999, 1, Decimal::ZERO)],
            ..RuleSet::default()
        };

        validate_rule_set(&set)
    }

    #[test]
    fn rejects_reversed_range() {
        let set = RuleSet {
            quantity_tiers: vec![QuantityTier::new(500, 100, Decimal::new(9, 1))],
            ..RuleSet::default()
        };

        assert!(matches!(
            validate_rule_set(&set),
            Err(FixtureError::InvalidRule(message)) if message.contains("range_end 100")
        ));
    }

    #[test]
    fn rejects_multiplier_outside_unit_interval() {
        for multiplier in [Decimal::ZERO, Decimal::new(11, 1), Decimal::from(-1)] {
            let set = RuleSet {
                category_quantity_tiers: vec![CategoryTier::new(
                    "paper",
                    QuantityTier::new(0, 99, multiplier),
                )],
                ..RuleSet::default()
            };

            assert!(
                matches!(
                    validate_rule_set(&set),
                    Err(FixtureError::InvalidRule(message)) if message.starts_with("paper")
                ),
                "multiplier {multiplier} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_zero_color_print_tier() {
        let set = RuleSet {
            print_tiers: vec![PrintPriceTier::new(0, 99, 0, Decimal::ONE)],
            ..RuleSet::default()
        };

        assert!(matches!(
            validate_rule_set(&set),
            Err(FixtureError::InvalidRule(_))
        ));
    }

    #[test]
    fn rejects_negative_print_price() {
        let set = RuleSet {
            category_print_tiers: vec![CategoryTier::new(
                "cotton",
                PrintPriceTier::new(0, 99, 1, Decimal::from(-1)),
            )],
            ..RuleSet::default()
        };

        assert!(matches!(
            validate_rule_set(&set),
            Err(FixtureError::InvalidRule(_))
        ));
    }
}

//! Rule Resolver
//!
//! Picks the single multiplier and the single print price that apply to a
//! category at a quantity. Category overrides win unconditionally over global
//! tiers covering the same quantity. Within a scope the tiers are scanned in list
//! order and the first match wins; overlapping ranges are a configuration error
//! and this order is the only adjudication they get.
//!
//! Configuration gaps never fail: a quantity without a tier gets no discount and
//! an unpriced color count prints for free.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    rules::RuleSnapshot,
    tiers::{PrintPriceTier, QuantityRange, QuantityTier, Tier},
};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
    /// A category override.
    Category,

    /// A global tier.
    Global,

    /// No tier matched; the fail-open default was used.
    Default,
}

/// A resolved value together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// The resolved multiplier or price.
    pub value: Decimal,

    /// Which rule collection supplied it.
    pub origin: RuleOrigin,

    /// Range of the tier that supplied it, `None` for the fail-open default.
    pub range: Option<QuantityRange>,
}

impl Resolved {
    const fn new(value: Decimal, origin: RuleOrigin, range: Option<QuantityRange>) -> Self {
        Self {
            value,
            origin,
            range,
        }
    }

    const fn fallback(value: Decimal) -> Self {
        Self::new(value, RuleOrigin::Default, None)
    }
}

/// Resolves pricing rules against one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RuleResolver<'a> {
    rules: &'a RuleSnapshot,
}

impl<'a> RuleResolver<'a> {
    /// Create a resolver over `rules`.
    pub const fn new(rules: &'a RuleSnapshot) -> Self {
        Self { rules }
    }

    /// Unit price multiplier for `category` at `quantity`. `1` when no tier covers it.
    pub fn quantity_multiplier(&self, category: &str, quantity: u32) -> Decimal {
        self.resolve_quantity_multiplier(category, quantity).value
    }

    /// Added per-item print cost for `colors_count` colors. `0` when nothing prices it.
    pub fn print_price(&self, category: &str, quantity: u32, colors_count: u32) -> Decimal {
        self.resolve_print_price(category, quantity, colors_count).value
    }

    /// Like [`RuleResolver::quantity_multiplier`], also reporting where the value came from.
    pub fn resolve_quantity_multiplier(&self, category: &str, quantity: u32) -> Resolved {
        let overrides = self.rules.category_quantity_tiers(category);

        if let Some(tier) = first_quantity_tier(overrides, quantity) {
            return Resolved::new(tier.multiplier, RuleOrigin::Category, Some(tier.range()));
        }

        if let Some(tier) = first_quantity_tier(self.rules.quantity_tiers(), quantity) {
            return Resolved::new(tier.multiplier, RuleOrigin::Global, Some(tier.range()));
        }

        debug!(category, quantity, "no quantity tier covers quantity, using no discount");

        Resolved::fallback(Decimal::ONE)
    }

    /// Like [`RuleResolver::print_price`], also reporting where the value came from.
    pub fn resolve_print_price(&self, category: &str, quantity: u32, colors_count: u32) -> Resolved {
        if colors_count == 0 {
            return Resolved::fallback(Decimal::ZERO);
        }

        if let Some(tier) = first_print_tier(
            self.rules.category_print_tiers(category),
            quantity,
            colors_count,
        ) {
            return Resolved::new(tier.price_per_item, RuleOrigin::Category, Some(tier.range()));
        }

        if let Some(tier) = first_print_tier(self.rules.print_tiers(), quantity, colors_count) {
            return Resolved::new(tier.price_per_item, RuleOrigin::Global, Some(tier.range()));
        }

        warn!(
            category,
            quantity,
            colors_count,
            "no print price tier for quantity and color count, printing at no charge"
        );

        Resolved::fallback(Decimal::ZERO)
    }
}

/// Resolve the unit price multiplier for `category` at `quantity` against `rules`.
pub fn resolve_quantity_multiplier(rules: &RuleSnapshot, category: &str, quantity: u32) -> Decimal {
    RuleResolver::new(rules).quantity_multiplier(category, quantity)
}

/// Resolve the per-item print price for `category`, `quantity` and `colors_count`
/// against `rules`.
pub fn resolve_print_price(
    rules: &RuleSnapshot,
    category: &str,
    quantity: u32,
    colors_count: u32,
) -> Decimal {
    RuleResolver::new(rules).print_price(category, quantity, colors_count)
}

/// First tier in list order whose range contains `quantity`.
fn first_quantity_tier(tiers: &[QuantityTier], quantity: u32) -> Option<&QuantityTier> {
    for tier in tiers {
        if tier.covers(quantity) {
            return Some(tier);
        }
    }

    None
}

/// First tier in list order pricing `colors_count` colors at `quantity`.
fn first_print_tier(
    tiers: &[PrintPriceTier],
    quantity: u32,
    colors_count: u32,
) -> Option<&PrintPriceTier> {
    for tier in tiers {
        if tier.matches(quantity, colors_count) {
            return Some(tier);
        }
    }

    None
}

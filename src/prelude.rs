//! Bagquote prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    fixtures::{Fixture, FixtureError, YamlRuleSource},
    pricing::{LadderRow, PriceBreakdown, PriceInput, PriceResult, calculate_price, price_ladder},
    products::{Product, SizePriceModifier},
    quote::{QuoteError, QuoteRenderer},
    resolver::{
        Resolved, RuleOrigin, RuleResolver, resolve_print_price, resolve_quantity_multiplier,
    },
    rules::{IntegrityFinding, IntegrityReport, RuleScope, RuleSet, RuleSnapshot},
    store::{CachedRuleStore, RuleSource, RuleSourceError},
    tiers::{
        CategoryPrintPriceTier, CategoryQuantityTier, CategoryTier, PrintPriceTier, QuantityRange,
        QuantityTier, Tier,
    },
};

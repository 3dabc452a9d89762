//! Pricing
//!
//! Turns a product, an order quantity and a print choice into an itemised quote.
//! Nothing here can fail: configuration gaps come back from the resolver as "no
//! discount" and "no print charge", and arithmetic saturates instead of panicking,
//! so a storefront always has a price to show.

use rust_decimal::Decimal;
use tracing::warn;

use crate::{
    products::Product,
    resolver::{RuleOrigin, RuleResolver},
    rules::RuleSnapshot,
    tiers::{QuantityRange, Tier},
};

/// Everything needed to price one order line.
#[derive(Debug, Clone, Copy)]
pub struct PriceInput<'a> {
    /// Unit price before any discount. Usually the product's base price.
    pub base_price: Decimal,

    /// Ordered quantity. Callers are expected to have clamped this to at least 1.
    pub quantity: u32,

    /// Number of print colors, used only when `with_print` is set.
    pub color_count: u32,

    /// Whether the order is printed.
    pub with_print: bool,

    /// Selected size, for products with size surcharges.
    pub size: Option<&'a str>,

    /// The product being priced; supplies the category and size surcharges.
    pub product: &'a Product,
}

impl<'a> PriceInput<'a> {
    /// Unprinted order of `quantity` units at the product's base price.
    pub fn new(product: &'a Product, quantity: u32) -> Self {
        Self {
            base_price: product.base_price,
            quantity,
            color_count: 0,
            with_print: false,
            size: None,
            product,
        }
    }

    /// Print the order in `color_count` colors.
    #[must_use]
    pub const fn with_print(mut self, color_count: u32) -> Self {
        self.with_print = true;
        self.color_count = color_count;
        self
    }

    /// Select a product size.
    #[must_use]
    pub const fn with_size(mut self, size: &'a str) -> Self {
        self.size = Some(size);
        self
    }

    /// Price from `base_price` instead of the product's own base price.
    #[must_use]
    pub const fn with_base_price(mut self, base_price: Decimal) -> Self {
        self.base_price = base_price;
        self
    }
}

/// How the unit price was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// Amount saved per item against the undiscounted base price.
    pub discount: Decimal,

    /// Quantity multiplier that was applied.
    pub multiplier: Decimal,

    /// Where the multiplier came from.
    pub multiplier_origin: RuleOrigin,

    /// Per-item size surcharge, zero when no size applies.
    pub size_modifier: Decimal,
}

/// An itemised quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceResult {
    /// Undiscounted unit price used for the quote.
    pub base_price: Decimal,

    /// Discount details.
    pub breakdown: PriceBreakdown,

    /// Per-item print cost.
    pub print_cost: Decimal,

    /// Final unit price: discounted base, plus print cost, plus size surcharge.
    pub price_per_item: Decimal,

    /// `price_per_item * quantity`.
    pub total_price: Decimal,
}

/// Price one order line against `rules`.
pub fn calculate_price(rules: &RuleSnapshot, input: &PriceInput<'_>) -> PriceResult {
    let resolver = RuleResolver::new(rules);
    let category = input.product.product_type.as_str();

    let base_price = if input.base_price.is_sign_negative() {
        warn!(
            product = %input.product.name,
            base_price = %input.base_price,
            "negative base price, quoting from zero"
        );
        Decimal::ZERO
    } else {
        input.base_price
    };

    let multiplier = resolver.resolve_quantity_multiplier(category, input.quantity);
    let discounted = base_price.saturating_mul(multiplier.value);

    let print_cost = if input.with_print {
        resolver.print_price(category, input.quantity, input.color_count)
    } else {
        Decimal::ZERO
    };

    let size_modifier = input
        .size
        .and_then(|size| input.product.size_modifier(size))
        .unwrap_or(Decimal::ZERO);

    let price_per_item = discounted
        .saturating_add(print_cost)
        .saturating_add(size_modifier);

    PriceResult {
        base_price,
        breakdown: PriceBreakdown {
            discount: base_price.saturating_sub(discounted),
            multiplier: multiplier.value,
            multiplier_origin: multiplier.origin,
            size_modifier,
        },
        print_cost,
        price_per_item,
        total_price: price_per_item.saturating_mul(Decimal::from(input.quantity)),
    }
}

/// One row of a price ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderRow {
    /// Quantities that share this row's unit price.
    pub range: QuantityRange,

    /// Quantity the row was quoted at, the first quantity of `range`.
    pub quantity: u32,

    /// Where the quantity multiplier for the band comes from.
    pub origin: RuleOrigin,

    /// Quote at `quantity`.
    pub price: PriceResult,
}

/// Tiers that decided a band: the winning quantity tier and print tier.
type BandKey = (RuleOrigin, Option<QuantityRange>, RuleOrigin, Option<QuantityRange>);

/// Quote `product` once per quantity band.
///
/// A band is a maximal run of quantities resolved by the same quantity tier and
/// the same print tier, so a category override that covers only part of a global
/// tier splits it. Quantities no tier covers are left out. Rows are sorted by
/// quantity.
pub fn price_ladder(
    rules: &RuleSnapshot,
    product: &Product,
    color_count: u32,
    with_print: bool,
) -> Vec<LadderRow> {
    let category = product.product_type.as_str();
    let resolver = RuleResolver::new(rules);
    let colors = if with_print { color_count } else { 0 };

    let mut rows = Vec::new();
    let mut open: Option<(BandKey, LadderRow)> = None;
    let mut bounds = breakpoints(rules, category, colors).into_iter().peekable();

    while let Some(start) = bounds.next() {
        let end = bounds
            .peek()
            .map_or(u32::MAX, |next| next.saturating_sub(1));

        let multiplier = resolver.resolve_quantity_multiplier(category, start);
        let print = resolver.resolve_print_price(category, start, colors);
        let key = (multiplier.origin, multiplier.range, print.origin, print.range);

        if let Some((open_key, row)) = open.as_mut()
            && *open_key == key
        {
            row.range = QuantityRange::new(row.range.start(), end);
            continue;
        }

        rows.extend(open.take().map(|(_, row)| row));

        if multiplier.range.is_none() && print.range.is_none() {
            continue;
        }

        let mut input = PriceInput::new(product, start);

        if with_print {
            input = input.with_print(color_count);
        }

        let row = LadderRow {
            range: QuantityRange::new(start, end),
            quantity: start,
            origin: multiplier.origin,
            price: calculate_price(rules, &input),
        };

        open = Some((key, row));
    }

    rows.extend(open.map(|(_, row)| row));
    rows
}

/// Every orderable quantity at which the covering set of tiers can change.
fn breakpoints(rules: &RuleSnapshot, category: &str, colors_count: u32) -> Vec<u32> {
    let quantity = rules
        .category_quantity_tiers(category)
        .iter()
        .chain(rules.quantity_tiers())
        .map(Tier::range);

    let print = rules
        .category_print_tiers(category)
        .iter()
        .chain(rules.print_tiers())
        .filter(|tier| colors_count > 0 && tier.colors_count == colors_count)
        .map(Tier::range);

    let mut points: Vec<u32> = quantity
        .chain(print)
        .filter(QuantityRange::is_well_formed)
        .flat_map(|range| [Some(range.start().max(1)), range.end().checked_add(1)])
        .flatten()
        .collect();

    points.sort_unstable();
    points.dedup();
    points
}

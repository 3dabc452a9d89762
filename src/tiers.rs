//! Tiers
//!
//! Quantity discount bands and per-color print cost bands. Ranges are inclusive on
//! both ends, and the "open ended" upper bound used by the admin screens (`9999`)
//! is an ordinary integer, so every comparison here is a plain integer comparison.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An inclusive quantity range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuantityRange {
    start: u32,
    end: u32,
}

impl QuantityRange {
    /// Create a new range. `end` is inclusive.
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// First quantity in the range.
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last quantity in the range.
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Whether `quantity` falls inside the range, bounds included.
    pub const fn contains(&self, quantity: u32) -> bool {
        self.start <= quantity && quantity <= self.end
    }

    /// Whether two ranges share at least one quantity.
    pub const fn overlaps(&self, other: &QuantityRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// A range is well formed when `start <= end`.
    pub const fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }
}

impl fmt::Display for QuantityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Anything that applies over a quantity range.
pub trait Tier {
    /// The quantity range this tier covers.
    fn range(&self) -> QuantityRange;

    /// Whether `quantity` is covered by this tier.
    fn covers(&self, quantity: u32) -> bool {
        self.range().contains(quantity)
    }
}

/// Bulk discount band: orders in range pay `base_price * multiplier` per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityTier {
    /// First quantity of the band.
    pub range_start: u32,

    /// Last quantity of the band, inclusive.
    pub range_end: u32,

    /// Unit price multiplier, expected in `(0, 1]`.
    pub multiplier: Decimal,
}

impl QuantityTier {
    /// Create a new quantity tier.
    pub fn new(range_start: u32, range_end: u32, multiplier: Decimal) -> Self {
        Self {
            range_start,
            range_end,
            multiplier,
        }
    }
}

impl Tier for QuantityTier {
    fn range(&self) -> QuantityRange {
        QuantityRange::new(self.range_start, self.range_end)
    }
}

/// Added per-unit cost of printing `colors_count` colors for quantities in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintPriceTier {
    /// First quantity of the band.
    pub range_start: u32,

    /// Last quantity of the band, inclusive.
    pub range_end: u32,

    /// Number of print colors this price applies to.
    pub colors_count: u32,

    /// Added cost per printed item.
    pub price_per_item: Decimal,
}

impl PrintPriceTier {
    /// Create a new print price tier.
    pub fn new(range_start: u32, range_end: u32, colors_count: u32, price_per_item: Decimal) -> Self {
        Self {
            range_start,
            range_end,
            colors_count,
            price_per_item,
        }
    }

    /// Whether this tier prices `colors_count` colors at `quantity`.
    pub fn matches(&self, quantity: u32, colors_count: u32) -> bool {
        self.colors_count == colors_count && self.covers(quantity)
    }
}

impl Tier for PrintPriceTier {
    fn range(&self) -> QuantityRange {
        QuantityRange::new(self.range_start, self.range_end)
    }
}

/// A tier scoped to a single product category (product `type`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTier<T> {
    /// Category the override applies to.
    pub product_type: String,

    /// The overriding tier.
    #[serde(flatten)]
    pub tier: T,
}

impl<T> CategoryTier<T> {
    /// Scope `tier` to `product_type`.
    pub fn new(product_type: impl Into<String>, tier: T) -> Self {
        Self {
            product_type: product_type.into(),
            tier,
        }
    }
}

impl<T: Tier> Tier for CategoryTier<T> {
    fn range(&self) -> QuantityRange {
        self.tier.range()
    }
}

/// Category override of a [`QuantityTier`].
pub type CategoryQuantityTier = CategoryTier<QuantityTier>;

/// Category override of a [`PrintPriceTier`].
pub type CategoryPrintPriceTier = CategoryTier<PrintPriceTier>;

/// Find the first tier in `existing` whose range intersects `candidate`.
///
/// This is the check the pricing manager runs before saving a new range.
pub fn find_overlap<'a, T: Tier>(existing: &'a [T], candidate: QuantityRange) -> Option<&'a T> {
    existing
        .iter()
        .find(|tier| tier.range().overlaps(&candidate))
}

/// Quantity ranges in `[0, upto]` that no tier covers.
pub fn coverage_gaps<T: Tier>(tiers: &[T], upto: u32) -> Vec<QuantityRange> {
    let mut ranges: Vec<QuantityRange> = tiers
        .iter()
        .map(Tier::range)
        .filter(QuantityRange::is_well_formed)
        .collect();

    ranges.sort();

    let mut gaps = Vec::new();
    let mut next: Option<u32> = Some(0);

    for range in ranges {
        let Some(expected) = next else {
            break;
        };

        if expected > upto {
            break;
        }

        if range.start() > expected {
            gaps.push(QuantityRange::new(expected, (range.start() - 1).min(upto)));
        }

        if range.end() >= expected {
            next = range.end().checked_add(1);
        }
    }

    if let Some(expected) = next.filter(|expected| *expected <= upto) {
        gaps.push(QuantityRange::new(expected, upto));
    }

    gaps
}

/// Pairs of tiers (by index) whose ranges intersect.
pub fn overlapping_pairs<T: Tier>(tiers: &[T]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();

    for (i, a) in tiers.iter().enumerate() {
        for (j, b) in tiers.iter().enumerate().skip(i + 1) {
            if a.range().overlaps(&b.range()) {
                pairs.push((i, j));
            }
        }
    }

    pairs
}

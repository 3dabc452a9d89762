//! Products

use rust_decimal::Decimal;

/// Additive per-unit price delta for a product size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizePriceModifier {
    /// Size label, e.g. `"38x42"`.
    pub size: String,

    /// Amount added to the unit price for this size.
    pub price_modifier: Decimal,
}

/// Product
///
/// Only the base price and the category take part in rule resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product name
    pub name: String,

    /// Undiscounted unit price
    pub base_price: Decimal,

    /// Product category, used to select category pricing overrides
    pub product_type: String,

    /// Optional size surcharges
    pub sizes: Vec<SizePriceModifier>,
}

impl Product {
    /// Create a product without size modifiers.
    pub fn new(name: impl Into<String>, base_price: Decimal, product_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_price,
            product_type: product_type.into(),
            sizes: Vec::new(),
        }
    }

    /// Add a size surcharge.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>, price_modifier: Decimal) -> Self {
        self.sizes.push(SizePriceModifier {
            size: size.into(),
            price_modifier,
        });

        self
    }

    /// The surcharge defined for `size`, if any. First definition wins.
    pub fn size_modifier(&self, size: &str) -> Option<Decimal> {
        self.sizes
            .iter()
            .find(|modifier| modifier.size == size)
            .map(|modifier| modifier.price_modifier)
    }
}

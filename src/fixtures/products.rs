//! Product Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, SizePriceModifier},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product category
    #[serde(rename = "type")]
    pub product_type: String,

    /// Base price (e.g., "4.50 EUR")
    pub base_price: String,

    /// Size surcharges (size label -> amount, e.g. "0.50")
    #[serde(default)]
    pub sizes: Vec<SizeFixture>,
}

/// Size surcharge fixture
#[derive(Debug, Deserialize)]
pub struct SizeFixture {
    /// Size label
    pub size: String,

    /// Surcharge amount in the product's currency (e.g., "0.50")
    pub price_modifier: String,
}

impl ProductFixture {
    /// Convert into a [`Product`], returning the currency its price was given in.
    ///
    /// # Errors
    ///
    /// Returns an error if the price or a size surcharge cannot be parsed, or if the
    /// base price is negative.
    pub fn try_into_product(self) -> Result<(Product, &'static Currency), FixtureError> {
        let (base_price, currency) = parse_price(&self.base_price)?;

        if base_price.is_sign_negative() {
            return Err(FixtureError::InvalidPrice(self.base_price));
        }

        let sizes = self
            .sizes
            .into_iter()
            .map(|size| {
                Ok(SizePriceModifier {
                    price_modifier: parse_amount(&size.price_modifier)?,
                    size: size.size,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let product = Product {
            name: self.name,
            base_price,
            product_type: self.product_type,
            sizes,
        };

        Ok((product, currency))
    }
}

/// Parse price string (e.g., "4.50 EUR") into an amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = parse_amount(amount)?;
    let currency = parse_currency(currency_code)?;

    Ok((amount, currency))
}

/// Parse a bare decimal amount (e.g., "0.50").
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_amount(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}

/// Look up a supported currency by ISO code.
///
/// # Errors
///
/// Returns an error if the currency code is not recognized.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99EUR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_keeps_exact_decimal() -> Result<(), FixtureError> {
        let (amount, currency) = parse_price("4.35 EUR")?;

        assert_eq!(amount, Decimal::new(435, 2));
        assert_eq!(currency, EUR);

        Ok(())
    }

    #[test]
    fn product_fixture_converts_sizes() -> Result<(), FixtureError> {
        let fixture = ProductFixture {
            name: "Cotton tote".to_string(),
            product_type: "cotton".to_string(),
            base_price: "3.20 EUR".to_string(),
            sizes: vec![SizeFixture {
                size: "50x50".to_string(),
                price_modifier: "0.40".to_string(),
            }],
        };

        let (product, currency) = fixture.try_into_product()?;

        assert_eq!(currency, EUR);
        assert_eq!(product.base_price, Decimal::new(320, 2));
        assert_eq!(product.size_modifier("50x50"), Some(Decimal::new(40, 2)));

        Ok(())
    }

    #[test]
    fn product_fixture_rejects_negative_price() {
        let fixture = ProductFixture {
            name: "Broken".to_string(),
            product_type: "cotton".to_string(),
            base_price: "-1.00 EUR".to_string(),
            sizes: vec![],
        };

        assert!(matches!(
            fixture.try_into_product(),
            Err(FixtureError::InvalidPrice(_))
        ));
    }
}

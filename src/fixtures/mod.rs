//! Fixtures
//!
//! YAML rule and product sets. A set named `default` lives in
//! `<base>/rules/default.yml` and `<base>/products/default.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    fixtures::products::ProductsFixture,
    products::Product,
    rules::{RuleSet, RuleSnapshot},
    store::{RuleSource, RuleSourceError},
};

pub mod products;
pub mod rules;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid pricing rule
    #[error("Invalid pricing rule: {0}")]
    InvalidRule(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products by fixture key
    products: FxHashMap<String, Product>,

    /// Rules as stored
    rules: RuleSet,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            rules: RuleSet::default(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let (product, currency) = product_fixture.try_into_product()?;

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.insert(key, product);
        }

        Ok(self)
    }

    /// Load pricing rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a rule is malformed.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.rules = read_rules(&self.rules_path(name))?;

        Ok(self)
    }

    /// Load a complete fixture set (products and rules with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from `base_path`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture.load_products(name)?.load_rules(name)?;

        Ok(fixture)
    }

    /// Path of the rules file for set `name`
    pub fn rules_path(&self, name: &str) -> PathBuf {
        self.base_path.join("rules").join(format!("{name}.yml"))
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// All products with their keys, sorted by key
    pub fn products(&self) -> Vec<(&str, &Product)> {
        let mut products: Vec<(&str, &Product)> = self
            .products
            .iter()
            .map(|(key, product)| (key.as_str(), product))
            .collect();

        products.sort_unstable_by_key(|(key, _)| *key);
        products
    }

    /// Rules as loaded
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// An immutable snapshot of the loaded rules
    pub fn snapshot(&self) -> RuleSnapshot {
        RuleSnapshot::from(self.rules.clone())
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and validate a rules file.
fn read_rules(path: &Path) -> Result<RuleSet, FixtureError> {
    let contents = fs::read_to_string(path)?;
    let set: RuleSet = serde_norway::from_str(&contents)?;

    rules::validate_rule_set(&set)?;

    Ok(set)
}

/// A [`RuleSource`] that rereads a YAML rules file on every fetch.
#[derive(Debug, Clone)]
pub struct YamlRuleSource {
    path: PathBuf,
}

impl YamlRuleSource {
    /// Read rules from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RuleSource for YamlRuleSource {
    async fn fetch_rules(&self) -> Result<RuleSnapshot, RuleSourceError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(FixtureError::from)?;

        let set: RuleSet = serde_norway::from_str(&contents).map_err(FixtureError::from)?;

        rules::validate_rule_set(&set)?;

        Ok(RuleSnapshot::from(set))
    }
}

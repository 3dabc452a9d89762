//! Quote rendering
//!
//! Terminal tables for quotes, price ladders and rule integrity reports. Amounts
//! are exact decimals until they reach this module; here they become
//! [`Money`] purely for display.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    pricing::{LadderRow, PriceInput, PriceResult},
    resolver::RuleOrigin,
    rules::{IntegrityFinding, IntegrityReport, RuleScope},
};

/// Errors that can occur while writing a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Writing to the output failed.
    #[error("failed to write quote: {0}")]
    Io(#[from] io::Error),
}

/// Writes quotes as tables in one currency.
#[derive(Debug, Clone, Copy)]
pub struct QuoteRenderer {
    currency: &'static Currency,
}

impl QuoteRenderer {
    /// Render amounts in `currency`.
    pub const fn new(currency: &'static Currency) -> Self {
        Self { currency }
    }

    /// Format an amount in the renderer's currency.
    pub fn money(&self, amount: Decimal) -> String {
        Money::from_decimal(amount, self.currency).to_string()
    }

    /// Write a single itemised quote.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Io`] if writing fails.
    pub fn write_quote(
        &self,
        out: &mut impl io::Write,
        input: &PriceInput<'_>,
        result: &PriceResult,
    ) -> Result<(), QuoteError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Amount"]);
        builder.push_record(["Product".to_string(), input.product.name.clone()]);
        builder.push_record(["Category".to_string(), input.product.product_type.clone()]);
        builder.push_record(["Quantity".to_string(), input.quantity.to_string()]);
        builder.push_record(["Base price".to_string(), self.money(result.base_price)]);
        builder.push_record([
            format!("Discount (x{})", result.breakdown.multiplier.normalize()),
            format!("-{}", self.money(result.breakdown.discount)),
        ]);

        if input.with_print {
            builder.push_record([
                format!("Print ({} colors)", input.color_count),
                self.money(result.print_cost),
            ]);
        }

        if let Some(size) = input.size {
            builder.push_record([
                format!("Size {size}"),
                self.money(result.breakdown.size_modifier),
            ]);
        }

        builder.push_record(["Price per item".to_string(), self.money(result.price_per_item)]);
        builder.push_record(["Total".to_string(), self.money(result.total_price)]);

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Rows::last(), Color::BOLD);
        table.modify(Columns::new(1..2), Alignment::right());

        writeln!(out, "{table}")?;

        Ok(())
    }

    /// Write a price ladder, one row per quantity band.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Io`] if writing fails.
    pub fn write_ladder(
        &self,
        out: &mut impl io::Write,
        rows: &[LadderRow],
    ) -> Result<(), QuoteError> {
        let mut builder = Builder::default();

        builder.push_record(["Quantity", "Rule", "Discount", "Print", "Per item"]);

        for row in rows {
            builder.push_record([
                row.range.to_string(),
                origin_label(row.origin).to_string(),
                self.money(row.price.breakdown.discount),
                self.money(row.price.print_cost),
                self.money(row.price.price_per_item),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "{table}")?;

        Ok(())
    }

    /// Write the findings of a rule integrity check.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Io`] if writing fails.
    pub fn write_integrity(
        &self,
        out: &mut impl io::Write,
        report: &IntegrityReport,
    ) -> Result<(), QuoteError> {
        if report.is_clean() {
            writeln!(out, "No overlapping or missing tiers.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["Scope", "Colors", "Problem"]);

        for finding in report.findings() {
            let (scope, colors_count, problem) = match finding {
                IntegrityFinding::Overlap {
                    scope,
                    colors_count,
                    first,
                    second,
                } => (scope, colors_count, format!("{second} overlaps {first}")),
                IntegrityFinding::Gap {
                    scope,
                    colors_count,
                    range,
                } => (scope, colors_count, format!("{range} not covered")),
            };

            builder.push_record([
                scope_label(scope),
                colors_count.map(|colors| colors.to_string()).unwrap_or_default(),
                problem,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);

        writeln!(out, "{table}")?;

        Ok(())
    }
}

fn origin_label(origin: RuleOrigin) -> &'static str {
    match origin {
        RuleOrigin::Category => "category",
        RuleOrigin::Global => "global",
        RuleOrigin::Default => "none",
    }
}

fn scope_label(scope: &RuleScope) -> String {
    match scope {
        RuleScope::Global => "global".to_string(),
        RuleScope::Category(category) => category.clone(),
    }
}

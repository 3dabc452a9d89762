//! Rule Snapshot
//!
//! An immutable, point-in-time copy of the four pricing rule collections. Category
//! overrides are indexed by category on construction; each category keeps the
//! order its tiers had in the flat list, so "first match wins" means the same
//! thing whether you scan the index or the original list.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::tiers::{
    CategoryPrintPriceTier, CategoryQuantityTier, CategoryTier, PrintPriceTier, QuantityRange,
    QuantityTier, Tier, coverage_gaps, overlapping_pairs,
};

/// The flat, storage-shaped form of a rule snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Global quantity discount tiers
    #[serde(default)]
    pub quantity_tiers: Vec<QuantityTier>,

    /// Global print price tiers
    #[serde(default)]
    pub print_tiers: Vec<PrintPriceTier>,

    /// Category quantity discount overrides
    #[serde(default)]
    pub category_quantity_tiers: Vec<CategoryQuantityTier>,

    /// Category print price overrides
    #[serde(default)]
    pub category_print_tiers: Vec<CategoryPrintPriceTier>,
}

/// Read-only view of every pricing rule, as of one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSnapshot {
    quantity_tiers: Vec<QuantityTier>,
    print_tiers: Vec<PrintPriceTier>,
    category_quantity_tiers: FxHashMap<String, Vec<QuantityTier>>,
    category_print_tiers: FxHashMap<String, Vec<PrintPriceTier>>,
}

impl RuleSnapshot {
    /// Build a snapshot from the four flat rule lists.
    pub fn new(
        quantity_tiers: Vec<QuantityTier>,
        print_tiers: Vec<PrintPriceTier>,
        category_quantity_tiers: Vec<CategoryQuantityTier>,
        category_print_tiers: Vec<CategoryPrintPriceTier>,
    ) -> Self {
        Self {
            quantity_tiers,
            print_tiers,
            category_quantity_tiers: group_by_category(category_quantity_tiers),
            category_print_tiers: group_by_category(category_print_tiers),
        }
    }

    /// A snapshot with no rules; everything resolves to the fail-open defaults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Global quantity discount tiers, in list order.
    pub fn quantity_tiers(&self) -> &[QuantityTier] {
        &self.quantity_tiers
    }

    /// Global print price tiers, in list order.
    pub fn print_tiers(&self) -> &[PrintPriceTier] {
        &self.print_tiers
    }

    /// Quantity overrides for `category`, in list order. Empty for unknown categories.
    pub fn category_quantity_tiers(&self, category: &str) -> &[QuantityTier] {
        self.category_quantity_tiers
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Print overrides for `category`, in list order. Empty for unknown categories.
    pub fn category_print_tiers(&self, category: &str) -> &[PrintPriceTier] {
        self.category_print_tiers
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories that carry at least one override, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .category_quantity_tiers
            .keys()
            .chain(self.category_print_tiers.keys())
            .map(String::as_str)
            .collect();

        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Check every scope for overlapping ranges and for gaps in `[0, upto]`.
    ///
    /// Purely informational; resolution never consults this.
    pub fn integrity_report(&self, upto: u32) -> IntegrityReport {
        let mut findings = Vec::new();

        inspect_quantity_scope(&mut findings, &RuleScope::Global, &self.quantity_tiers, upto);
        inspect_print_scope(&mut findings, &RuleScope::Global, &self.print_tiers, upto);

        for category in self.categories() {
            let scope = RuleScope::Category(category.to_string());

            // Category overrides are sparse by design; only overlaps are findings.
            let quantity = self.category_quantity_tiers(category);
            findings.extend(overlap_findings(&scope, None, quantity));

            for (colors_count, tiers) in by_colors(self.category_print_tiers(category)) {
                findings.extend(overlap_findings(&scope, Some(colors_count), &tiers));
            }
        }

        IntegrityReport { findings }
    }
}

impl From<RuleSet> for RuleSnapshot {
    fn from(set: RuleSet) -> Self {
        Self::new(
            set.quantity_tiers,
            set.print_tiers,
            set.category_quantity_tiers,
            set.category_print_tiers,
        )
    }
}

fn group_by_category<T>(tiers: Vec<CategoryTier<T>>) -> FxHashMap<String, Vec<T>> {
    let mut grouped: FxHashMap<String, Vec<T>> = FxHashMap::default();

    for scoped in tiers {
        grouped
            .entry(scoped.product_type)
            .or_default()
            .push(scoped.tier);
    }

    grouped
}

/// Which rule collection a finding belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    /// The global tiers.
    Global,

    /// The overrides of one category.
    Category(String),
}

/// A single integrity problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityFinding {
    /// Two tiers in the same scope cover a common quantity. The first one in list
    /// order wins during resolution.
    Overlap {
        /// Where the tiers live
        scope: RuleScope,
        /// Color count, for print tiers
        colors_count: Option<u32>,
        /// Range that wins
        first: QuantityRange,
        /// Range that is shadowed
        second: QuantityRange,
    },

    /// Quantities no tier covers; these resolve to the fail-open default.
    Gap {
        /// Where the gap is
        scope: RuleScope,
        /// Color count, for print tiers
        colors_count: Option<u32>,
        /// Uncovered quantities
        range: QuantityRange,
    },
}

/// Result of [`RuleSnapshot::integrity_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    findings: Vec<IntegrityFinding>,
}

impl IntegrityReport {
    /// All findings, global scope first.
    pub fn findings(&self) -> &[IntegrityFinding] {
        &self.findings
    }

    /// Whether no problems were found.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

fn inspect_quantity_scope(
    findings: &mut Vec<IntegrityFinding>,
    scope: &RuleScope,
    tiers: &[QuantityTier],
    upto: u32,
) {
    findings.extend(overlap_findings(scope, None, tiers));
    findings.extend(gap_findings(scope, None, tiers, upto));
}

fn inspect_print_scope(
    findings: &mut Vec<IntegrityFinding>,
    scope: &RuleScope,
    tiers: &[PrintPriceTier],
    upto: u32,
) {
    for (colors_count, tiers) in by_colors(tiers) {
        findings.extend(overlap_findings(scope, Some(colors_count), &tiers));
        findings.extend(gap_findings(scope, Some(colors_count), &tiers, upto));
    }
}

/// Split print tiers by color count, ascending, keeping list order within each.
fn by_colors(tiers: &[PrintPriceTier]) -> Vec<(u32, Vec<PrintPriceTier>)> {
    let mut grouped: Vec<(u32, Vec<PrintPriceTier>)> = Vec::new();

    for tier in tiers {
        match grouped.iter_mut().find(|(colors, _)| *colors == tier.colors_count) {
            Some((_, group)) => group.push(tier.clone()),
            None => grouped.push((tier.colors_count, vec![tier.clone()])),
        }
    }

    grouped.sort_by_key(|(colors, _)| *colors);
    grouped
}

fn overlap_findings<T: Tier>(
    scope: &RuleScope,
    colors_count: Option<u32>,
    tiers: &[T],
) -> Vec<IntegrityFinding> {
    overlapping_pairs(tiers)
        .into_iter()
        .filter_map(|(i, j)| Some((tiers.get(i)?.range(), tiers.get(j)?.range())))
        .map(|(first, second)| IntegrityFinding::Overlap {
            scope: scope.clone(),
            colors_count,
            first,
            second,
        })
        .collect()
}

fn gap_findings<T: Tier>(
    scope: &RuleScope,
    colors_count: Option<u32>,
    tiers: &[T],
    upto: u32,
) -> Vec<IntegrityFinding> {
    coverage_gaps(tiers, upto)
        .into_iter()
        .map(|range| IntegrityFinding::Gap {
            scope: scope.clone(),
            colors_count,
            range,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn snapshot() -> RuleSnapshot {
        RuleSnapshot::new(
            vec![
                QuantityTier::new(0, 99, Decimal::ONE),
                QuantityTier::new(100, 499, Decimal::new(95, 2)),
                QuantityTier::new(500, 9999, Decimal::new(85, 2)),
            ],
            vec![
                PrintPriceTier::new(0, 9999, 1, Decimal::new(20, 2)),
                PrintPriceTier::new(0, 9999, 2, Decimal::new(30, 2)),
            ],
            vec![
                CategoryTier::new("paper", QuantityTier::new(100, 499, Decimal::new(9, 1))),
                CategoryTier::new("cotton", QuantityTier::new(500, 9999, Decimal::new(8, 1))),
                CategoryTier::new("paper", QuantityTier::new(500, 9999, Decimal::new(75, 2))),
            ],
            vec![CategoryTier::new(
                "cotton",
                PrintPriceTier::new(0, 9999, 1, Decimal::new(15, 2)),
            )],
        )
    }

    #[test]
    fn category_index_preserves_list_order() {
        let rules = snapshot();

        assert_eq!(
            rules.category_quantity_tiers("paper"),
            &[
                QuantityTier::new(100, 499, Decimal::new(9, 1)),
                QuantityTier::new(500, 9999, Decimal::new(75, 2)),
            ]
        );
    }

    #[test]
    fn unknown_category_has_no_overrides() {
        let rules = snapshot();

        assert!(rules.category_quantity_tiers("jute").is_empty());
        assert!(rules.category_print_tiers("jute").is_empty());
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        assert_eq!(snapshot().categories(), vec!["cotton", "paper"]);
    }

    #[test]
    fn rule_set_converts_into_snapshot() {
        let set = RuleSet {
            quantity_tiers: vec![QuantityTier::new(0, 9999, Decimal::ONE)],
            category_print_tiers: vec![CategoryTier::new(
                "paper",
                PrintPriceTier::new(0, 9999, 1, Decimal::new(10, 2)),
            )],
            ..RuleSet::default()
        };

        let rules = RuleSnapshot::from(set);

        assert_eq!(rules.quantity_tiers().len(), 1);
        assert_eq!(rules.category_print_tiers("paper").len(), 1);
    }

    #[test]
    fn clean_rules_produce_clean_report() {
        assert!(snapshot().integrity_report(9999).is_clean());
    }

    #[test]
    fn report_lists_global_gap_and_category_overlap() {
        let rules = RuleSnapshot::new(
            vec![QuantityTier::new(1, 9999, Decimal::ONE)],
            vec![],
            vec![
                CategoryTier::new("paper", QuantityTier::new(100, 499, Decimal::new(9, 1))),
                CategoryTier::new("paper", QuantityTier::new(400, 999, Decimal::new(8, 1))),
            ],
            vec![],
        );

        let report = rules.integrity_report(9999);

        assert_eq!(
            report.findings(),
            &[
                IntegrityFinding::Gap {
                    scope: RuleScope::Global,
                    colors_count: None,
                    range: QuantityRange::new(0, 0),
                },
                IntegrityFinding::Overlap {
                    scope: RuleScope::Category("paper".to_string()),
                    colors_count: None,
                    first: QuantityRange::new(100, 499),
                    second: QuantityRange::new(400, 999),
                },
            ]
        );
    }

    #[test]
    fn print_tiers_are_checked_per_color_count() {
        let rules = RuleSnapshot::new(
            vec![QuantityTier::new(0, 9999, Decimal::ONE)],
            vec![
                PrintPriceTier::new(0, 9999, 1, Decimal::new(20, 2)),
                PrintPriceTier::new(0, 499, 2, Decimal::new(30, 2)),
            ],
            vec![],
            vec![],
        );

        let report = rules.integrity_report(9999);

        assert_eq!(
            report.findings(),
            &[IntegrityFinding::Gap {
                scope: RuleScope::Global,
                colors_count: Some(2),
                range: QuantityRange::new(500, 9999),
            }]
        );
    }
}

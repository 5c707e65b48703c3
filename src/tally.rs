//! Per-category spinor counts.
//!
//! Each classified row of the orbital table is a Kramers pair and therefore
//! contributes two spinors to its category. Unused rows are not counted.

use crate::category::Category;
use crate::snapshot::{ClassificationSnapshot, MoltraUsage};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of spinors in each classified category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    counts: BTreeMap<Category, u32>,
}

impl CategoryTally {
    /// Adds one row (two spinors) to its category. Unused rows are ignored.
    pub fn add(&mut self, category: Category) {
        if category.is_used() {
            *self.counts.entry(category).or_insert(0) += 2;
        }
    }

    /// Spinor count of a category (zero when absent).
    pub fn count(&self, category: Category) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Inactive spinors.
    pub fn inactive(&self) -> u32 {
        self.count(Category::Inactive)
    }

    /// RAS1 + RAS2 + RAS3 spinors.
    pub fn active_space(&self) -> u32 {
        self.count(Category::Ras1) + self.count(Category::Active) + self.count(Category::Ras3)
    }

    /// Secondary spinors.
    pub fn secondary(&self) -> u32 {
        self.count(Category::Secondary)
    }

    /// Sum over all categories.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Display line of one category, e.g. `"ras1: 4"`.
    pub fn label(&self, category: Category) -> String {
        format!("{}: {}", category.summary_label(), self.count(category))
    }
}

/// Walks the snapshot once, counting categories and filling the MOLTRA ledger.
pub fn tally(snapshot: &ClassificationSnapshot) -> (CategoryTally, MoltraUsage) {
    let mut counts = CategoryTally::default();
    let mut usage = MoltraUsage::default();

    for entry in snapshot.entries() {
        usage.record(&entry.symmetry, entry.index, entry.category);
        counts.add(entry.category);
    }

    (counts, usage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::OrbitalEntry;

    fn snapshot(categories: &[Category]) -> ClassificationSnapshot {
        let entries = categories
            .iter()
            .enumerate()
            .map(|(i, c)| OrbitalEntry::new("E1", i as u32 + 1, *c))
            .collect();
        ClassificationSnapshot::from_entries(entries).unwrap()
    }

    #[test]
    fn test_scenario_tally() {
        let snap = snapshot(&[
            Category::Ras1,
            Category::Ras1,
            Category::Unused,
            Category::Active,
            Category::Active,
            Category::Unused,
        ]);
        let (counts, usage) = tally(&snap);
        assert_eq!(counts.count(Category::Ras1), 4);
        assert_eq!(counts.count(Category::Active), 4);
        assert_eq!(counts.count(Category::Inactive), 0);
        assert_eq!(counts.count(Category::Unused), 0);
        assert_eq!(usage.used_indices(&"E1".into()), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_total_is_twice_used_rows() {
        let cases: [&[Category]; 4] = [
            &[],
            &[Category::Unused, Category::Unused],
            &[Category::Inactive, Category::Secondary, Category::Unused],
            &[
                Category::Inactive,
                Category::Ras1,
                Category::Active,
                Category::Ras3,
                Category::Secondary,
                Category::Unused,
                Category::Active,
            ],
        ];
        for categories in cases {
            let (counts, _) = tally(&snapshot(categories));
            let used = categories.iter().filter(|c| c.is_used()).count() as u32;
            assert_eq!(counts.total(), 2 * used);
        }
    }

    #[test]
    fn test_active_space_sum_and_labels() {
        let (counts, _) = tally(&snapshot(&[
            Category::Ras1,
            Category::Active,
            Category::Active,
            Category::Ras3,
            Category::Inactive,
        ]));
        assert_eq!(counts.active_space(), 8);
        assert_eq!(counts.inactive(), 2);
        assert_eq!(counts.label(Category::Active), "active, ras2: 4");
        assert_eq!(counts.label(Category::Secondary), "secondary: 0");
    }
}

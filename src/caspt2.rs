//! DIRAC-CASPT2 main input block.
//!
//! Builds the `.ninact ... .end` block that drives the CASPT2 run itself from
//! the category tally, the molecule context and the user input. RAS keywords
//! are only written when RAS1 or RAS3 is populated; a plain CASPT2 active
//! space needs none of them.
//!
//! RAS spinor indices are counted inside the active space: the RAS1, RAS2 and
//! RAS3 rows in table order, two spinors per row, starting at 1.

use crate::category::Category;
use crate::config::{MoleculeInfo, UserInput};
use crate::range;
use crate::snapshot::ClassificationSnapshot;
use crate::tally::CategoryTally;
use std::collections::BTreeMap;

/// Spinor ranges of the three active-space partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasRanges {
    /// RAS1 spinors in range notation
    pub ras1: String,
    /// RAS2 spinors in range notation
    pub ras2: String,
    /// RAS3 spinors in range notation
    pub ras3: String,
}

impl RasRanges {
    /// Numbers the active-space spinors in table order and compresses them.
    pub fn from_snapshot(snapshot: &ClassificationSnapshot) -> Self {
        let mut spinors: BTreeMap<Category, Vec<u32>> = BTreeMap::new();
        let mut next = 1;
        for entry in snapshot.entries() {
            if entry.category.is_active_space() {
                spinors
                    .entry(entry.category)
                    .or_default()
                    .extend([next, next + 1]);
                next += 2;
            }
        }

        let compress = |category: Category| {
            spinors
                .get(&category)
                .map(|indices| range::compress(indices))
                .unwrap_or_default()
        };
        Self {
            ras1: compress(Category::Ras1),
            ras2: compress(Category::Active),
            ras3: compress(Category::Ras3),
        }
    }
}

/// Active electrons: all electrons not held by inactive spinors.
pub fn active_electrons(info: &MoleculeInfo, counts: &CategoryTally) -> u32 {
    info.electron_number.saturating_sub(counts.inactive())
}

/// Renders the CASPT2 input block.
pub fn render_caspt2_input(
    snapshot: &ClassificationSnapshot,
    counts: &CategoryTally,
    info: &MoleculeInfo,
    input: &UserInput,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(".ninact\n{}\n", counts.inactive()));
    out.push_str(&format!(".nact\n{}\n", counts.active_space()));
    out.push_str(&format!(".nsec\n{}\n", counts.secondary()));
    out.push_str(&format!(".nelec\n{}\n", active_electrons(info, counts)));
    out.push_str(&format!(".caspt2_ciroots\n{} {}\n", input.totsym, input.selectroot));
    out.push_str(&format!(".eshift\n{}\n", input.eshift));
    out.push_str(&format!(".pshift\n{}\n", input.pshift));

    if counts.count(Category::Ras1) > 0 || counts.count(Category::Ras3) > 0 {
        let ranges = RasRanges::from_snapshot(snapshot);
        out.push_str(&format!(".ras1\n{}\n{}\n", ranges.ras1, input.ras1_max_hole.value()));
        out.push_str(&format!(".ras2\n{}\n", ranges.ras2));
        out.push_str(&format!(".ras3\n{}\n{}\n", ranges.ras3, input.ras3_max_electron.value()));
    }

    out.push_str(&format!(".diracver\n{}\n", input.diracver));
    if let Some(scheme) = &info.moltra_scheme {
        out.push_str(&format!(".scheme\n{}\n", scheme));
    }
    out.push_str(".end\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::OrbitalEntry;
    use crate::tally::tally;

    fn table(categories: &[Category]) -> ClassificationSnapshot {
        ClassificationSnapshot::from_entries(
            categories
                .iter()
                .enumerate()
                .map(|(i, c)| OrbitalEntry::new("E1", i as u32 + 1, *c))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_ras_ranges_count_active_space_only() {
        let snapshot = table(&[
            Category::Inactive,
            Category::Ras1,
            Category::Ras1,
            Category::Active,
            Category::Secondary,
            Category::Ras3,
        ]);
        let ranges = RasRanges::from_snapshot(&snapshot);
        assert_eq!(ranges.ras1, "1..4");
        assert_eq!(ranges.ras2, "5..6");
        assert_eq!(ranges.ras3, "7..8");
    }

    #[test]
    fn test_plain_cas_has_no_ras_keys() {
        let snapshot = table(&[Category::Inactive, Category::Active, Category::Active, Category::Secondary]);
        let (counts, _) = tally(&snapshot);
        let info = MoleculeInfo::new(None, 6);
        let text = render_caspt2_input(&snapshot, &counts, &info, &UserInput::default());
        assert_eq!(
            text,
            ".ninact\n2\n.nact\n4\n.nsec\n2\n.nelec\n4\n.caspt2_ciroots\n1 1\n\
             .eshift\n0\n.pshift\n0\n.diracver\n21\n.end\n"
        );
    }

    #[test]
    fn test_ras_keys_written_with_limits() {
        let snapshot = table(&[Category::Ras1, Category::Active, Category::Ras3]);
        let (counts, _) = tally(&snapshot);
        let info = MoleculeInfo {
            point_group: None,
            electron_number: 4,
            moltra_scheme: Some("6".to_string()),
        };
        let mut input = UserInput::default();
        input.ras1_max_hole.set(1);
        input.ras3_max_electron.set(2);
        let text = render_caspt2_input(&snapshot, &counts, &info, &input);
        assert!(text.contains(".ras1\n1..2\n1\n.ras2\n3..4\n.ras3\n5..6\n2\n"));
        assert!(text.contains(".scheme\n6\n.end\n"));
    }

    #[test]
    fn test_active_electrons_saturate() {
        let (counts, _) = tally(&table(&[Category::Inactive, Category::Inactive]));
        assert_eq!(active_electrons(&MoleculeInfo::new(None, 2), &counts), 0);
        assert_eq!(active_electrons(&MoleculeInfo::new(None, 10), &counts), 6);
    }
}

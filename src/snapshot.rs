//! Classification snapshots and the per-symmetry MOLTRA ledger.
//!
//! A [`ClassificationSnapshot`] is the complete orbital table at one point in
//! time: every spinor row with its symmetry label, index within that symmetry,
//! optional orbital energy and [`Category`]. Snapshots are immutable; an edit
//! produces a new snapshot which is handed to the controller as a whole.
//!
//! # Row order
//!
//! Rows are kept in the order they were supplied ("table row order"). The
//! parser preserves file order and the template generator writes rows in
//! ascending orbital energy. IVO parameter derivation walks rows in exactly
//! this order, so the order is part of the input contract.

use crate::category::Category;
use crate::range;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;

/// Errors raised when building or editing a snapshot.
#[derive(Error, Debug, PartialEq)]
pub enum SnapshotError {
    /// The same (symmetry, index) pair appears twice
    #[error("Duplicate orbital {symmetry} {index}")]
    Duplicate {
        /// Symmetry label of the duplicated row
        symmetry: String,
        /// Orbital index of the duplicated row
        index: u32,
    },
    /// Orbital indices are 1-based
    #[error("Orbital index must be positive ({symmetry} {index})")]
    ZeroIndex {
        /// Symmetry label of the offending row
        symmetry: String,
        /// The rejected index
        index: u32,
    },
    /// Edit refers to a row that does not exist
    #[error("No orbital {symmetry} {index} in the table")]
    UnknownOrbital {
        /// Requested symmetry label
        symmetry: String,
        /// Requested orbital index
        index: u32,
    },
}

/// Name of an irreducible representation, e.g. `E1g`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymmetryLabel(String);

impl SymmetryLabel {
    /// Creates a label from any string.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymmetryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymmetryLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// One spinor row of the orbital table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalEntry {
    /// Irreducible representation of the spinor
    pub symmetry: SymmetryLabel,
    /// 1-based index within the symmetry block
    pub index: u32,
    /// Orbital energy in hartree, when known
    pub energy: Option<f64>,
    /// Current classification
    pub category: Category,
}

impl OrbitalEntry {
    /// Creates a row without an orbital energy.
    pub fn new(symmetry: impl Into<SymmetryLabel>, index: u32, category: Category) -> Self {
        Self {
            symmetry: symmetry.into(),
            index,
            energy: None,
            category,
        }
    }

    /// Attaches an orbital energy.
    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }
}

/// Immutable view of the whole orbital table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationSnapshot {
    entries: Vec<OrbitalEntry>,
}

impl ClassificationSnapshot {
    /// Builds a snapshot, rejecting duplicate rows and zero indices.
    pub fn from_entries(entries: Vec<OrbitalEntry>) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.index == 0 {
                return Err(SnapshotError::ZeroIndex {
                    symmetry: entry.symmetry.to_string(),
                    index: entry.index,
                });
            }
            if !seen.insert((&entry.symmetry, entry.index)) {
                return Err(SnapshotError::Duplicate {
                    symmetry: entry.symmetry.to_string(),
                    index: entry.index,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Rows in table order.
    pub fn entries(&self) -> &[OrbitalEntry] {
        &self.entries
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The set of symmetry labels present in the table.
    pub fn symmetry_labels(&self) -> BTreeSet<&str> {
        self.entries.iter().map(|e| e.symmetry.as_str()).collect()
    }

    /// Looks up the category of a single row.
    pub fn category_of(&self, symmetry: &str, index: u32) -> Option<Category> {
        self.entries
            .iter()
            .find(|e| e.symmetry.as_str() == symmetry && e.index == index)
            .map(|e| e.category)
    }

    /// Returns a new snapshot with every row of `symmetry` covered by the
    /// inclusive `runs` reclassified.
    ///
    /// Each run must cover existing rows only. The first missing index is
    /// reported without walking the rest of the run.
    pub fn with_category_runs(
        &self,
        symmetry: &str,
        runs: &[(u32, u32)],
        category: Category,
    ) -> Result<Self, SnapshotError> {
        let present: BTreeSet<u32> = self
            .entries
            .iter()
            .filter(|e| e.symmetry.as_str() == symmetry)
            .map(|e| e.index)
            .collect();

        for &(start, end) in runs {
            let mut expected = u64::from(start);
            for &index in present.range(start..=end) {
                if u64::from(index) != expected {
                    break;
                }
                expected += 1;
            }
            if expected <= u64::from(end) {
                return Err(SnapshotError::UnknownOrbital {
                    symmetry: symmetry.to_string(),
                    // `expected` never exceeds `end` here, so it fits in u32.
                    index: u32::try_from(expected).unwrap_or(end),
                });
            }
        }

        let mut entries = self.entries.clone();
        for entry in entries.iter_mut().filter(|e| e.symmetry.as_str() == symmetry) {
            if runs.iter().any(|&(start, end)| (start..=end).contains(&entry.index)) {
                entry.category = category;
            }
        }
        Ok(Self { entries })
    }
}

/// Per-symmetry record of which orbitals take part in MOLTRA.
///
/// `usage[s][i]` is `true` exactly when row `(s, i)` is not
/// [`Category::Unused`]. The ledger is always rebuilt from a full snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoltraUsage {
    usage: BTreeMap<SymmetryLabel, BTreeMap<u32, bool>>,
}

impl MoltraUsage {
    /// Records the usage flag of one row.
    pub fn record(&mut self, symmetry: &SymmetryLabel, index: u32, category: Category) {
        self.usage
            .entry(symmetry.clone())
            .or_default()
            .insert(index, category.is_used());
    }

    /// Builds the ledger from a whole snapshot.
    pub fn from_snapshot(snapshot: &ClassificationSnapshot) -> Self {
        let mut usage = Self::default();
        for entry in snapshot.entries() {
            usage.record(&entry.symmetry, entry.index, entry.category);
        }
        usage
    }

    /// Sorted used indices of one symmetry block.
    pub fn used_indices(&self, symmetry: &SymmetryLabel) -> Vec<u32> {
        self.usage
            .get(symmetry)
            .map(|orbitals| {
                orbitals
                    .iter()
                    .filter(|(_, used)| **used)
                    .map(|(index, _)| *index)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Range notation per symmetry label, in label order.
    pub fn ranges(&self) -> Vec<(&SymmetryLabel, String)> {
        self.usage
            .keys()
            .map(|label| (label, range::compress(&self.used_indices(label))))
            .collect()
    }

    /// The recommended MOLTRA setting shown in the summary panel.
    ///
    /// Each symmetry label starts a new line, followed by its ranges.
    pub fn recommended_setting(&self) -> String {
        let mut text = String::from("Recommended MOLTRA setting: ");
        for (label, ranges) in self.ranges() {
            text.push_str(&format!("\n {}", label));
            if !ranges.is_empty() {
                text.push(' ');
                text.push_str(&ranges);
            }
        }
        text
    }
}

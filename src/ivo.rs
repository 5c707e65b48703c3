//! Improved Virtual Orbitals (IVO) parameter derivation.
//!
//! Before the CASPT2 step, DIRAC-CASPT2 can run an IVO pre-step that needs to
//! know how many spinors are occupied in each symmetry and how many trailing
//! virtual spinors should be cut away. Both are derived from the orbital table
//! by walking its rows in table order with a declining electron counter:
//!
//! 1. While electrons remain, the row is occupied: it counts towards
//!    `nocc[symmetry]` and `nact`, whatever its category.
//! 2. Once the electrons are used up, a classified row is a secondary
//!    spinor: it counts towards `nsec` and resets every cutoff bucket, so only
//!    unclassified virtuals above the last classified one are cut.
//! 3. An unclassified virtual row counts towards `nvcut[symmetry]`.
//!
//! The counter drops by two after every row. All counts are in spinors (two
//! per row).
//!
//! The rendered block has a fixed key order which downstream tools rely on:
//!
//! ```text
//! .ninact .nact .nsec .nelec .nocc(g/u) [.nvcut(g/u)] .totsym .diracver
//! [.scheme] .subprograms IVO .end
//! ```

use crate::category::Category;
use crate::config::{MoleculeInfo, UserInput};
use crate::snapshot::ClassificationSnapshot;
use serde::Serialize;
use std::collections::BTreeSet;

/// Shape of the per-symmetry buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymmetryScheme {
    /// Separate gerade and ungerade buckets (labels exactly `E1g`, `E1u`).
    GeradeUngerade,
    /// One bucket for all labels.
    Single,
}

impl SymmetryScheme {
    /// Picks the scheme from the complete set of labels in the table.
    pub fn detect(labels: &BTreeSet<&str>) -> Self {
        let gerade_ungerade: BTreeSet<&str> = ["E1g", "E1u"].into_iter().collect();
        if *labels == gerade_ungerade {
            SymmetryScheme::GeradeUngerade
        } else {
            SymmetryScheme::Single
        }
    }

    /// Key suffixes, one per bucket.
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            SymmetryScheme::GeradeUngerade => &["g", "u"],
            SymmetryScheme::Single => &[""],
        }
    }

    fn bucket(self, label: &str) -> usize {
        match self {
            SymmetryScheme::GeradeUngerade if label == "E1u" => 1,
            _ => 0,
        }
    }
}

/// Occupation and cutoff counts for the IVO pre-step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IvoParameters {
    /// Always zero; inactive spinors are not part of the IVO step
    pub ninact: u32,
    /// Occupied spinors
    pub nact: u32,
    /// Classified virtual spinors
    pub nsec: u32,
    /// Electrons placed into the occupied spinors
    pub nelec: u32,
    /// Occupied spinors per bucket
    pub nocc: Vec<u32>,
    /// Trailing unclassified virtual spinors per bucket
    pub nvcut: Vec<u32>,
    /// Bucket layout
    pub scheme: SymmetryScheme,
}

/// Walks the table in row order and derives the IVO parameters.
pub fn derive_ivo(
    snapshot: &ClassificationSnapshot,
    remaining_electrons: u32,
    scheme: SymmetryScheme,
) -> IvoParameters {
    let buckets = scheme.suffixes().len();
    let mut params = IvoParameters {
        ninact: 0,
        nact: 0,
        nsec: 0,
        nelec: 0,
        nocc: vec![0; buckets],
        nvcut: vec![0; buckets],
        scheme,
    };

    let mut remaining = i64::from(remaining_electrons);
    for entry in snapshot.entries() {
        let bucket = scheme.bucket(entry.symmetry.as_str());
        if remaining > 0 {
            params.nocc[bucket] += 2;
            params.nact += 2;
            params.nelec += remaining.min(2) as u32;
        } else if entry.category != Category::Unused {
            params.nsec += 2;
            params.nvcut.iter_mut().for_each(|cut| *cut = 0);
        } else {
            params.nvcut[bucket] += 2;
        }
        remaining -= 2;
    }

    params
}

impl IvoParameters {
    /// Derives the parameters with the scheme detected from the table itself.
    pub fn from_snapshot(snapshot: &ClassificationSnapshot, info: &MoleculeInfo) -> Self {
        let scheme = SymmetryScheme::detect(&snapshot.symmetry_labels());
        derive_ivo(snapshot, info.electron_number, scheme)
    }

    /// Returns `true` if any cutoff bucket is non-zero.
    pub fn has_cutoff(&self) -> bool {
        self.nvcut.iter().any(|&cut| cut != 0)
    }

    /// Renders the IVO parameter block.
    pub fn render(&self, input: &UserInput, info: &MoleculeInfo) -> String {
        let mut out = String::new();
        push_key(&mut out, ".ninact", self.ninact);
        push_key(&mut out, ".nact", self.nact);
        push_key(&mut out, ".nsec", self.nsec);
        push_key(&mut out, ".nelec", self.nelec);

        let suffixes = self.scheme.suffixes();
        for (suffix, nocc) in suffixes.iter().zip(&self.nocc) {
            push_key(&mut out, &format!(".nocc{}", suffix), nocc);
        }
        if self.has_cutoff() {
            for (suffix, nvcut) in suffixes.iter().zip(&self.nvcut) {
                push_key(&mut out, &format!(".nvcut{}", suffix), nvcut);
            }
        }

        push_key(&mut out, ".totsym", input.totsym);
        push_key(&mut out, ".diracver", input.diracver);
        if let Some(scheme) = &info.moltra_scheme {
            push_key(&mut out, ".scheme", scheme);
        }
        out.push_str(".subprograms\nIVO\n");
        out.push_str(".end\n");
        out
    }
}

fn push_key(out: &mut String, key: &str, value: impl std::fmt::Display) {
    out.push_str(key);
    out.push('\n');
    out.push_str(&value.to_string());
    out.push('\n');
}

//! Orbital classification categories.
//!
//! Every spinor row of the orbital table is assigned exactly one [`Category`].
//! The categories follow the restricted active space (RAS) partitioning used
//! by DIRAC-CASPT2:
//!
//! - **inactive**: doubly occupied core spinors, excluded from the CI space
//! - **ras1**: active spinors from which a limited number of holes may be made
//! - **active (ras2)**: the fully active space
//! - **ras3**: active spinors into which a limited number of electrons may go
//! - **secondary**: virtual spinors used in the perturbation step
//! - **unused**: spinors dropped from the integral transformation
//!
//! Category names are parsed case-insensitively; `ras2` is accepted for
//! `active` and `not_used` for `unused`.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, EnumString};

/// Classification of a single spinor row.
///
/// The declaration order is the precedence order used for display: inactive
/// spinors come first, secondary spinors last, unused spinors are never
/// listed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Not part of the MOLTRA transformation.
    #[strum(serialize = "unused", serialize = "not_used")]
    Unused,
    /// Inactive (core) spinors.
    #[strum(serialize = "inactive")]
    Inactive,
    /// RAS1 spinors (hole-restricted).
    #[strum(serialize = "ras1")]
    Ras1,
    /// Active spinors, also known as RAS2.
    #[strum(serialize = "active", serialize = "ras2")]
    Active,
    /// RAS3 spinors (electron-restricted).
    #[strum(serialize = "ras3")]
    Ras3,
    /// Secondary (virtual) spinors.
    #[strum(serialize = "secondary")]
    Secondary,
}

impl Category {
    /// Returns `true` for every category except [`Category::Unused`].
    pub fn is_used(self) -> bool {
        self != Category::Unused
    }

    /// Returns `true` for the three active-space partitions (RAS1, RAS2, RAS3).
    pub fn is_active_space(self) -> bool {
        matches!(self, Category::Ras1 | Category::Active | Category::Ras3)
    }

    /// Canonical keyword used in input files.
    pub fn keyword(self) -> &'static str {
        match self {
            Category::Unused => "unused",
            Category::Inactive => "inactive",
            Category::Ras1 => "ras1",
            Category::Active => "active",
            Category::Ras3 => "ras3",
            Category::Secondary => "secondary",
        }
    }

    /// Label shown in the spinor summary, e.g. `"active, ras2"`.
    pub fn summary_label(self) -> &'static str {
        match self {
            Category::Active => "active, ras2",
            other => other.keyword(),
        }
    }

    /// Iterates over the five categories that are counted in a tally.
    pub fn classified() -> impl Iterator<Item = Category> {
        Category::iter().filter(|c| c.is_used())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Category::from_str("ras2").unwrap(), Category::Active);
        assert_eq!(Category::from_str("Active").unwrap(), Category::Active);
        assert_eq!(Category::from_str("NOT_USED").unwrap(), Category::Unused);
        assert_eq!(Category::from_str("secondary").unwrap(), Category::Secondary);
        assert!(Category::from_str("virtual").is_err());
    }

    #[test]
    fn test_classified_excludes_unused() {
        let classified: Vec<Category> = Category::classified().collect();
        assert_eq!(classified.len(), 5);
        assert!(!classified.contains(&Category::Unused));
        assert_eq!(classified[0], Category::Inactive);
        assert_eq!(classified[4], Category::Secondary);
    }

    #[test]
    fn test_active_space_membership() {
        assert!(Category::Ras1.is_active_space());
        assert!(Category::Active.is_active_space());
        assert!(Category::Ras3.is_active_space());
        assert!(!Category::Inactive.is_active_space());
        assert!(!Category::Secondary.is_active_space());
    }

    #[test]
    fn test_summary_label() {
        assert_eq!(Category::Active.summary_label(), "active, ras2");
        assert_eq!(Category::Ras3.summary_label(), "ras3");
    }
}

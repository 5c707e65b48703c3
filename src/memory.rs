//! Peak memory estimate for the CASPT2 step.
//!
//! The estimate is a closed-form model over the spinor counts of a
//! [`CategoryTally`]. With `occ = inactive + active space`,
//! `all = occ + secondary` and `m = 2` for C1 (complex integrals) or `1`
//! otherwise:
//!
//! ```text
//! bytes = 8 * occ^4 * m               two-electron integrals
//!       + 8 * sec^2 * occ^2 * 2m      occupied-virtual integrals
//!       + 8 * all^2 * 2               index arrays
//!       + 8 * all^2 * m               one-electron integrals
//! ```
//!
//! All arithmetic is done in `u128` with saturation, so large molecules can
//! neither overflow nor produce a negative size.

use crate::tally::CategoryTally;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Abelian point groups supported by DIRAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointGroup {
    /// No symmetry
    C1,
    /// Inversion only
    Ci,
    /// One C2 axis
    C2,
    /// One mirror plane
    Cs,
    /// C2 axis with horizontal mirror plane
    C2h,
    /// Three C2 axes
    D2,
    /// C2 axis with two vertical mirror planes
    C2v,
    /// Full D2h
    D2h,
}

impl PointGroup {
    /// Complex-storage multiplier used by the memory model.
    pub fn symmetry_multiplier(self) -> u128 {
        if self == PointGroup::C1 {
            2
        } else {
            1
        }
    }
}

impl FromStr for PointGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c1" => Ok(PointGroup::C1),
            "ci" => Ok(PointGroup::Ci),
            "c2" => Ok(PointGroup::C2),
            "cs" => Ok(PointGroup::Cs),
            "c2h" => Ok(PointGroup::C2h),
            "d2" => Ok(PointGroup::D2),
            "c2v" => Ok(PointGroup::C2v),
            "d2h" => Ok(PointGroup::D2h),
            other => Err(format!("Unknown point group: {}", other)),
        }
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointGroup::C1 => "C1",
            PointGroup::Ci => "Ci",
            PointGroup::C2 => "C2",
            PointGroup::Cs => "Cs",
            PointGroup::C2h => "C2h",
            PointGroup::D2 => "D2",
            PointGroup::C2v => "C2v",
            PointGroup::D2h => "D2h",
        };
        f.write_str(name)
    }
}

/// Result of the memory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemoryEstimate {
    /// Point group known; size in bytes.
    Estimated {
        /// Point group the estimate was made for
        point_group: PointGroup,
        /// Estimated peak size in bytes
        bytes: u128,
    },
    /// Point group could not be resolved.
    Unavailable,
}

impl MemoryEstimate {
    /// Runs the memory model, or reports it unavailable without a point group.
    pub fn from_tally(counts: &CategoryTally, point_group: Option<PointGroup>) -> Self {
        match point_group {
            Some(point_group) => MemoryEstimate::Estimated {
                point_group,
                bytes: estimate_bytes(counts, point_group),
            },
            None => MemoryEstimate::Unavailable,
        }
    }

    /// Text shown next to the point group in the summary panel.
    pub fn display_line(&self) -> String {
        match self {
            MemoryEstimate::Estimated { point_group, bytes } => format!(
                "Point group: {}    Estimated memory size: {}",
                point_group,
                format_bytes(*bytes)
            ),
            MemoryEstimate::Unavailable => {
                "Point group: unknown    Estimated memory size: could not be obtained".to_string()
            }
        }
    }
}

/// Evaluates the closed-form memory model in bytes.
pub fn estimate_bytes(counts: &CategoryTally, point_group: PointGroup) -> u128 {
    let inact = u128::from(counts.inactive());
    let act = u128::from(counts.active_space());
    let sec = u128::from(counts.secondary());
    let symmetric = point_group.symmetry_multiplier();

    let occ = inact + act;
    let all = occ + sec;
    let occ_sq = occ.saturating_mul(occ);
    let all_sq = all.saturating_mul(all);

    let two_electron = 8u128
        .saturating_mul(occ_sq)
        .saturating_mul(occ_sq)
        .saturating_mul(symmetric);
    let two_electron_cross = 8u128
        .saturating_mul(sec.saturating_mul(sec))
        .saturating_mul(occ_sq)
        .saturating_mul(2 * symmetric);
    let index = 8u128.saturating_mul(all_sq).saturating_mul(2);
    let real = 8u128.saturating_mul(all_sq).saturating_mul(symmetric);

    two_electron
        .saturating_add(two_electron_cross)
        .saturating_add(index)
        .saturating_add(real)
}

const UNITS: [&str; 3] = ["KB", "MB", "GB"];

/// Formats a byte count with the largest of byte/KB/MB/GB (powers of 1024)
/// whose value is at least 1. Non-byte units carry three decimals.
pub fn format_bytes(bytes: u128) -> String {
    if bytes < 1024 {
        return format!("{} byte", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.3} {}", value, UNITS[unit])
}

//! Molecule context and user-editable CASPT2 parameters.
//!
//! This module defines the two records every derivation reads besides the
//! orbital table itself:
//!
//! - [`MoleculeInfo`]: facts about the molecule fixed when the input is
//!   loaded (point group, electron count, MOLTRA scheme override). It is
//!   created once and passed by reference into every recomputation.
//! - [`UserInput`]: the values a user may change between recomputations
//!   (target symmetry, DIRAC version, RAS limits, level shifts).
//!
//! See the [`parser`](crate::parser) module for the input keywords that
//! fill these records.

use crate::memory::PointGroup;
use serde::{Deserialize, Serialize};

/// DIRAC major version written when neither input nor settings name one.
pub const DEFAULT_DIRAC_VERSION: u32 = 21;

/// Immutable molecule context produced at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeInfo {
    /// Point group, `None` when it could not be resolved
    pub point_group: Option<PointGroup>,
    /// Total number of electrons to distribute over the spinors
    pub electron_number: u32,
    /// MOLTRA scheme override written as `.scheme`, if any
    pub moltra_scheme: Option<String>,
}

impl MoleculeInfo {
    /// Creates a context without a MOLTRA scheme override.
    pub fn new(point_group: Option<PointGroup>, electron_number: u32) -> Self {
        Self {
            point_group,
            electron_number,
            moltra_scheme: None,
        }
    }
}

/// An integer input field with an adjustable upper bound.
///
/// Lowering the bound below the current value clamps the value, the same
/// way a spin box behaves when its maximum changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedValue {
    value: u32,
    top: Option<u32>,
}

impl BoundedValue {
    /// Creates an unbounded field.
    pub fn new(value: u32) -> Self {
        Self { value, top: None }
    }

    /// Current value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Current upper bound, if one was set.
    pub fn top(&self) -> Option<u32> {
        self.top
    }

    /// Sets the value, clamped to the current bound.
    pub fn set(&mut self, value: u32) {
        self.value = match self.top {
            Some(top) => value.min(top),
            None => value,
        };
    }

    /// Sets the upper bound and clamps the current value to it.
    pub fn set_top(&mut self, top: u32) {
        self.top = Some(top);
        self.value = self.value.min(top);
    }
}

impl Default for BoundedValue {
    fn default() -> Self {
        Self::new(0)
    }
}

/// CASPT2 parameters the user edits alongside the orbital table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInput {
    /// Total symmetry number of the target state (`.totsym`)
    pub totsym: u32,
    /// Root to select within `totsym` (`.caspt2_ciroots`)
    pub selectroot: u32,
    /// DIRAC major version (`.diracver`)
    pub diracver: u32,
    /// Real level shift (`.eshift`)
    pub eshift: f64,
    /// Imaginary level shift (`.pshift`)
    pub pshift: f64,
    /// Maximum number of holes in RAS1
    pub ras1_max_hole: BoundedValue,
    /// Maximum number of electrons in RAS3
    pub ras3_max_electron: BoundedValue,
}

impl Default for UserInput {
    fn default() -> Self {
        Self {
            totsym: 1,
            selectroot: 1,
            diracver: DEFAULT_DIRAC_VERSION,
            eshift: 0.0,
            pshift: 0.0,
            ras1_max_hole: BoundedValue::default(),
            ras3_max_electron: BoundedValue::default(),
        }
    }
}

impl UserInput {
    /// Applies freshly tallied RAS1/RAS3 spinor counts as upper bounds.
    pub fn apply_ras_limits(&mut self, ras1: u32, ras3: u32) {
        self.ras1_max_hole.set_top(ras1);
        self.ras3_max_electron.set_top(ras3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_top_clamps_value() {
        let mut field = BoundedValue::new(6);
        field.set_top(4);
        assert_eq!(field.value(), 4);
        assert_eq!(field.top(), Some(4));

        field.set_top(10);
        assert_eq!(field.value(), 4);
        field.set(12);
        assert_eq!(field.value(), 10);
    }

    #[test]
    fn test_unbounded_set() {
        let mut field = BoundedValue::default();
        field.set(100);
        assert_eq!(field.value(), 100);
        assert_eq!(field.top(), None);
    }

    #[test]
    fn test_apply_ras_limits() {
        let mut input = UserInput::default();
        input.ras1_max_hole.set(3);
        input.ras3_max_electron.set(2);
        input.apply_ras_limits(2, 0);
        assert_eq!(input.ras1_max_hole.value(), 2);
        assert_eq!(input.ras3_max_electron.value(), 0);
    }
}

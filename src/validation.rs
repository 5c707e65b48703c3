//! Consistency checks for the CASPT2 input.
//!
//! The orbital table and the user input are edited independently, so they
//! can disagree: more inactive spinors than electrons, a RAS1 hole limit
//! larger than RAS1 itself, and so on. These checks run before the CASPT2
//! input is written and explain what to change.
//!
//! # Features
//!
//! - Electron count against inactive and active spinors
//! - RAS hole/electron limits against the tallied partitions
//! - Target symmetry and root selection sanity checks
//! - Warnings for conditions that only degrade the summary

use crate::caspt2::active_electrons;
use crate::category::Category;
use crate::config::{MoleculeInfo, UserInput};
use crate::parser::InputData;
use crate::tally::{tally, CategoryTally};
use log::warn;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with user guidance.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Error category for programmatic handling
    pub category: ErrorCategory,
    /// Human-readable error message
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCategory {
    /// A user input value is out of its valid range
    InvalidConfiguration,
    /// Electron count disagrees with the classification
    InconsistentElectrons,
    /// A RAS limit exceeds the size of its partition
    LimitExceeded,
    /// No RAS1, RAS2 or RAS3 spinors were selected
    EmptyActiveSpace,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    fn new(category: ErrorCategory, message: String, suggestion: &str) -> Self {
        Self {
            category,
            message,
            suggestion: Some(suggestion.to_string()),
        }
    }
}

/// Validates everything the CASPT2 input depends on.
///
/// # Examples
///
/// ```
/// use dcaspt2_input::config::{MoleculeInfo, UserInput};
/// use dcaspt2_input::tally::CategoryTally;
/// use dcaspt2_input::validation::validate_caspt2_input;
///
/// let info = MoleculeInfo::new(None, 2);
/// let result = validate_caspt2_input(&info, &UserInput::default(), &CategoryTally::default());
/// assert!(result.is_err()); // no active space selected
/// ```
pub fn validate_caspt2_input(
    info: &MoleculeInfo,
    input: &UserInput,
    counts: &CategoryTally,
) -> ValidationResult<()> {
    validate_user_input(input)?;
    validate_active_space(counts)?;
    validate_electrons(info, counts)?;
    validate_ras_limits(input, counts)?;

    if info.point_group.is_none() {
        warn!("Point group is unknown; the memory estimate is not available");
    }

    Ok(())
}

/// Validates a parsed input file as written, before the RAS limits are
/// clamped to the tallied partitions.
///
/// Returns the spinor counts of the table on success.
pub fn validate_input_data(data: &InputData) -> ValidationResult<CategoryTally> {
    let (counts, _) = tally(&data.snapshot);
    validate_caspt2_input(&data.info, &data.user_input, &counts)?;
    Ok(counts)
}

fn validate_user_input(input: &UserInput) -> ValidationResult<()> {
    if input.totsym == 0 {
        return Err(ValidationError::new(
            ErrorCategory::InvalidConfiguration,
            "totsym must be a positive symmetry number".to_string(),
            "Set 'totsym' to the symmetry number of the target state as listed by DIRAC",
        ));
    }
    if input.selectroot == 0 {
        return Err(ValidationError::new(
            ErrorCategory::InvalidConfiguration,
            "selectroot must be at least 1".to_string(),
            "Use selectroot = 1 for the lowest root of the target symmetry",
        ));
    }
    Ok(())
}

fn validate_active_space(counts: &CategoryTally) -> ValidationResult<()> {
    if counts.active_space() == 0 {
        return Err(ValidationError::new(
            ErrorCategory::EmptyActiveSpace,
            "No active spinors were selected".to_string(),
            "Classify at least one orbital as ras1, active or ras3",
        ));
    }
    Ok(())
}

fn validate_electrons(info: &MoleculeInfo, counts: &CategoryTally) -> ValidationResult<()> {
    if counts.inactive() > info.electron_number {
        return Err(ValidationError::new(
            ErrorCategory::InconsistentElectrons,
            format!(
                "{} inactive spinors exceed the {} electrons of the molecule",
                counts.inactive(),
                info.electron_number
            ),
            "Move the highest inactive orbitals to ras1, active or secondary",
        ));
    }

    let nelec = active_electrons(info, counts);
    if nelec > counts.active_space() {
        return Err(ValidationError::new(
            ErrorCategory::InconsistentElectrons,
            format!(
                "{} active electrons do not fit into {} active spinors",
                nelec,
                counts.active_space()
            ),
            "Add occupied orbitals to the active space or mark more orbitals inactive",
        ));
    }
    Ok(())
}

fn validate_ras_limits(input: &UserInput, counts: &CategoryTally) -> ValidationResult<()> {
    let ras1 = counts.count(Category::Ras1);
    if input.ras1_max_hole.value() > ras1 {
        return Err(ValidationError::new(
            ErrorCategory::LimitExceeded,
            format!(
                "ras1_max_hole = {} exceeds the {} RAS1 spinors",
                input.ras1_max_hole.value(),
                ras1
            ),
            "Lower ras1_max_hole or classify more orbitals as ras1",
        ));
    }

    let ras3 = counts.count(Category::Ras3);
    if input.ras3_max_electron.value() > ras3 {
        return Err(ValidationError::new(
            ErrorCategory::LimitExceeded,
            format!(
                "ras3_max_electron = {} exceeds the {} RAS3 spinors",
                input.ras3_max_electron.value(),
                ras3
            ),
            "Lower ras3_max_electron or classify more orbitals as ras3",
        ));
    }
    Ok(())
}

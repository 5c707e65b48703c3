//! Orbital-table input file parsing.
//!
//! An input file describes one molecule: its electron count and point group,
//! the CASPT2 parameters a user would otherwise type into the summary panel,
//! and the classified orbital table. The format follows a section-based
//! syntax: `key = value` lines anywhere outside sections, and sections opened
//! by `*NAME` and closed by a lone `*`. Lines starting with `#` are comments.
//!
//! # Key-Value Parameters
//!
//! ```text
//! electron_number = 10      # required
//! point_group = D2h
//! moltra_scheme = 4
//! totsym = 33
//! selectroot = 1
//! diracver = 21
//! eshift = 0.0
//! pshift = 0.0
//! ras1_max_hole = 2
//! ras3_max_electron = 2
//! ```
//!
//! # *ORBITALS Section
//!
//! One row per Kramers pair, in table order:
//!
//! ```text
//! *ORBITALS
//! # symmetry  index  category  [energy]
//! E1g  1  inactive  -20.55
//! E1u  1  ras1      -1.25
//! E1u  2  secondary  0.31
//! *
//! ```
//!
//! # *CLASSIFY Section
//!
//! Optional overrides applied after the table is read, using range notation:
//!
//! ```text
//! *CLASSIFY
//! E1u ras3 4..6 9
//! *
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use dcaspt2_input::parser::parse_input;
//! use std::path::Path;
//!
//! let input_data = parse_input(Path::new("molecule.inp"))?;
//! println!("{} orbitals", input_data.snapshot.len());
//! # Ok::<(), dcaspt2_input::parser::ParseError>(())
//! ```

use crate::category::Category;
use crate::config::{MoleculeInfo, UserInput};
use crate::memory::PointGroup;
use crate::range::{self, RangeError};
use crate::snapshot::{ClassificationSnapshot, OrbitalEntry, SnapshotError, SymmetryLabel};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for parsing operations.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error when reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error with descriptive message
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// Invalid orbital table
    #[error("Invalid orbital table: {0}")]
    Table(#[from] SnapshotError),
    /// A required keyword is missing
    #[error("Missing required keyword: {0}")]
    Missing(&'static str),
}

/// Type alias for parse operation results
type Result<T> = std::result::Result<T, ParseError>;

lazy_static! {
    // "E1g  12  inactive  -20.5512"
    static ref ORBITAL_RE: Regex = Regex::new(
        r"^\s*(\S+)\s+(\d+)\s+([A-Za-z_0-9]+)(?:\s+([-+]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][-+]?\d+)?))?\s*$"
    )
    .unwrap();
}

/// Complete parsed input data.
#[derive(Debug, Clone)]
pub struct InputData {
    /// Molecule context
    pub info: MoleculeInfo,
    /// CASPT2 parameters
    pub user_input: UserInput,
    /// Classified orbital table
    pub snapshot: ClassificationSnapshot,
}

/// Parses an input file from disk.
pub fn parse_input(path: &Path) -> Result<InputData> {
    let content = fs::read_to_string(path)?;
    parse_input_str(&content)
}

#[derive(PartialEq)]
enum Section {
    None,
    Orbitals,
    Classify,
    Unknown,
}

/// Parses input file content.
pub fn parse_input_str(content: &str) -> Result<InputData> {
    parse_with_defaults(content, UserInput::default())
}

/// Same as [`parse_input_str`], with the DIRAC version defaulting to `diracver`
/// when the input file does not set it.
pub fn parse_input_with_default_version(content: &str, diracver: u32) -> Result<InputData> {
    let defaults = UserInput {
        diracver,
        ..UserInput::default()
    };
    parse_with_defaults(content, defaults)
}

fn parse_with_defaults(content: &str, mut user_input: UserInput) -> Result<InputData> {
    let mut electron_number = None;
    let mut point_group = None;
    let mut moltra_scheme = None;
    let mut entries = Vec::new();
    let mut overrides = Vec::new();
    let mut section = Section::None;

    for (number, raw_line) in content.lines().enumerate() {
        let line_number = number + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if line == "*" {
            section = Section::None;
            continue;
        } else if let Some(name) = line.strip_prefix('*') {
            section = match name.trim().to_lowercase().as_str() {
                "orbitals" => Section::Orbitals,
                "classify" => Section::Classify,
                other => {
                    warn!("Ignoring unknown section *{} on line {}", other, line_number);
                    Section::Unknown
                }
            };
            continue;
        }

        match section {
            Section::Orbitals => entries.push(parse_orbital(line, line_number)?),
            Section::Classify => overrides.push((line_number, line.to_string())),
            Section::Unknown => {}
            Section::None => {
                let Some((key, value)) = line.split_once('=') else {
                    return Err(ParseError::Parse {
                        line: line_number,
                        message: format!("Expected 'key = value', found '{}'", line),
                    });
                };
                let key = key.trim().to_lowercase();
                let value = value.trim();
                match key.as_str() {
                    "electron_number" | "nelec" => {
                        electron_number = Some(parse_number(value, &key, line_number)?)
                    }
                    "point_group" => {
                        point_group = match value.parse::<PointGroup>() {
                            Ok(pg) => Some(pg),
                            Err(e) => {
                                warn!("{}; the memory estimate will not be available", e);
                                None
                            }
                        }
                    }
                    "moltra_scheme" | "scheme" => moltra_scheme = Some(value.to_string()),
                    "totsym" => user_input.totsym = parse_number(value, &key, line_number)?,
                    "selectroot" => user_input.selectroot = parse_number(value, &key, line_number)?,
                    "diracver" => user_input.diracver = parse_number(value, &key, line_number)?,
                    "eshift" => user_input.eshift = parse_number(value, &key, line_number)?,
                    "pshift" => user_input.pshift = parse_number(value, &key, line_number)?,
                    "ras1_max_hole" => user_input
                        .ras1_max_hole
                        .set(parse_number(value, &key, line_number)?),
                    "ras3_max_electron" => user_input
                        .ras3_max_electron
                        .set(parse_number(value, &key, line_number)?),
                    _ => warn!("Ignoring unknown keyword '{}' on line {}", key, line_number),
                }
            }
        }
    }

    let mut snapshot = ClassificationSnapshot::from_entries(entries)?;
    for (line_number, line) in overrides {
        snapshot = apply_override(&snapshot, &line, line_number)?;
    }

    let electron_number = electron_number.ok_or(ParseError::Missing("electron_number"))?;
    let info = MoleculeInfo {
        point_group,
        electron_number,
        moltra_scheme,
    };

    Ok(InputData {
        info,
        user_input,
        snapshot,
    })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, key: &str, line: usize) -> Result<T> {
    value.parse().map_err(|_| ParseError::Parse {
        line,
        message: format!("Invalid value for {}: '{}'", key, value),
    })
}

fn parse_category(text: &str, line: usize) -> Result<Category> {
    text.parse().map_err(|_| ParseError::Parse {
        line,
        message: format!("Unknown category '{}'", text),
    })
}

fn parse_orbital(line: &str, line_number: usize) -> Result<OrbitalEntry> {
    let caps = ORBITAL_RE.captures(line).ok_or_else(|| ParseError::Parse {
        line: line_number,
        message: format!("Expected 'symmetry index category [energy]', found '{}'", line),
    })?;

    let index = parse_number(&caps[2], "orbital index", line_number)?;
    let category = parse_category(&caps[3], line_number)?;
    let mut entry = OrbitalEntry::new(SymmetryLabel::new(&caps[1]), index, category);
    if let Some(energy) = caps.get(4) {
        entry = entry.with_energy(parse_number(energy.as_str(), "energy", line_number)?);
    }
    Ok(entry)
}

fn apply_override(
    snapshot: &ClassificationSnapshot,
    line: &str,
    line_number: usize,
) -> Result<ClassificationSnapshot> {
    let mut parts = line.split_whitespace();
    let (Some(symmetry), Some(category)) = (parts.next(), parts.next()) else {
        return Err(ParseError::Parse {
            line: line_number,
            message: format!("Expected 'symmetry category ranges', found '{}'", line),
        });
    };
    let category = parse_category(category, line_number)?;
    let notation = parts.collect::<Vec<_>>().join(" ");
    let runs = range::runs(&notation).map_err(|e: RangeError| ParseError::Parse {
        line: line_number,
        message: e.to_string(),
    })?;

    Ok(snapshot.with_category_runs(symmetry, &runs, category)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"
# water-like test molecule
electron_number = 4
point_group = C2v
totsym = 3
ras1_max_hole = 1

*ORBITALS
E1  1  inactive   -20.5
E1  2  ras1       -1.3
E1  3  active     -0.5   # HOMO
E1  4  ras3        0.2
E1  5  unused      1.0e1
*
"#;

    #[test]
    fn test_parse_basic_input() {
        let data = parse_input_str(INPUT).unwrap();
        assert_eq!(data.info.electron_number, 4);
        assert_eq!(data.info.point_group, Some(PointGroup::C2v));
        assert_eq!(data.user_input.totsym, 3);
        assert_eq!(data.user_input.ras1_max_hole.value(), 1);
        assert_eq!(data.snapshot.len(), 5);
        assert_eq!(data.snapshot.entries()[0].energy, Some(-20.5));
        assert_eq!(data.snapshot.entries()[4].energy, Some(10.0));
        assert_eq!(data.snapshot.category_of("E1", 3), Some(Category::Active));
    }

    #[test]
    fn test_classify_overrides() {
        let content = format!("{}\n*CLASSIFY\nE1 secondary 4..5\n*\n", INPUT);
        let data = parse_input_str(&content).unwrap();
        assert_eq!(data.snapshot.category_of("E1", 4), Some(Category::Secondary));
        assert_eq!(data.snapshot.category_of("E1", 5), Some(Category::Secondary));
        assert_eq!(data.snapshot.category_of("E1", 2), Some(Category::Ras1));
    }

    #[test]
    fn test_classify_unknown_orbital() {
        let content = format!("{}\n*CLASSIFY\nE1 secondary 9\n*\n", INPUT);
        assert!(matches!(
            parse_input_str(&content),
            Err(ParseError::Table(SnapshotError::UnknownOrbital { .. }))
        ));
    }

    #[test]
    fn test_classify_range_past_table_end() {
        for notation in ["2..300000000", "1..4294967295"] {
            let content = format!("{}\n*CLASSIFY\nE1 ras3 {}\n*\n", INPUT, notation);
            match parse_input_str(&content) {
                Err(ParseError::Table(SnapshotError::UnknownOrbital { symmetry, index })) => {
                    assert_eq!(symmetry, "E1");
                    assert_eq!(index, 6);
                }
                other => panic!("unexpected result: {:?}", other.map(|d| d.snapshot.len())),
            }
        }
    }

    #[test]
    fn test_unknown_point_group_is_not_an_error() {
        let data = parse_input_str("electron_number = 2\npoint_group = Oh\n").unwrap();
        assert_eq!(data.info.point_group, None);
    }

    #[test]
    fn test_missing_electron_number() {
        assert!(matches!(
            parse_input_str("point_group = C1\n"),
            Err(ParseError::Missing("electron_number"))
        ));
    }

    #[test]
    fn test_bad_category_reports_line() {
        let err = parse_input_str("electron_number = 2\n*ORBITALS\nE1 1 virtual\n*\n").unwrap_err();
        match err {
            ParseError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("virtual"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_default_version_from_settings() {
        let data = parse_input_with_default_version("electron_number = 2\n", 23).unwrap();
        assert_eq!(data.user_input.diracver, 23);
        let data = parse_input_with_default_version("electron_number = 2\ndiracver = 22\n", 23).unwrap();
        assert_eq!(data.user_input.diracver, 22);
    }
}

#![deny(missing_docs)]

//! dcaspt2-input - Input Generator for DIRAC-CASPT2
//!
//! dcaspt2-input turns a classified orbital table into the input files of a
//! relativistic CASPT2 calculation with DIRAC-CASPT2 and summarizes the active
//! space that the classification selects.
//!
//! # Overview
//!
//! Every Kramers pair of the molecule is classified into one of six categories:
//!
//! | Category | Meaning |
//! |----------|---------|
//! | unused | Dropped from the MOLTRA integral transformation |
//! | inactive | Doubly occupied core |
//! | ras1 | Occupied active spinors that may hold holes |
//! | active (ras2) | Fully active space |
//! | ras3 | Virtual active spinors that may hold electrons |
//! | secondary | Virtual spinors outside the active space |
//!
//! From this table the program derives:
//! - **Spinor summary**: counts per category (two spinors per Kramers pair)
//! - **Recommended MOLTRA setting**: per-symmetry ranges of used orbitals
//! - **Memory estimate**: peak CASPT2 memory for the point group
//! - **IVO input**: occupied and cutoff spinors per symmetry
//! - **CASPT2 input**: `.ninact`, `.nact`, `.nsec`, `.nelec`, RAS ranges
//!
//! # Range Notation
//!
//! Sorted orbital indices are written in compact form, consecutive runs as
//! `a..b` and isolated indices on their own:
//!
//! ```text
//! 1 2 3 5 7 8 9  ->  "1..3 5 7..9"
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use dcaspt2_input::controller::{Controller, Event, TextSummary};
//! use dcaspt2_input::parser::parse_input;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input_data = parse_input(Path::new("h2o.inp"))?;
//!
//!     let mut controller = Controller::new(
//!         input_data.info,
//!         input_data.user_input,
//!         TextSummary::default(),
//!         "active.ivo.inp",
//!     );
//!     controller.handle(Event::ClassificationChanged(input_data.snapshot))?;
//!
//!     for line in controller.view().lines() {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`category`](category/index.html) - Orbital classification categories
//! - [`range`](range/index.html) - Compact range notation
//! - [`snapshot`](snapshot/index.html) - Orbital table snapshots and MOLTRA usage
//! - [`tally`](tally/index.html) - Per-category spinor counts
//! - [`memory`](memory/index.html) - Point groups and the memory estimate
//! - [`config`](config/index.html) - Molecule context and user input
//! - [`ivo`](ivo/index.html) - IVO parameter derivation and rendering
//! - [`caspt2`](caspt2/index.html) - CASPT2 main input rendering
//! - [`controller`](controller/index.html) - Event-driven recomputation
//! - [`parser`](parser/index.html) - Input file parsing
//! - [`validation`](validation/index.html) - Consistency checks
//! - [`template_generator`](template_generator/index.html) - Input files from orbital listings
//! - [`settings`](settings/index.html) - Configuration management
//! - [`help`](help/index.html) - Built-in help system
//!
//! # Input File Format
//!
//! ```text
//! electron_number = 10
//! point_group = C2v
//! ras1_max_hole = 2
//!
//! *ORBITALS
//! E1 1 inactive  -20.55
//! E1 2 ras1       -1.33
//! E1 3 active     -0.56
//! E1 4 ras3        0.21
//! E1 5 secondary   0.30
//! *
//!
//! *CLASSIFY
//! E1 unused 5
//! *
//! ```

/// CASPT2 main input rendering
pub mod caspt2;
pub mod category;
pub mod config;
pub mod controller;
/// Built-in help system
pub mod help;
pub mod io;
pub mod ivo;
pub mod memory;
pub mod parser;
pub mod range;
/// Configuration management system
pub mod settings;
pub mod snapshot;
pub mod tally;
/// Input files from orbital listings
pub mod template_generator;
/// Consistency checks for the CASPT2 input
pub mod validation;

pub use category::Category;
pub use config::{MoleculeInfo, UserInput};
pub use controller::{Controller, Event};
pub use snapshot::ClassificationSnapshot;

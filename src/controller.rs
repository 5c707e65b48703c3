//! Event-driven recomputation of all derived outputs.
//!
//! The [`Controller`] stands between whatever edits the orbital table (an
//! editor, the command line, a test) and whatever displays the results. Each
//! [`Event`] carries a complete value, never a partial edit, so every
//! recomputation sees a fully updated table:
//!
//! - [`Event::ClassificationChanged`] replaces the table and re-derives the
//!   spinor summary, the RAS limits, the MOLTRA ranges, the memory estimate
//!   and the IVO block.
//! - [`Event::UserInputChanged`] replaces the user input and re-derives the
//!   IVO block only.
//!
//! The IVO file is overwritten after every recomputation. Results reach the
//! presentation side through the [`SummaryView`] trait.
//!
//! # Example
//!
//! ```no_run
//! use dcaspt2_input::config::{MoleculeInfo, UserInput};
//! use dcaspt2_input::controller::{Controller, Event, TextSummary};
//! use dcaspt2_input::snapshot::ClassificationSnapshot;
//! use std::sync::mpsc;
//!
//! let info = MoleculeInfo::new(None, 2);
//! let mut controller = Controller::new(info, UserInput::default(), TextSummary::default(), "active.ivo.inp");
//! let (tx, rx) = mpsc::channel();
//! tx.send(Event::ClassificationChanged(ClassificationSnapshot::default())).unwrap();
//! drop(tx);
//! controller.run(rx).unwrap();
//! ```

use crate::category::Category;
use crate::config::{MoleculeInfo, UserInput};
use crate::io;
use crate::ivo::IvoParameters;
use crate::memory::MemoryEstimate;
use crate::snapshot::{ClassificationSnapshot, MoltraUsage};
use crate::tally::{tally, CategoryTally};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use thiserror::Error;

/// Errors raised while handling an event.
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Writing the IVO file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Notifications consumed by the controller.
#[derive(Debug, Clone)]
pub enum Event {
    /// The orbital table changed; carries the whole new table.
    ClassificationChanged(ClassificationSnapshot),
    /// Target symmetry, DIRAC version or RAS limits changed.
    UserInputChanged(UserInput),
}

/// Text fields of the summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SummaryField {
    /// Spinor count of one classified category
    Count(Category),
    /// Recommended MOLTRA ranges
    RecommendedMoltra,
    /// Point group and memory estimate
    PointGroupMemory,
}

/// Numeric input fields whose upper bound follows the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LimitField {
    /// Maximum number of RAS1 holes
    Ras1MaxHole,
    /// Maximum number of RAS3 electrons
    Ras3MaxElectron,
}

/// Presentation side of the controller.
pub trait SummaryView {
    /// Replaces the text of a summary field.
    fn set_text(&mut self, field: SummaryField, text: String);
    /// Sets the upper bound of a numeric input field.
    fn set_top(&mut self, field: LimitField, top: u32);
}

/// In-memory [`SummaryView`] used by the command line and in tests.
#[derive(Debug, Clone, Default)]
pub struct TextSummary {
    texts: BTreeMap<SummaryField, String>,
    tops: BTreeMap<LimitField, u32>,
}

impl TextSummary {
    /// Current text of a field.
    pub fn text(&self, field: SummaryField) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    /// Current upper bound of a limit field.
    pub fn top(&self, field: LimitField) -> Option<u32> {
        self.tops.get(&field).copied()
    }

    /// All summary lines in display order.
    pub fn lines(&self) -> Vec<&str> {
        self.texts.values().map(String::as_str).collect()
    }
}

impl SummaryView for TextSummary {
    fn set_text(&mut self, field: SummaryField, text: String) {
        self.texts.insert(field, text);
    }

    fn set_top(&mut self, field: LimitField, top: u32) {
        self.tops.insert(field, top);
    }
}

/// Everything derived from the last recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Derived {
    /// Spinor counts per category
    pub tally: CategoryTally,
    /// MOLTRA usage ledger
    pub usage: MoltraUsage,
    /// Memory estimate, if the point group is known
    pub memory: MemoryEstimate,
    /// IVO parameters
    pub ivo: IvoParameters,
}

/// Owns the current table and user input and keeps the view in sync.
pub struct Controller<V: SummaryView> {
    info: MoleculeInfo,
    input: UserInput,
    snapshot: ClassificationSnapshot,
    view: V,
    ivo_path: PathBuf,
    derived: Option<Derived>,
}

impl<V: SummaryView> Controller<V> {
    /// Creates a controller with an empty table.
    pub fn new(info: MoleculeInfo, input: UserInput, view: V, ivo_path: impl Into<PathBuf>) -> Self {
        Self {
            info,
            input,
            snapshot: ClassificationSnapshot::default(),
            view,
            ivo_path: ivo_path.into(),
            derived: None,
        }
    }

    /// Handles one event synchronously.
    pub fn handle(&mut self, event: Event) -> Result<(), ControllerError> {
        match event {
            Event::ClassificationChanged(snapshot) => {
                debug!("Classification changed ({} rows)", snapshot.len());
                self.snapshot = snapshot;
                self.refresh_summary();
            }
            Event::UserInputChanged(input) => {
                debug!("User input changed");
                self.input = input;
                if let Some(derived) = &self.derived {
                    let ras1 = derived.tally.count(Category::Ras1);
                    let ras3 = derived.tally.count(Category::Ras3);
                    self.clamp_ras_limits(ras1, ras3);
                }
            }
        }
        self.refresh_ivo()
    }

    /// Drains the channel until every sender has been dropped.
    pub fn run(&mut self, events: Receiver<Event>) -> Result<(), ControllerError> {
        for event in events {
            self.handle(event)?;
        }
        Ok(())
    }

    fn clamp_ras_limits(&mut self, ras1: u32, ras3: u32) {
        let before = (
            self.input.ras1_max_hole.value(),
            self.input.ras3_max_electron.value(),
        );
        self.input.apply_ras_limits(ras1, ras3);
        if before.0 != self.input.ras1_max_hole.value() {
            warn!("ras1_max_hole lowered from {} to the {} RAS1 spinors", before.0, ras1);
        }
        if before.1 != self.input.ras3_max_electron.value() {
            warn!("ras3_max_electron lowered from {} to the {} RAS3 spinors", before.1, ras3);
        }
    }

    fn refresh_summary(&mut self) {
        let (counts, usage) = tally(&self.snapshot);

        for category in Category::classified() {
            self.view
                .set_text(SummaryField::Count(category), counts.label(category));
        }

        let ras1 = counts.count(Category::Ras1);
        let ras3 = counts.count(Category::Ras3);
        self.clamp_ras_limits(ras1, ras3);
        self.view.set_top(LimitField::Ras1MaxHole, ras1);
        self.view.set_top(LimitField::Ras3MaxElectron, ras3);

        self.view
            .set_text(SummaryField::RecommendedMoltra, usage.recommended_setting());

        let memory = MemoryEstimate::from_tally(&counts, self.info.point_group);
        self.view
            .set_text(SummaryField::PointGroupMemory, memory.display_line());

        let ivo = IvoParameters::from_snapshot(&self.snapshot, &self.info);
        self.derived = Some(Derived {
            tally: counts,
            usage,
            memory,
            ivo,
        });
    }

    fn refresh_ivo(&mut self) -> Result<(), ControllerError> {
        // IVO counts depend only on the table and the electron number.
        let text = match &self.derived {
            Some(derived) => derived.ivo.render(&self.input, &self.info),
            None => IvoParameters::from_snapshot(&self.snapshot, &self.info)
                .render(&self.input, &self.info),
        };
        io::write_ivo_input(&text, &self.ivo_path)?;
        info!("IVO input written to {}", self.ivo_path.display());
        Ok(())
    }

    /// Results of the last classification change.
    pub fn derived(&self) -> Option<&Derived> {
        self.derived.as_ref()
    }

    /// Current table.
    pub fn snapshot(&self) -> &ClassificationSnapshot {
        &self.snapshot
    }

    /// Current user input, with RAS limits applied.
    pub fn input(&self) -> &UserInput {
        &self.input
    }

    /// Molecule context.
    pub fn info(&self) -> &MoleculeInfo {
        &self.info
    }

    /// Path the IVO block is written to.
    pub fn ivo_path(&self) -> &Path {
        &self.ivo_path
    }

    /// The attached view.
    pub fn view(&self) -> &V {
        &self.view
    }
}

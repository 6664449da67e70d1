//! Domain models for rxnarrative
//!
//! Every value here lives for a single run: snapshots are computed, turned
//! into prompts, turned into narratives, written once, and dropped.

pub mod narrative;
pub mod prompt;
pub mod section;
pub mod snapshot;

pub use narrative::{Narrative, NarrativeRecord, NarrativeSet};
pub use prompt::Prompt;
pub use section::Section;
pub use snapshot::{
    AnomalyObservation, AnomalySnapshot, DriverContribution, DriverSnapshot, ForecastSnapshot,
    KpiSnapshot,
};

//! Pipeline entry points.
//!
//! - `run_harvest`: Walk the catalog, classify each entry and keep the matches

pub mod harvest;

pub use harvest::{HarvestState, Harvester, RunSummary, run_harvest};

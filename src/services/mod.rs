//! Service layer for the harvester.
//!
//! This module contains the business logic for:
//! - Talking to the remote endpoints (`StoreApi`)
//! - Fetching the catalog (`fetch_catalog`)
//! - Classifying entries through the detail endpoint (`DetailClassifier`)

mod api;
mod catalog;
mod classifier;

pub use api::{CatalogSource, DetailResponse, DetailSource, StoreApi};
pub use catalog::fetch_catalog;
pub use classifier::{AttemptOutcome, Classification, DetailClassifier};

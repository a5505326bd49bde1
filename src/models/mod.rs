// src/models/mod.rs

//! Domain models for the harvester.
//!
//! This module contains the data structures shared by the services, the
//! storage backends and the polling loop.

mod catalog;
mod config;

// Re-export all public types
pub use catalog::{
    AcceptedItem, AppList, CatalogEntry, CatalogResponse, DetailPayload, DetailRecord,
};
pub use config::{ApiConfig, ClassifierConfig, Config, HarvestConfig, StorageConfig};

// src/pipeline/harvest.rs

//! The polling loop.
//!
//! Candidates are visited strictly one at a time, in catalog order:
//!
//! ```text
//! Pending ─┬─ unnamed / already seen ──────────────► (skipped, no request)
//!          └─ Classifying ─┬─ Accept ─► append, save, delay
//!                          ├─ Skip ───► save, delay
//!                          └─ Fail ───► cooldown
//! ```
//!
//! The list is saved once more when the walk ends, so the file always
//! matches memory even if nothing was processed.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{AcceptedItem, CatalogEntry, Config, HarvestConfig};
use crate::services::{CatalogSource, Classification, DetailClassifier, DetailSource, fetch_catalog};
use crate::storage::{Progress, ProgressStore};
use crate::utils::{format_delay, pause};

/// Counters for one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub catalog_size: usize,
    /// Candidates that reached a decision (accepted or skipped)
    pub processed: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub already_seen: usize,
    pub unnamed: usize,
    /// Accepted items in the progress file at the end of the run
    pub total_accepted: usize,
    pub limit_reached: bool,
}

/// State owned by the loop for the duration of a run.
#[derive(Debug)]
pub struct HarvestState {
    pub progress: Progress,
    pub summary: RunSummary,
}

impl HarvestState {
    fn new(progress: Progress) -> Self {
        let now = Utc::now();
        Self {
            summary: RunSummary {
                started_at: now,
                finished_at: now,
                catalog_size: 0,
                processed: 0,
                accepted: 0,
                skipped: 0,
                failed: 0,
                already_seen: 0,
                unnamed: 0,
                total_accepted: progress.len(),
                limit_reached: false,
            },
            progress,
        }
    }
}

/// Drives the catalog through the classifier and into the store.
pub struct Harvester<'a> {
    catalog: &'a dyn CatalogSource,
    details: &'a dyn DetailSource,
    store: &'a dyn ProgressStore,
    classifier: DetailClassifier,
    config: HarvestConfig,
}

impl<'a> Harvester<'a> {
    pub fn new(
        config: &Config,
        catalog: &'a dyn CatalogSource,
        details: &'a dyn DetailSource,
        store: &'a dyn ProgressStore,
    ) -> Self {
        Self {
            catalog,
            details,
            store,
            classifier: DetailClassifier::new(config.classifier.clone()),
            config: config.harvest.clone(),
        }
    }

    /// Load progress, fetch the catalog and walk it.
    ///
    /// Fails only when the catalog cannot be fetched or progress cannot be
    /// written; per-candidate failures are absorbed by the cooldown.
    pub async fn run(&self) -> Result<RunSummary> {
        let progress = Progress::load(self.store).await;
        let mut state = HarvestState::new(progress);

        let catalog = fetch_catalog(self.catalog).await?;
        state.summary.catalog_size = catalog.len();

        for entry in &catalog {
            if !entry.has_name() {
                state.summary.unnamed += 1;
                continue;
            }
            if state.progress.contains(entry.id) {
                state.summary.already_seen += 1;
                continue;
            }
            if self
                .config
                .max_processed
                .is_some_and(|max| state.summary.processed >= max)
            {
                log::info!("Reached processing limit of {}", state.summary.processed);
                state.summary.limit_reached = true;
                break;
            }

            self.process(&mut state, entry).await?;
        }

        state.progress.save(self.store).await?;
        state.summary.total_accepted = state.progress.len();
        state.summary.finished_at = Utc::now();

        log::info!(
            "Finished. {} accepted items written to the progress file ({} new, {} skipped, {} failed)",
            state.summary.total_accepted,
            state.summary.accepted,
            state.summary.skipped,
            state.summary.failed
        );

        Ok(state.summary)
    }

    /// Classify one candidate and apply the outcome to `state`.
    async fn process(&self, state: &mut HarvestState, entry: &CatalogEntry) -> Result<()> {
        match self.classifier.classify(self.details, entry).await {
            Classification::Fail { attempts, last } => {
                state.summary.failed += 1;
                log::warn!(
                    "Failed to fetch details for {} ({}) after {} attempts: {}. Cooling down for {}",
                    entry.name,
                    entry.id,
                    attempts,
                    last,
                    format_delay(self.config.failure_cooldown())
                );
                pause(self.config.failure_cooldown()).await;
                return Ok(());
            }
            Classification::Accept => {
                if state.progress.accept(AcceptedItem::from(entry)) {
                    state.summary.accepted += 1;
                    log::info!("[{}] Accepted: {}", state.progress.len(), entry.name);
                } else {
                    state.summary.already_seen += 1;
                    log::debug!("Already saved: {} ({})", entry.name, entry.id);
                }
            }
            Classification::Skip { item_type } => {
                state.summary.skipped += 1;
                log::info!(
                    "Skipped: {} ({})",
                    entry.name,
                    item_type.as_deref().unwrap_or("no type")
                );
            }
        }

        state.summary.processed += 1;
        state.progress.save(self.store).await?;
        pause(self.config.request_delay()).await;
        Ok(())
    }
}

/// Run the harvester with the given sources and store.
pub async fn run_harvest(
    config: &Config,
    catalog: &dyn CatalogSource,
    details: &dyn DetailSource,
    store: &dyn ProgressStore,
) -> Result<RunSummary> {
    Harvester::new(config, catalog, details, store).run().await
}

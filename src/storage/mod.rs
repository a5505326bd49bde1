//! Progress persistence.
//!
//! The only persisted state is the ordered list of accepted items. It is
//! read once at start-up and rewritten in full after every processed
//! candidate:
//!
//! ```text
//! games.json
//! [
//!   { "id": 10, "name": "Counter-Strike" },
//!   { "id": 70, "name": "Half-Life" }
//! ]
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::AcceptedItem;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for progress storage backends.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load previously accepted items. Missing or unreadable state is empty.
    async fn load(&self) -> Vec<AcceptedItem>;

    /// Overwrite the stored list with `items`.
    async fn save(&self, items: &[AcceptedItem]) -> Result<()>;
}

/// Accepted items plus the set of their ids.
///
/// `accept` is the only mutator, so the list never holds a duplicate id and
/// the seen set always mirrors it.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    items: Vec<AcceptedItem>,
    seen: HashSet<u64>,
}

impl Progress {
    /// Build from a loaded list, dropping later duplicates of an id.
    pub fn from_items(items: Vec<AcceptedItem>) -> Self {
        let mut progress = Self::default();
        let total = items.len();
        for item in items {
            progress.accept(item);
        }
        if progress.len() < total {
            log::warn!(
                "Dropped {} duplicate entries from progress file",
                total - progress.len()
            );
        }
        progress
    }

    /// Load through a store.
    pub async fn load(store: &dyn ProgressStore) -> Self {
        Self::from_items(store.load().await)
    }

    /// Persist through a store.
    pub async fn save(&self, store: &dyn ProgressStore) -> Result<()> {
        store.save(&self.items).await
    }

    pub fn contains(&self, id: u64) -> bool {
        self.seen.contains(&id)
    }

    /// Append an item. Returns false if its id is already present.
    pub fn accept(&mut self, item: AcceptedItem) -> bool {
        if !self.seen.insert(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn items(&self) -> &[AcceptedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, name: &str) -> AcceptedItem {
        AcceptedItem {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_accept_rejects_duplicate_id() {
        let mut progress = Progress::default();
        assert!(progress.accept(item(1, "A")));
        assert!(!progress.accept(item(1, "A again")));
        assert_eq!(progress.len(), 1);
        assert_eq!(progress.items()[0].name, "A");
        assert!(progress.contains(1));
        assert!(!progress.contains(2));
    }

    #[test]
    fn test_from_items_keeps_first_and_order() {
        let progress = Progress::from_items(vec![item(3, "C"), item(1, "A"), item(3, "C2")]);
        let ids: Vec<u64> = progress.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(progress.items()[0].name, "C");
    }
}

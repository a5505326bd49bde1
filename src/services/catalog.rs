// src/services/catalog.rs

//! Catalog fetcher.

use crate::error::Result;
use crate::models::CatalogEntry;
use crate::services::CatalogSource;

/// Fetch the candidate list once. There is no retry: without a catalog
/// there is nothing to do, so any failure is returned to the caller.
pub async fn fetch_catalog(source: &dyn CatalogSource) -> Result<Vec<CatalogEntry>> {
    log::info!("Fetching app catalog...");
    let entries = source.fetch_catalog().await?;
    let named = entries.iter().filter(|e| e.has_name()).count();
    log::info!(
        "Catalog loaded: {} entries ({} with a name)",
        entries.len(),
        named
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;

    struct FixedCatalog(Vec<CatalogEntry>);

    #[async_trait]
    impl CatalogSource for FixedCatalog {
        async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogSource for BrokenCatalog {
        async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
            Err(AppError::catalog("http://catalog.test", "connection refused"))
        }
    }

    #[tokio::test]
    async fn test_fetch_keeps_order() {
        let source = FixedCatalog(vec![
            CatalogEntry::new(3, "C"),
            CatalogEntry::new(1, "A"),
            CatalogEntry::new(2, ""),
        ]);
        let entries = fetch_catalog(&source).await.unwrap();
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let err = fetch_catalog(&BrokenCatalog).await.unwrap_err();
        assert!(matches!(err, AppError::Catalog { .. }));
    }
}

// src/models/catalog.rs

//! Catalog entries, accepted items and the detail payload shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the remote app catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "appid")]
    pub id: u64,

    /// Display name; absent names come through as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Whether the entry has a usable display name.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Envelope returned by the catalog endpoint: `{"applist": {"apps": [...]}}`.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub applist: AppList,
}

#[derive(Debug, Deserialize)]
pub struct AppList {
    #[serde(default)]
    pub apps: Vec<CatalogEntry>,
}

impl CatalogResponse {
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.applist.apps
    }
}

/// An entry that was classified as the target type and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedItem {
    #[serde(alias = "appid")]
    pub id: u64,
    pub name: String,
}

impl From<&CatalogEntry> for AcceptedItem {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
        }
    }
}

/// Per-id record of the detail endpoint: `{"success": bool, "data": {"type": ...}}`.
///
/// `data` is kept loose because the endpoint sends `[]` or omits it for
/// unsuccessful lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailRecord {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub data: Option<Value>,
}

impl DetailRecord {
    /// Declared item type, if the payload carries one.
    pub fn item_type(&self) -> Option<&str> {
        self.data.as_ref()?.get("type")?.as_str()
    }
}

/// Full detail payload, keyed by the id rendered as a string.
pub type DetailPayload = HashMap<String, DetailRecord>;

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

//! Entity directory: which page holds whose schedule
//!
//! The directory is built once at startup from the site's index pages and is
//! read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use super::fetcher::{ConnectionManager, Transport};
use crate::config::LinksConfig;
use crate::error::Result;
use crate::models::{Role, Source};
use crate::parser::parse_index;
use crate::utils::error::{FetchError, ValidationError};

/// Entity name to absolute page URL
pub type EntityLinks = BTreeMap<String, String>;

/// Mapping from (category, role, entity name) to the entity's page
///
/// A source maps to `None` when its index could not be fetched or parsed.
#[derive(Debug, Clone, Default)]
pub struct LinkDirectory {
    sources: BTreeMap<Source, Option<EntityLinks>>,
}

impl LinkDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the directory from every configured index page
    ///
    /// Each source is attempted independently; a failed source is recorded
    /// as unavailable and does not stop the others.
    pub async fn build<T: Transport>(manager: &ConnectionManager<T>, links: &LinksConfig) -> Self {
        let mut directory = Self::new();

        for source in Source::all() {
            let Some(index_url) = links.index_url(source) else {
                continue;
            };
            let entries = build_directory(manager, source, index_url, &links.base).await;
            directory.insert(source, entries);
        }

        tracing::info!(
            available = directory.available().count(),
            total = directory.sources.len(),
            "Built link directory"
        );
        directory
    }

    /// Record the entries for a source
    pub fn insert(&mut self, source: Source, entries: Option<EntityLinks>) {
        self.sources.insert(source, entries);
    }

    /// Entries for a source, if it was built successfully
    pub fn entries(&self, source: Source) -> Option<&EntityLinks> {
        self.sources.get(&source).and_then(Option::as_ref)
    }

    /// Sources that were built successfully
    pub fn available(&self) -> impl Iterator<Item = Source> + '_ {
        self.sources
            .iter()
            .filter(|(_, entries)| entries.is_some())
            .map(|(source, _)| *source)
    }

    /// Look up an entity's page URL within a source
    ///
    /// # Errors
    ///
    /// `DirectoryUnavailable` when the source was never built or failed to
    /// build, `UnknownEntity` when the name is not listed.
    pub fn lookup(&self, source: Source, entity: &str) -> Result<&str> {
        let entries = self
            .entries(source)
            .ok_or(FetchError::DirectoryUnavailable(source))?;

        entries.get(entity).map(String::as_str).ok_or_else(|| {
            ValidationError::UnknownEntity {
                role: source.role,
                entity: entity.to_string(),
            }
            .into()
        })
    }

    /// Look up an entity's schedule page
    pub fn resolve(&self, role: Role, entity: &str) -> Result<&str> {
        self.lookup(Source::schedule(role), entity)
    }

    /// Serialize as `{"s_group": {name: url}, ...}`, with `null` for failed sources
    pub fn to_snapshot(&self) -> Result<String> {
        let snapshot: BTreeMap<String, &Option<EntityLinks>> = self
            .sources
            .iter()
            .map(|(source, entries)| (source.key(), entries))
            .collect();
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Write the diagnostic snapshot to a file
    pub async fn write_snapshot(&self, path: &Path) -> Result<()> {
        let json = self.to_snapshot()?;
        tokio::fs::write(path, json).await?;
        tracing::debug!(path = %path.display(), "Wrote link directory snapshot");
        Ok(())
    }
}

/// Fetch and parse one index page
///
/// Returns `None` when the page cannot be fetched or has no data table.
pub async fn build_directory<T: Transport>(
    manager: &ConnectionManager<T>,
    source: Source,
    index_url: &str,
    base: &str,
) -> Option<EntityLinks> {
    let html = match manager.fetch(index_url).await {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(source = %source, url = %index_url, error = %e, "Directory unavailable");
            return None;
        }
    };

    match parse_index(&html, base) {
        Ok(entries) => {
            tracing::debug!(source = %source, entities = entries.len(), "Parsed index page");
            Some(entries)
        }
        Err(e) => {
            tracing::error!(source = %source, url = %index_url, error = %e, "Index page has no entity table");
            None
        }
    }
}

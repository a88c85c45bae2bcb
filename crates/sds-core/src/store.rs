//! Persistence collaborator
//!
//! The studio never talks to SharePoint itself; hosts supply a
//! [`SiteDesignsStore`]. [`InMemorySiteDesignsStore`] backs tests and the CLI.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use sds_script::{SiteDesign, SiteScript};

const SITE_SCRIPT: &str = "site script";
const SITE_DESIGN: &str = "site design";

/// Site script and site design persistence
///
/// Saving a record without an id creates it and returns it with its new id;
/// saving with an id updates the existing record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SiteDesignsStore: Send + Sync {
    /// All site scripts
    async fn get_site_scripts(&self) -> StoreResult<Vec<SiteScript>>;

    /// One site script
    async fn get_site_script(&self, id: &str) -> StoreResult<SiteScript>;

    /// Create or update a site script
    async fn save_site_script(&self, script: SiteScript) -> StoreResult<SiteScript>;

    /// Delete a site script
    async fn delete_site_script(&self, id: &str) -> StoreResult<()>;

    /// All site designs
    async fn get_site_designs(&self) -> StoreResult<Vec<SiteDesign>>;

    /// One site design
    async fn get_site_design(&self, id: &str) -> StoreResult<SiteDesign>;

    /// Create or update a site design
    async fn save_site_design(&self, design: SiteDesign) -> StoreResult<SiteDesign>;

    /// Delete a site design
    async fn delete_site_design(&self, id: &str) -> StoreResult<()>;
}

/// Process-local store keyed by generated UUIDs
#[derive(Debug, Default)]
pub struct InMemorySiteDesignsStore {
    scripts: DashMap<String, SiteScript>,
    designs: DashMap<String, SiteDesign>,
}

impl InMemorySiteDesignsStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored site scripts
    #[inline]
    #[must_use]
    pub fn site_script_count(&self) -> usize {
        self.scripts.len()
    }

    /// Number of stored site designs
    #[inline]
    #[must_use]
    pub fn site_design_count(&self) -> usize {
        self.designs.len()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl SiteDesignsStore for InMemorySiteDesignsStore {
    async fn get_site_scripts(&self) -> StoreResult<Vec<SiteScript>> {
        let mut scripts: Vec<_> = self.scripts.iter().map(|e| e.value().clone()).collect();
        scripts.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(scripts)
    }

    async fn get_site_script(&self, id: &str) -> StoreResult<SiteScript> {
        self.scripts
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| StoreError::not_found(SITE_SCRIPT, id))
    }

    async fn save_site_script(&self, mut script: SiteScript) -> StoreResult<SiteScript> {
        match script.id.clone() {
            None => {
                let id = new_id();
                script.id = Some(id.clone());
                self.scripts.insert(id.clone(), script.clone());
                tracing::info!(%id, title = %script.title, "created site script");
            }
            Some(id) => {
                let mut stored = self
                    .scripts
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::not_found(SITE_SCRIPT, id.as_str()))?;
                if script.content.is_none() {
                    script.content = stored.content.clone();
                }
                *stored = script.clone();
                tracing::info!(%id, title = %script.title, "updated site script");
            }
        }
        Ok(script)
    }

    async fn delete_site_script(&self, id: &str) -> StoreResult<()> {
        self.scripts
            .remove(id)
            .map(|_| tracing::info!(id, "deleted site script"))
            .ok_or_else(|| StoreError::not_found(SITE_SCRIPT, id))
    }

    async fn get_site_designs(&self) -> StoreResult<Vec<SiteDesign>> {
        let mut designs: Vec<_> = self.designs.iter().map(|e| e.value().clone()).collect();
        designs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(designs)
    }

    async fn get_site_design(&self, id: &str) -> StoreResult<SiteDesign> {
        self.designs
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| StoreError::not_found(SITE_DESIGN, id))
    }

    async fn save_site_design(&self, mut design: SiteDesign) -> StoreResult<SiteDesign> {
        match design.id.clone() {
            None => {
                let id = new_id();
                design.id = Some(id.clone());
                self.designs.insert(id.clone(), design.clone());
                tracing::info!(%id, title = %design.title, "created site design");
            }
            Some(id) => {
                let mut stored = self
                    .designs
                    .get_mut(&id)
                    .ok_or_else(|| StoreError::not_found(SITE_DESIGN, id.as_str()))?;
                *stored = design.clone();
                tracing::info!(%id, title = %design.title, "updated site design");
            }
        }
        Ok(design)
    }

    async fn delete_site_design(&self, id: &str) -> StoreResult<()> {
        self.designs
            .remove(id)
            .map(|_| tracing::info!(id, "deleted site design"))
            .ok_or_else(|| StoreError::not_found(SITE_DESIGN, id))
    }
}

//! Studio facade
//!
//! Wires one [`SchemaEngine`], the rendering dispatcher, a directory and a
//! store together from a [`StudioConfig`].

use crate::config::StudioConfig;
use crate::error::StudioResult;
use crate::pickers::{self, DirectoryProvider, StaticDirectory};
use crate::session::ScriptEditorSession;
use crate::store::{InMemorySiteDesignsStore, SiteDesignsStore};
use sds_render::PropertyRenderingDispatcher;
use sds_schema::SchemaEngine;
use sds_script::SiteScript;
use std::fmt;
use std::sync::Arc;

/// Composition root of the authoring core
pub struct Studio {
    config: StudioConfig,
    engine: Arc<SchemaEngine>,
    dispatcher: Arc<PropertyRenderingDispatcher>,
    directory: Arc<dyn DirectoryProvider>,
    store: Arc<dyn SiteDesignsStore>,
}

impl fmt::Debug for Studio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Studio")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl Studio {
    /// Studio with an empty directory and an in-memory store
    #[must_use]
    pub fn new(config: StudioConfig) -> Self {
        let engine = match &config.base_url {
            Some(base_url) => SchemaEngine::new().with_base_url(base_url.clone()),
            None => SchemaEngine::new(),
        };
        let engine = Arc::new(engine);

        Self {
            dispatcher: Arc::new(PropertyRenderingDispatcher::new(Arc::clone(&engine))),
            engine,
            config,
            directory: Arc::new(StaticDirectory::default()),
            store: Arc::new(InMemorySiteDesignsStore::new()),
        }
    }

    /// With a tenant directory for the pickers
    #[must_use]
    pub fn with_directory(mut self, directory: Arc<dyn DirectoryProvider>) -> Self {
        self.directory = directory;
        self
    }

    /// With a persistence collaborator
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SiteDesignsStore>) -> Self {
        self.store = store;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Schema engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &Arc<SchemaEngine> {
        &self.engine
    }

    /// Rendering dispatcher
    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<PropertyRenderingDispatcher> {
        &self.dispatcher
    }

    /// Persistence collaborator
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SiteDesignsStore> {
        &self.store
    }

    /// Load the schema and register the built-in pickers
    ///
    /// `force_reconfigure` reloads the schema and drops cached action schemas.
    pub async fn configure(&self, force_reconfigure: bool) -> StudioResult<()> {
        self.engine
            .configure(self.config.schema_source.as_deref(), force_reconfigure)
            .await?;
        if force_reconfigure {
            self.dispatcher.invalidate_schemas();
        }
        if self.config.register_default_pickers {
            pickers::register_default_pickers(&self.dispatcher, self.directory.as_ref()).await?;
        }
        tracing::info!(
            source = self.config.schema_source.as_deref().unwrap_or("embedded"),
            renderers = self.dispatcher.renderer_count(),
            "studio configured"
        );
        Ok(())
    }

    /// Editor session on a script
    #[must_use]
    pub fn open_script(&self, script: SiteScript) -> ScriptEditorSession {
        ScriptEditorSession::new(Arc::clone(&self.engine), script, &self.config)
    }

    /// Editor session on a blank script
    #[must_use]
    pub fn new_script(&self, title: impl Into<String>) -> ScriptEditorSession {
        self.open_script(SiteScript::new(title))
    }

    /// Editor session on a stored script
    pub async fn load_script(&self, id: &str) -> StudioResult<ScriptEditorSession> {
        let script = self.store.get_site_script(id).await?;
        tracing::debug!(id, title = %script.title, "loaded site script");
        Ok(self.open_script(script))
    }
}

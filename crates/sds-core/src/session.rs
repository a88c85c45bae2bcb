//! Script editor session
//!
//! Keeps the designer tree and the code view of one site script in sync.
//! Designer edits replace the tree and regenerate the code; code edits are
//! validated and, when valid, rebuild the tree while keeping the editing
//! keys. Both paths go through a [`Debouncer`] so bursts of edits apply once.

use crate::config::StudioConfig;
use crate::error::{SaveBlocker, StudioResult};
use crate::store::SiteDesignsStore;
use sds_content::{ContentUiWrapper, Debouncer};
use sds_schema::{SchemaEngine, SchemaError, ValidationReport};
use sds_script::text::strip_block_comments;
use sds_script::{SiteScript, SiteScriptContent};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Where the current content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOrigin {
    /// Designer (tree) edit
    Designer,
    /// Code view edit
    Code,
    /// Loaded or reset
    #[default]
    Other,
}

/// Validity of the code view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CodeState {
    /// Last code text was applied, or the code mirrors the tree
    #[default]
    Valid,
    /// JSON that does not match the schema
    SchemaInvalid(ValidationReport),
    /// Not JSON
    Malformed(String),
}

impl CodeState {
    /// Whether the code view can be saved
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Outcome of applying code-view text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSync {
    /// Text replaced the content
    Applied,
    /// Text equals the current code
    Unchanged,
    /// Text is JSON but violates the schema; tree kept
    SchemaInvalid,
    /// Text is not JSON; tree kept
    Malformed,
}

/// Change applied by [`ScriptEditorSession::next_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A debounced designer commit
    Designer,
    /// A debounced code edit
    Code(CodeSync),
}

/// Editing state of one site script
#[derive(Debug)]
pub struct ScriptEditorSession {
    engine: Arc<SchemaEngine>,
    metadata: SiteScript,
    wrapper: ContentUiWrapper,
    code_state: CodeState,
    origin: UpdateOrigin,
    code_edits: Debouncer<String>,
    code_rx: UnboundedReceiver<String>,
    commits: Debouncer<ContentUiWrapper>,
    commit_rx: UnboundedReceiver<ContentUiWrapper>,
}

impl ScriptEditorSession {
    /// Open a session on a script; a script without content starts blank
    #[must_use]
    pub fn new(engine: Arc<SchemaEngine>, mut script: SiteScript, config: &StudioConfig) -> Self {
        let content = script
            .content
            .take()
            .unwrap_or_else(|| engine.get_new_site_script());
        let (code_edits, code_rx) = Debouncer::new(config.code_debounce());
        let (commits, commit_rx) = Debouncer::new(config.commit_debounce());

        Self {
            engine,
            metadata: script,
            wrapper: ContentUiWrapper::new(Some(&content)),
            code_state: CodeState::Valid,
            origin: UpdateOrigin::Other,
            code_edits,
            code_rx,
            commits,
            commit_rx,
        }
    }

    /// Script metadata; content lives in [`Self::wrapper`]
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &SiteScript {
        &self.metadata
    }

    /// Current action tree
    #[inline]
    #[must_use]
    pub fn wrapper(&self) -> &ContentUiWrapper {
        &self.wrapper
    }

    /// Code view validity
    #[inline]
    #[must_use]
    pub fn code_state(&self) -> &CodeState {
        &self.code_state
    }

    /// Origin of the last applied change
    #[inline]
    #[must_use]
    pub fn origin(&self) -> UpdateOrigin {
        self.origin
    }

    /// Current persisted content
    #[must_use]
    pub fn content(&self) -> SiteScriptContent {
        self.wrapper.to_site_script_content(None)
    }

    /// Code view text of the current tree
    pub fn code(&self) -> StudioResult<String> {
        Ok(self.wrapper.to_json()?)
    }

    /// Script with its current content
    #[must_use]
    pub fn to_site_script(&self) -> SiteScript {
        SiteScript {
            content: Some(self.content()),
            ..self.metadata.clone()
        }
    }

    /// Set the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = title.into();
    }

    /// Set the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.metadata.description = description.into();
    }

    /// Set the version from user input; non-numeric input is ignored
    pub fn set_version_text(&mut self, text: &str) -> bool {
        match text.trim().parse::<u32>() {
            Ok(version) => {
                self.metadata.version = version;
                true
            }
            Err(_) => false,
        }
    }

    /// Apply a designer edit now
    pub fn apply_designer(&mut self, wrapper: ContentUiWrapper) {
        if wrapper == self.wrapper {
            return;
        }
        self.wrapper = wrapper;
        self.code_state = CodeState::Valid;
        self.origin = UpdateOrigin::Designer;
        tracing::debug!(actions = self.wrapper.actions().len(), "designer change applied");
    }

    /// Schedule a designer edit; rapid commits coalesce into the latest
    pub fn commit_designer(&self, wrapper: ContentUiWrapper) {
        self.commits.schedule(wrapper);
    }

    /// Schedule a code-view edit; empty text is ignored
    pub fn code_changed(&self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.code_edits.schedule(text);
    }

    /// Apply code-view text now
    ///
    /// Block comments are stripped first. Invalid text is recorded in
    /// [`Self::code_state`] and leaves the tree untouched.
    pub fn apply_code(&mut self, text: &str) -> StudioResult<CodeSync> {
        let text = strip_block_comments(text);
        if self.wrapper.is_equal_to_raw_json(&text) {
            // the tree's own JSON always passes
            self.code_state = CodeState::Valid;
            return Ok(CodeSync::Unchanged);
        }

        let report = match self.engine.validate_report(&text) {
            Ok(report) => report,
            Err(SchemaError::MalformedJson(err)) => {
                tracing::warn!(error = %err, "code is not valid JSON");
                self.code_state = CodeState::Malformed(err.to_string());
                self.origin = UpdateOrigin::Code;
                return Ok(CodeSync::Malformed);
            }
            Err(err) => return Err(err.into()),
        };

        if !report.is_valid() {
            tracing::debug!(violations = report.violations.len(), "code does not match the schema");
            self.code_state = CodeState::SchemaInvalid(report);
            self.origin = UpdateOrigin::Code;
            return Ok(CodeSync::SchemaInvalid);
        }

        let content = SiteScriptContent::from_json(&text)?;
        let editing = self.wrapper.editing_keys().clone();
        self.wrapper = ContentUiWrapper::new(Some(&content)).with_editing_keys(editing);
        self.code_state = CodeState::Valid;
        self.origin = UpdateOrigin::Code;
        tracing::debug!(actions = content.actions.len(), "code change applied");
        Ok(CodeSync::Applied)
    }

    /// Whether a debounced edit is waiting
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.code_edits.is_pending() || self.commits.is_pending()
    }

    /// Wait for the next debounced edit and apply it
    ///
    /// Returns `None` when nothing is scheduled.
    pub async fn next_update(&mut self) -> StudioResult<Option<SessionUpdate>> {
        // read before draining: a flush that finished earlier is already queued
        let pending = self.has_pending();
        if let Ok(wrapper) = self.commit_rx.try_recv() {
            self.apply_designer(wrapper);
            return Ok(Some(SessionUpdate::Designer));
        }
        if let Ok(text) = self.code_rx.try_recv() {
            return self.apply_code(&text).map(|sync| Some(SessionUpdate::Code(sync)));
        }
        if !pending {
            return Ok(None);
        }

        tokio::select! {
            Some(wrapper) = self.commit_rx.recv() => {
                self.apply_designer(wrapper);
                Ok(Some(SessionUpdate::Designer))
            }
            Some(text) = self.code_rx.recv() => {
                self.apply_code(&text).map(|sync| Some(SessionUpdate::Code(sync)))
            }
            else => Ok(None),
        }
    }

    /// Drop scheduled edits
    pub fn cancel_pending(&self) {
        self.code_edits.cancel();
        self.commits.cancel();
    }

    /// Whether the script may be saved
    pub fn check_valid_for_save(&self) -> Result<(), SaveBlocker> {
        if self.metadata.title.trim().is_empty() {
            return Err(SaveBlocker::MissingTitle);
        }
        if !self.code_state.is_valid() {
            return Err(SaveBlocker::InvalidCode);
        }
        Ok(())
    }

    /// Save through a store; the stored record becomes the session's metadata
    pub async fn save(&mut self, store: &dyn SiteDesignsStore) -> StudioResult<SiteScript> {
        self.check_valid_for_save()?;
        let mut saved = store.save_site_script(self.to_site_script()).await?;
        tracing::info!(id = ?saved.id, title = %saved.title, "site script saved");

        let result = saved.clone();
        saved.content = None;
        self.metadata = saved;
        self.origin = UpdateOrigin::Other;
        Ok(result)
    }
}

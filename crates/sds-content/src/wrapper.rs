//! Content UI wrapper
//!
//! Immutable, keyed view of a script's action tree. Every structural edit
//! returns a new [`ContentUiWrapper`]; the receiver is never modified, so
//! callers can diff old and new instances or use them as memo keys.
//!
//! # Key stability
//!
//! Along one lineage (each edit consuming the previous result) a node keeps
//! its key until it is removed. Reorders and sibling inserts never renumber.
//! A wrapper rebuilt with [`ContentUiWrapper::new`] starts counting afresh;
//! carry editing state over explicitly with
//! [`ContentUiWrapper::with_editing_keys`].

use crate::error::{StructureError, StructureResult};
use crate::ui_key::{KeyCounters, UiKey};
use im::{OrdSet, Vector};
use sds_script::text::to_indented_json;
use sds_script::{Action, SiteScriptContent, Verb};
use std::collections::HashMap;

/// Action node with its UI key
#[derive(Debug, Clone, PartialEq)]
pub struct UiAction {
    key: UiKey,
    action: Action,
    subactions: Option<Vector<UiAction>>,
}

impl UiAction {
    fn build(mut action: Action, parent: Option<&UiKey>, counters: &mut KeyCounters) -> Self {
        let key = counters.next_key(action.verb().as_str(), parent);
        let subactions = action.take_subactions().map(|subs| {
            subs.into_iter()
                .map(|sub| Self::build(sub, Some(&key), counters))
                .collect()
        });
        Self {
            key,
            action,
            subactions,
        }
    }

    /// Node key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &UiKey {
        &self.key
    }

    /// Verb
    #[inline]
    #[must_use]
    pub fn verb(&self) -> &Verb {
        self.action.verb()
    }

    /// Verb and properties, without sub-actions
    #[inline]
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Sub-action nodes
    #[inline]
    #[must_use]
    pub fn subactions(&self) -> Option<&Vector<UiAction>> {
        self.subactions.as_ref()
    }

    /// Same node with new verb and properties
    ///
    /// Sub-action nodes are kept; any sub-actions carried by `action` are
    /// ignored. Sub-action lists change through the wrapper's sub-action
    /// operations.
    #[must_use]
    pub fn with_content(&self, mut action: Action) -> Self {
        action.take_subactions();
        Self {
            key: self.key.clone(),
            action,
            subactions: self.subactions.clone(),
        }
    }

    /// Plain action, sub-actions included
    #[must_use]
    pub fn to_action(&self) -> Action {
        self.to_action_with(None)
    }

    fn to_action_with(&self, overrides: Option<&ActionOverrides>) -> Action {
        let mut action = self.action.clone();
        if let Some(subactions) = &self.subactions {
            let subs = subactions
                .iter()
                .map(|sub| effective(sub, overrides).to_action())
                .collect();
            action = action.with_subactions(subs);
        }
        action
    }

    fn sub_position(&self, key: &UiKey) -> Option<usize> {
        self.subactions.as_ref()?.iter().position(|s| &s.key == key)
    }
}

/// Per-key replacement nodes used while serializing
///
/// Lets in-flight, not yet committed edits show up in the output without
/// touching the tree.
pub type ActionOverrides = HashMap<UiKey, Box<dyn Fn() -> UiAction + Send + Sync>>;

fn effective(node: &UiAction, overrides: Option<&ActionOverrides>) -> UiAction {
    overrides
        .and_then(|o| o.get(&node.key))
        .map_or_else(|| node.clone(), |replace| replace())
}

/// Copy-on-write action tree of one script
#[derive(Debug, Clone, Default)]
pub struct ContentUiWrapper {
    base: SiteScriptContent,
    actions: Vector<UiAction>,
    editing_keys: OrdSet<UiKey>,
    counters: KeyCounters,
}

impl PartialEq for ContentUiWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.actions == other.actions
            && self.editing_keys == other.editing_keys
    }
}

impl ContentUiWrapper {
    /// Wrap script content; `None` gives an empty tree
    #[must_use]
    pub fn new(content: Option<&SiteScriptContent>) -> Self {
        let Some(content) = content else {
            return Self::default();
        };

        let mut counters = KeyCounters::default();
        let actions = content
            .actions
            .iter()
            .map(|action| UiAction::build(action.clone(), None, &mut counters))
            .collect();
        let base = SiteScriptContent {
            actions: Vec::new(),
            ..content.clone()
        };

        Self {
            base,
            actions,
            editing_keys: OrdSet::new(),
            counters,
        }
    }

    /// Same tree with the given editing keys
    #[must_use]
    pub fn with_editing_keys(&self, keys: impl IntoIterator<Item = UiKey>) -> Self {
        let mut next = self.clone();
        next.editing_keys = keys.into_iter().collect();
        next
    }

    /// Root nodes
    #[inline]
    #[must_use]
    pub fn actions(&self) -> &Vector<UiAction> {
        &self.actions
    }

    /// Keys of nodes in edit mode
    #[inline]
    #[must_use]
    pub fn editing_keys(&self) -> &OrdSet<UiKey> {
        &self.editing_keys
    }

    /// Whether a node is in edit mode
    #[inline]
    #[must_use]
    pub fn is_editing(&self, key: &UiKey) -> bool {
        self.editing_keys.contains(key)
    }

    /// Node by key, root or sub-action
    #[must_use]
    pub fn find(&self, key: &UiKey) -> Option<&UiAction> {
        self.actions.iter().find_map(|node| {
            if &node.key == key {
                return Some(node);
            }
            node.subactions.as_ref()?.iter().find(|sub| &sub.key == key)
        })
    }

    /// Parent of a sub-action node
    #[must_use]
    pub fn find_parent(&self, key: &UiKey) -> Option<&UiAction> {
        self.actions
            .iter()
            .find(|node| node.sub_position(key).is_some())
    }

    fn root_position(&self, key: &UiKey) -> StructureResult<usize> {
        self.actions
            .iter()
            .position(|node| &node.key == key)
            .ok_or_else(|| StructureError::UnknownKey(key.clone()))
    }

    /// Append a root action; it opens in edit mode
    #[must_use]
    pub fn add_action(&self, action: Action) -> Self {
        let mut next = self.clone();
        let node = UiAction::build(action, None, &mut next.counters);
        tracing::debug!(key = %node.key, "action added");
        next.editing_keys.insert(node.key.clone());
        next.actions.push_back(node);
        next
    }

    /// Remove a root action
    pub fn remove_action(&self, key: &UiKey) -> StructureResult<Self> {
        let position = self.root_position(key)?;
        let mut next = self.clone();
        let removed = next.actions.remove(position);
        next.editing_keys.remove(key);
        for sub in removed.subactions.iter().flatten() {
            next.editing_keys.remove(&sub.key);
        }
        Ok(next)
    }

    /// Append a sub-action under a root action; it opens in edit mode
    pub fn add_sub_action(&self, parent_key: &UiKey, action: Action) -> StructureResult<Self> {
        let position = self.root_position(parent_key)?;
        let mut next = self.clone();
        let node = UiAction::build(action, Some(parent_key), &mut next.counters);
        next.editing_keys.insert(node.key.clone());
        if let Some(parent) = next.actions.get_mut(position) {
            parent.subactions.get_or_insert_with(Vector::new).push_back(node);
        }
        Ok(next)
    }

    /// Remove a sub-action from its parent
    pub fn remove_sub_action(&self, parent_key: &UiKey, key: &UiKey) -> StructureResult<Self> {
        let position = self.root_position(parent_key)?;
        let sub_position = self.actions[position]
            .sub_position(key)
            .ok_or_else(|| StructureError::UnknownKey(key.clone()))?;

        let mut next = self.clone();
        if let Some(subs) = next
            .actions
            .get_mut(position)
            .and_then(|parent| parent.subactions.as_mut())
        {
            subs.remove(sub_position);
        }
        next.editing_keys.remove(key);
        Ok(next)
    }

    /// Substitute the node carrying `updated`'s key, in place
    ///
    /// Matches root actions and their direct sub-actions.
    pub fn replace_action(&self, updated: UiAction) -> StructureResult<Self> {
        let key = updated.key.clone();
        let mut next = self.clone();

        if let Ok(position) = self.root_position(&key) {
            next.actions[position] = updated;
            return Ok(next);
        }

        let found = self.actions.iter().enumerate().find_map(|(i, node)| {
            node.sub_position(&key).map(|j| (i, j))
        });
        let (position, sub_position) = found.ok_or(StructureError::UnknownKey(key))?;
        if let Some(subs) = next
            .actions
            .get_mut(position)
            .and_then(|parent| parent.subactions.as_mut())
        {
            subs[sub_position] = updated;
        }
        Ok(next)
    }

    /// Move the root action at `old_index` to `new_index`
    pub fn reorder_actions(&self, new_index: usize, old_index: usize) -> StructureResult<Self> {
        let len = self.actions.len();
        StructureError::check_index(old_index, len)?;
        StructureError::check_index(new_index, len)?;

        let mut next = self.clone();
        let node = next.actions.remove(old_index);
        next.actions.insert(new_index, node);
        Ok(next)
    }

    /// Move a sub-action within its parent's list
    pub fn reorder_sub_actions(
        &self,
        parent_key: &UiKey,
        new_index: usize,
        old_index: usize,
    ) -> StructureResult<Self> {
        let position = self.root_position(parent_key)?;
        let len = self.actions[position]
            .subactions
            .as_ref()
            .map(Vector::len)
            .ok_or_else(|| StructureError::NoSubActions(parent_key.clone()))?;
        StructureError::check_index(old_index, len)?;
        StructureError::check_index(new_index, len)?;

        let mut next = self.clone();
        if let Some(subs) = next
            .actions
            .get_mut(position)
            .and_then(|parent| parent.subactions.as_mut())
        {
            let node = subs.remove(old_index);
            subs.insert(new_index, node);
        }
        Ok(next)
    }

    /// Flip edit mode of a node
    pub fn toggle_editing(&self, key: &UiKey) -> StructureResult<Self> {
        if self.find(key).is_none() {
            return Err(StructureError::UnknownKey(key.clone()));
        }
        let mut next = self.clone();
        if next.editing_keys.remove(key).is_none() {
            next.editing_keys.insert(key.clone());
        }
        Ok(next)
    }

    /// Leave edit mode everywhere except for `except`
    #[must_use]
    pub fn clear_editing(&self, except: Option<&[UiKey]>) -> Self {
        let mut next = self.clone();
        next.editing_keys = match except {
            Some(keep) => self
                .editing_keys
                .iter()
                .filter(|key| keep.contains(key))
                .cloned()
                .collect(),
            None => OrdSet::new(),
        };
        next
    }

    /// Plain persisted content, keys stripped
    ///
    /// Nodes with an entry in `overrides` are replaced by what the entry
    /// yields, at both levels.
    #[must_use]
    pub fn to_site_script_content(&self, overrides: Option<&ActionOverrides>) -> SiteScriptContent {
        let actions = self
            .actions
            .iter()
            .map(|node| effective(node, overrides).to_action_with(overrides))
            .collect();
        SiteScriptContent {
            actions,
            ..self.base.clone()
        }
    }

    /// Content as 4-space indented JSON
    pub fn to_json(&self) -> StructureResult<String> {
        Ok(to_indented_json(&self.to_site_script_content(None))?)
    }

    /// Whether `text` is exactly this tree's JSON
    #[must_use]
    pub fn is_equal_to_raw_json(&self, text: &str) -> bool {
        self.to_json().is_ok_and(|json| json == text)
    }
}

//! Built-in pickers
//!
//! | action | property | control |
//! |---|---|---|
//! | `joinHubSite` | `hubSiteId` | hub site picker |
//! | `installSolution` | `id` | app picker |
//! | `applyTheme` | `themeName` | theme picker |
//! | `createSPList` | `templateType` | list template picker |
//!
//! Tenant lookups go through [`DirectoryProvider`]; a failed lookup leaves
//! the picker with a placeholder option and free-form input.

use crate::error::StudioResult;
use async_trait::async_trait;
use sds_render::{ChoiceOption, CustomControl, CustomRenderInput, PropertyRenderingDispatcher};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Control kind of the hub site picker
pub const HUB_SITE_PICKER: &str = "hubSitePicker";
/// Control kind of the app picker
pub const APP_PICKER: &str = "appPicker";
/// Control kind of the theme picker
pub const THEME_PICKER: &str = "themePicker";
/// Control kind of the list template picker
pub const LIST_TEMPLATE_PICKER: &str = "listTemplatePicker";

const NO_HUB_SITES_KEY: &str = "NoAvailableHubSites";
const NO_APPS_KEY: &str = "noAvailableApps";
const NO_THEMES_KEY: &str = "noAvailableThemes";

/// List templates offered by the list template picker
pub const LIST_TEMPLATES: [(u32, &str); 12] = [
    (100, "Generic List"),
    (101, "Document Library"),
    (102, "Survey"),
    (103, "Links"),
    (104, "Announcements"),
    (105, "Contacts"),
    (106, "Events"),
    (107, "Tasks"),
    (108, "Discussion Board"),
    (109, "Picture Library"),
    (119, "Site Pages"),
    (1100, "Issues Tracking"),
];

/// Hub site or app known to the tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Identifier written into the action
    pub id: String,
    /// Display title
    pub title: String,
}

impl DirectoryEntry {
    /// Create entry
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Tenant directory lookups used by the pickers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryProvider: Send + Sync {
    /// Hub sites of the tenant
    async fn hub_sites(&self) -> StudioResult<Vec<DirectoryEntry>>;

    /// Apps in the tenant app catalog
    async fn apps(&self) -> StudioResult<Vec<DirectoryEntry>>;

    /// Custom theme names
    async fn themes(&self) -> StudioResult<Vec<String>>;
}

/// Fixed directory, empty by default
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    hub_sites: Vec<DirectoryEntry>,
    apps: Vec<DirectoryEntry>,
    themes: Vec<String>,
}

impl StaticDirectory {
    /// With hub sites
    #[must_use]
    pub fn with_hub_sites(mut self, hub_sites: Vec<DirectoryEntry>) -> Self {
        self.hub_sites = hub_sites;
        self
    }

    /// With apps
    #[must_use]
    pub fn with_apps(mut self, apps: Vec<DirectoryEntry>) -> Self {
        self.apps = apps;
        self
    }

    /// With theme names
    #[must_use]
    pub fn with_themes(mut self, themes: Vec<String>) -> Self {
        self.themes = themes;
        self
    }
}

#[async_trait]
impl DirectoryProvider for StaticDirectory {
    async fn hub_sites(&self) -> StudioResult<Vec<DirectoryEntry>> {
        Ok(self.hub_sites.clone())
    }

    async fn apps(&self) -> StudioResult<Vec<DirectoryEntry>> {
        Ok(self.apps.clone())
    }

    async fn themes(&self) -> StudioResult<Vec<String>> {
        Ok(self.themes.clone())
    }
}

/// Whether a picker option may be written into an action
///
/// Placeholder options shown when a lookup came back empty are not values.
#[must_use]
pub fn is_selectable(key: &Value) -> bool {
    !matches!(
        key.as_str(),
        Some(NO_HUB_SITES_KEY | NO_APPS_KEY | NO_THEMES_KEY)
    )
}

fn with_placeholder(options: Vec<ChoiceOption>, key: &str, text: &str) -> Vec<ChoiceOption> {
    if options.is_empty() {
        vec![ChoiceOption::new(key, text)]
    } else {
        options
    }
}

fn current(input: &CustomRenderInput<'_>) -> Value {
    input.value.cloned().unwrap_or(Value::Null)
}

/// Picker over the tenant's hub sites
pub fn hub_site_picker(
    hub_sites: Vec<DirectoryEntry>,
) -> impl Fn(&CustomRenderInput<'_>) -> CustomControl + Send + Sync {
    let options = with_placeholder(
        hub_sites
            .into_iter()
            .map(|hub| ChoiceOption::new(hub.id, hub.title))
            .collect(),
        NO_HUB_SITES_KEY,
        "No available hub sites on this tenant...",
    );
    move |input: &CustomRenderInput<'_>| {
        CustomControl::new(HUB_SITE_PICKER, input.label, current(input)).with_options(options.clone())
    }
}

/// Picker over the tenant app catalog
pub fn app_picker(
    apps: Vec<DirectoryEntry>,
) -> impl Fn(&CustomRenderInput<'_>) -> CustomControl + Send + Sync {
    let options = with_placeholder(
        apps.into_iter()
            .map(|app| ChoiceOption::new(app.id, app.title))
            .collect(),
        NO_APPS_KEY,
        "No available apps in this tenant app catalog...",
    );
    move |input: &CustomRenderInput<'_>| {
        CustomControl::new(APP_PICKER, input.label, current(input)).with_options(options.clone())
    }
}

/// Picker over custom theme names
pub fn theme_picker(
    themes: Vec<String>,
) -> impl Fn(&CustomRenderInput<'_>) -> CustomControl + Send + Sync {
    let options = with_placeholder(
        themes
            .into_iter()
            .map(|name| ChoiceOption::new(name.clone(), name))
            .collect(),
        NO_THEMES_KEY,
        "No available custom themes in this tenant...",
    );
    move |input: &CustomRenderInput<'_>| {
        CustomControl::new(THEME_PICKER, input.label, current(input)).with_options(options.clone())
    }
}

/// Picker over [`LIST_TEMPLATES`]
pub fn list_template_picker() -> impl Fn(&CustomRenderInput<'_>) -> CustomControl + Send + Sync {
    let options: Vec<_> = LIST_TEMPLATES
        .iter()
        .map(|(code, text)| ChoiceOption::new(*code, *text))
        .collect();
    move |input: &CustomRenderInput<'_>| {
        CustomControl::new(LIST_TEMPLATE_PICKER, input.label, current(input))
            .with_options(options.clone())
    }
}

/// Load directory lists and register the four built-in pickers
pub async fn register_default_pickers(
    dispatcher: &PropertyRenderingDispatcher,
    directory: &dyn DirectoryProvider,
) -> StudioResult<()> {
    let (hub_sites, apps, themes) =
        futures::join!(directory.hub_sites(), directory.apps(), directory.themes());

    let hub_sites = hub_sites.unwrap_or_else(|err| {
        tracing::error!(error = %err, "could not load hub sites");
        Vec::new()
    });
    let apps = apps.unwrap_or_else(|err| {
        tracing::error!(error = %err, "could not load apps");
        Vec::new()
    });
    let themes = themes.unwrap_or_else(|err| {
        tracing::error!(error = %err, "could not load custom themes");
        Vec::new()
    });

    dispatcher.register_custom_renderer("joinHubSite", None, "hubSiteId", hub_site_picker(hub_sites), None)?;
    dispatcher.register_custom_renderer("installSolution", None, "id", app_picker(apps), None)?;
    dispatcher.register_custom_renderer("applyTheme", None, "themeName", theme_picker(themes), None)?;
    dispatcher.register_custom_renderer(
        "createSPList",
        None,
        "templateType",
        list_template_picker(),
        None,
    )?;
    tracing::debug!("registered built-in pickers");
    Ok(())
}

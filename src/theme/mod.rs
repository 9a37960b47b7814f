//! Theme controller.
//!
//! Holds the tri-state presentation theme, persists it, and keeps the root presentation context
//! (theme marker plus the mobile `theme-color` meta entry) in sync with it.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::storage::{Storage, THEME_KEY};

/// Name of the meta entry read by mobile browsers to tint their chrome.
pub const THEME_COLOR_META: &str = "theme-color";

/// Visual presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Blue,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Blue, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Blue => "blue",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "blue" => Some(Theme::Blue),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Next theme in the fixed cycle light -> blue -> dark -> light.
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Blue,
            Theme::Blue => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Mobile browser chrome colour for this theme.
    pub fn chrome_color(&self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Blue => "#1E5FBF",
            Theme::Dark => "#0f172a",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Blue => "Blue Mode",
            Theme::Dark => "Dark Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<meta name=... content=...>` style entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub name: String,
    pub content: String,
}

/// Root presentation context: the class markers on the document root plus head metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootContext {
    classes: Vec<String>,
    meta: Vec<MetaEntry>,
}

impl RootContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.content.as_str())
    }

    pub fn meta_entries(&self) -> &[MetaEntry] {
        &self.meta
    }

    /// Update the meta entry called `name`, creating it if missing.
    pub fn upsert_meta(&mut self, name: &str, content: &str) {
        match self.meta.iter_mut().find(|m| m.name == name) {
            Some(entry) => entry.content = content.to_string(),
            None => self.meta.push(MetaEntry {
                name: name.to_string(),
                content: content.to_string(),
            }),
        }
    }
}

/// Owner of the active theme for the lifetime of the portal.
pub struct ThemeController {
    storage: Arc<dyn Storage>,
    state: watch::Sender<Theme>,
    root: RwLock<RootContext>,
}

impl ThemeController {
    /// Resolve the initial theme and apply it.
    ///
    /// A valid persisted value wins, then a dark system preference, then light.
    pub fn new(storage: Arc<dyn Storage>, prefers_dark: bool) -> Self {
        Self::with_root(storage, prefers_dark, RootContext::new())
    }

    /// Like [`ThemeController::new`] but starting from an existing presentation context.
    pub fn with_root(storage: Arc<dyn Storage>, prefers_dark: bool, root: RootContext) -> Self {
        let persisted = match storage.get(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(e) => {
                tracing::warn!("Could not read persisted theme: {}", e);
                None
            }
        };

        let initial = match persisted {
            Some(theme) => theme,
            None if prefers_dark => Theme::Dark,
            None => Theme::Light,
        };

        tracing::debug!(
            "Initial theme {} (persisted: {:?}, prefers dark: {})",
            initial,
            persisted,
            prefers_dark
        );

        let (state, _) = watch::channel(initial);
        let controller = Self {
            storage,
            state,
            root: RwLock::new(root),
        };
        controller.apply(&mut controller.root_mut(), initial);
        controller
    }

    pub fn theme(&self) -> Theme {
        *self.state.borrow()
    }

    /// Advance to the next theme in the cycle and return it.
    ///
    /// The root write lock is held across the state change, root update and persist, so
    /// concurrent toggles land in order.
    pub fn toggle_theme(&self) -> Theme {
        let mut root = self.root_mut();
        let mut next = Theme::Light;
        self.state.send_modify(|theme| {
            *theme = theme.next();
            next = *theme;
        });
        self.apply(&mut root, next);
        drop(root);

        tracing::info!("Theme switched to {}", next);
        next
    }

    /// Watch theme changes.
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.state.subscribe()
    }

    /// Snapshot of the root presentation context.
    pub fn root(&self) -> RootContext {
        self.root
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn root_mut(&self) -> RwLockWriteGuard<'_, RootContext> {
        self.root
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, root: &mut RootContext, theme: Theme) {
        for marker in Theme::ALL {
            root.remove_class(marker.as_str());
        }
        root.add_class(theme.as_str());
        root.upsert_meta(THEME_COLOR_META, theme.chrome_color());

        if let Err(e) = self.storage.set(THEME_KEY, theme.as_str()) {
            tracing::warn!("Could not persist theme {}: {}", theme, e);
        }
    }
}

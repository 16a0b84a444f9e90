//! Theme preference and its key-value store.
//!
//! The only state that outlives a page view is the visitor's theme, kept
//! under [`THEME_KEY`]. Stores are last-write-wins.

use crate::error::{MotionError, MotionResult};
use crate::surface::SurfaceRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Key the theme is stored under
pub const THEME_KEY: &str = "theme";

/// Attribute on the document root carrying the theme
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Colour theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// Stored name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon class shown on the toggle button
    #[must_use]
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fa-moon",
            Self::Dark => "fa-sun",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(MotionError::preference(format!("unknown theme '{other}'"))),
        }
    }
}

/// String key-value storage.
pub trait PreferenceStore {
    /// Stored value for `key`
    fn get(&self, key: &str) -> MotionResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> MotionResult<()>;
}

/// Store kept in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> MotionResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> MotionResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object file, rewritten on every set.
///
/// A missing or unparseable file reads as empty, so the next set rewrites it.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> MotionResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => Ok(values),
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %err,
                        "discarding unreadable preference file"
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> MotionResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> MotionResult<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        tracing::debug!(path = %self.path.display(), key, "preference written");
        Ok(())
    }
}

/// Loads, toggles and applies the theme.
#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    theme: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Read the stored theme; missing, unknown or unreadable values mean light
    pub fn load(store: S) -> MotionResult<Self> {
        let stored = store.get(THEME_KEY).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "theme preference unreadable");
            None
        });
        let theme = match stored {
            Some(raw) => raw.parse().unwrap_or_else(|err: MotionError| {
                tracing::warn!(error = %err, "ignoring stored theme");
                Theme::Light
            }),
            None => Theme::Light,
        };
        Ok(Self { store, theme })
    }

    /// Current theme
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme and persist it
    pub fn toggle(&mut self) -> MotionResult<Theme> {
        self.set_theme(self.theme.toggled())
    }

    /// Set and persist a theme
    pub fn set_theme(&mut self, theme: Theme) -> MotionResult<Theme> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        tracing::debug!(%theme, "theme changed");
        Ok(theme)
    }

    /// Write the theme attribute on `root` and swap the toggle icon.
    ///
    /// The icon class is only replaced when the other icon is present.
    pub fn apply(&self, root: &SurfaceRef, icon: Option<&SurfaceRef>) {
        root.set_attribute(THEME_ATTRIBUTE, self.theme.as_str());
        if let Some(icon) = icon {
            let stale = self.theme.toggled().icon_class();
            if icon.has_class(stale) {
                icon.remove_class(stale);
                icon.add_class(self.theme.icon_class());
            }
        }
    }

    /// Underlying store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

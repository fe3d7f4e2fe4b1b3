use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const BUNDLE_SUFFIX: &str = ".app";

/// Raw process display name -> canonical bundle name, for names that changed.
pub type AliasMap = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningApp {
    pub name: String,
}

impl RunningApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledApp {
    pub name: String,
    pub bundle_path: PathBuf,
}

impl InstalledApp {
    pub fn new(name: &str, bundle_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            bundle_path: bundle_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEntity {
    pub name: String,
    pub is_running: bool,
    pub bundle_path: Option<PathBuf>,
}

impl ApplicationEntity {
    pub fn running(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_running: true,
            bundle_path: None,
        }
    }

    pub fn installed(app: &InstalledApp, is_running: bool) -> Self {
        Self {
            name: app.name.clone(),
            is_running,
            bundle_path: Some(app.bundle_path.clone()),
        }
    }

    /// Entity for a name known only from outside the merged list, e.g. a hotkey target.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_running: false,
            bundle_path: None,
        }
    }
}

/// Process listings encode spaces in display names as underscores.
pub fn normalize_display_name(raw: &str) -> String {
    raw.replace('_', " ")
}

/// `/Applications/Visual Studio Code.app` -> `Visual Studio Code`.
pub fn bundle_display_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(BUNDLE_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_string())
}

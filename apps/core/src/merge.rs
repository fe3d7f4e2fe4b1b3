use std::collections::{HashMap, HashSet};

use crate::model::{AliasMap, ApplicationEntity, InstalledApp, RunningApp};

/// Reconciles running processes with installed bundles into one list keyed by name.
///
/// Installed apps keep their scan order and canonical names and are marked
/// running when a process matches them directly or through `aliases`. Running
/// apps with no bundle are appended afterwards under their resolved name.
/// The result is unordered with respect to recency; see `ordering::default_order`.
pub fn merge_applications(
    running: &[RunningApp],
    installed: &[InstalledApp],
    aliases: &AliasMap,
) -> Vec<ApplicationEntity> {
    let running_names: HashSet<&str> = running.iter().map(|app| app.name.as_str()).collect();

    let mut canonical_to_raw: HashMap<&str, &str> = HashMap::new();
    for app in running {
        if let Some(canonical) = aliases.get(&app.name) {
            canonical_to_raw
                .entry(canonical.as_str())
                .or_insert(app.name.as_str());
        }
    }

    let mut merged = Vec::with_capacity(installed.len() + running.len());
    let mut emitted: HashSet<String> = HashSet::new();

    for app in installed {
        if emitted.contains(&app.name) {
            continue;
        }

        let is_running = running_names.contains(app.name.as_str())
            || canonical_to_raw.contains_key(app.name.as_str());
        merged.push(ApplicationEntity::installed(app, is_running));
        emitted.insert(app.name.clone());
    }

    for app in running {
        let resolved = aliases.get(&app.name).unwrap_or(&app.name);
        if emitted.contains(resolved) || emitted.contains(&app.name) {
            continue;
        }

        merged.push(ApplicationEntity::running(resolved));
        emitted.insert(resolved.clone());
    }

    merged
}

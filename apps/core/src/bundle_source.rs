use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::model::{bundle_display_name, InstalledApp};

pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_millis(50);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3 * 60);

/// Scan order encodes priority: the first directory holding a name wins.
pub fn default_application_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/Applications"),
        PathBuf::from("/Applications/Utilities"),
        PathBuf::from("/System/Applications"),
        PathBuf::from("/System/Applications/Utilities"),
        PathBuf::from("/System/Library/CoreServices/Applications"),
    ];
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join("Applications"));
    }
    dirs
}

pub trait BundleScanner: Send + Sync + 'static {
    fn scan(&self, directories: &[PathBuf]) -> Vec<InstalledApp>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsBundleScanner;

impl BundleScanner for FsBundleScanner {
    fn scan(&self, directories: &[PathBuf]) -> Vec<InstalledApp> {
        let mut installed = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for directory in directories {
            scan_directory(directory, &mut seen, &mut installed);
        }

        installed
    }
}

fn scan_directory(directory: &Path, seen: &mut HashSet<String>, out: &mut Vec<InstalledApp>) {
    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(directory = %directory.display(), %error, "skipping unreadable entry");
                continue;
            }
        };

        let Some(name) = bundle_display_name(entry.path()) else {
            continue;
        };
        if seen.contains(&name) || !entry.file_type().is_dir() {
            continue;
        }

        seen.insert(name.clone());
        out.push(InstalledApp {
            name,
            bundle_path: entry.into_path(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub apps: Vec<InstalledApp>,
    pub taken_at: Instant,
    pub ttl: Duration,
}

impl CacheSnapshot {
    pub fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.taken_at) < self.ttl
    }
}

/// Last successful scan, shared between sessions of one process.
#[derive(Debug)]
pub struct InstalledAppsCache {
    ttl: Duration,
    slot: Mutex<Option<CacheSnapshot>>,
}

impl InstalledAppsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> Option<CacheSnapshot> {
        let Ok(slot) = self.slot.lock() else {
            return None;
        };
        slot.clone()
    }

    pub fn valid_apps(&self, now: Instant) -> Option<Vec<InstalledApp>> {
        self.snapshot()
            .filter(|snapshot| snapshot.is_valid(now))
            .map(|snapshot| snapshot.apps)
    }

    /// Cached apps regardless of age, or empty when nothing was ever stored.
    pub fn fallback_apps(&self) -> Vec<InstalledApp> {
        self.snapshot()
            .map(|snapshot| snapshot.apps)
            .unwrap_or_default()
    }

    /// Stores a scan result unless a scan started later already wrote one.
    pub fn store(&self, apps: Vec<InstalledApp>, started_at: Instant) -> bool {
        let Ok(mut slot) = self.slot.lock() else {
            return false;
        };
        if slot
            .as_ref()
            .is_some_and(|current| current.taken_at > started_at)
        {
            return false;
        }

        *slot = Some(CacheSnapshot {
            apps,
            taken_at: started_at,
            ttl: self.ttl,
        });
        true
    }
}

impl Default for InstalledAppsCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

pub struct BundleSource<S: BundleScanner = FsBundleScanner> {
    scanner: Arc<S>,
    directories: Arc<Vec<PathBuf>>,
    cache: Arc<InstalledAppsCache>,
    timeout: Duration,
}

impl BundleSource<FsBundleScanner> {
    pub fn from_config(config: &Config, cache: Arc<InstalledAppsCache>) -> Self {
        Self::new(
            FsBundleScanner,
            config.application_dirs.clone(),
            cache,
            Duration::from_millis(config.bundle_scan_timeout_ms),
        )
    }
}

impl<S: BundleScanner> BundleSource<S> {
    pub fn new(
        scanner: S,
        directories: Vec<PathBuf>,
        cache: Arc<InstalledAppsCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            scanner: Arc::new(scanner),
            directories: Arc::new(directories),
            cache,
            timeout,
        }
    }

    pub fn cache(&self) -> &Arc<InstalledAppsCache> {
        &self.cache
    }

    /// Installed bundles from cache, a fresh scan, or the stale cache when the scan is late.
    pub async fn list_installed_applications(&self) -> Vec<InstalledApp> {
        let started_at = Instant::now();
        if let Some(apps) = self.cache.valid_apps(started_at) {
            debug!(count = apps.len(), "installed apps served from cache");
            return apps;
        }

        let scanner = Arc::clone(&self.scanner);
        let directories = Arc::clone(&self.directories);
        let scan = tokio::task::spawn_blocking(move || scanner.scan(&directories));

        match tokio::time::timeout(self.timeout, scan).await {
            Ok(Ok(apps)) => {
                debug!(count = apps.len(), "installed apps scanned");
                self.cache.store(apps.clone(), started_at);
                apps
            }
            Ok(Err(error)) => {
                warn!(%error, "installed apps scan failed; using cached result");
                self.cache.fallback_apps()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "installed apps scan timed out; using cached result"
                );
                self.cache.fallback_apps()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheSnapshot, InstalledAppsCache};
    use crate::model::InstalledApp;
    use std::time::{Duration, Instant};

    #[test]
    fn snapshot_validity_is_a_pure_age_check() {
        let taken_at = Instant::now();
        let snapshot = CacheSnapshot {
            apps: Vec::new(),
            taken_at,
            ttl: Duration::from_secs(180),
        };

        assert!(snapshot.is_valid(taken_at));
        assert!(snapshot.is_valid(taken_at + Duration::from_secs(179)));
        assert!(!snapshot.is_valid(taken_at + Duration::from_secs(180)));
        assert!(!snapshot.is_valid(taken_at + Duration::from_secs(600)));
    }

    #[test]
    fn older_scan_does_not_overwrite_newer_cache_entry() {
        let cache = InstalledAppsCache::new(Duration::from_secs(180));
        let early = Instant::now();
        let late = early + Duration::from_millis(5);

        assert!(cache.store(vec![InstalledApp::new("Fresh", "/Applications/Fresh.app")], late));
        assert!(!cache.store(vec![InstalledApp::new("Stale", "/Applications/Stale.app")], early));

        let apps = cache.fallback_apps();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Fresh");
    }

    #[test]
    fn empty_cache_falls_back_to_nothing() {
        let cache = InstalledAppsCache::default();
        assert!(cache.fallback_apps().is_empty());
        assert!(cache.valid_apps(Instant::now()).is_none());
    }
}

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::activation::{self, LaunchError};
use crate::bundle_source::{BundleScanner, BundleSource, FsBundleScanner, InstalledAppsCache};
use crate::config::{validate, Config};
use crate::hotkeys::{normalize_hotkey, HotkeyError, HotkeyTable};
use crate::merge::merge_applications;
use crate::model::ApplicationEntity;
use crate::name_resolver::resolve_aliases;
use crate::ordering::default_order;
use crate::process_source::list_running_applications;
use crate::query::QueryInput;
use crate::recency::RecencyList;
use crate::search::rank;
use crate::shell::CommandRunner;
use crate::storage::{self, KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("No applications found")]
    NoApplications,
    #[error("Could not switch to {app}: {source}")]
    Launch { app: String, source: LaunchError },
    #[error("{source}")]
    Hotkey { op: HotkeyOp, source: HotkeyError },
    #[error("failed to save hotkeys: {source}")]
    HotkeyPersist { op: HotkeyOp, source: StoreError },
}

/// The hotkey edit a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyOp {
    Assign,
    Remove,
}

impl HotkeyOp {
    fn failure_title(self) -> &'static str {
        match self {
            Self::Assign => "Failed to assign hotkey",
            Self::Remove => "Failed to remove hotkey",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Success,
    Failure,
}

/// A dismissible message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub style: NoticeStyle,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: &str, message: String) -> Self {
        Self {
            style: NoticeStyle::Success,
            title: title.to_string(),
            message,
        }
    }

    pub fn failure(title: &str, message: String) -> Self {
        Self {
            style: NoticeStyle::Failure,
            title: title.to_string(),
            message,
        }
    }

    pub fn from_error(error: &ServiceError) -> Self {
        match error {
            ServiceError::Launch { app, .. } => {
                Self::failure("Failed to switch app", format!("Could not switch to {app}"))
            }
            ServiceError::Hotkey {
                source: HotkeyError::Conflict { .. },
                ..
            } => Self::failure("Hotkey Conflict", error.to_string()),
            ServiceError::Hotkey { op, .. } | ServiceError::HotkeyPersist { op, .. } => {
                Self::failure(op.failure_title(), error.to_string())
            }
            _ => Self::failure("Error", error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The text matched a hotkey and that app was activated.
    Activated(String),
    Filtered(Vec<ApplicationEntity>),
}

pub struct CoreService<R: CommandRunner, S: KeyValueStore, B: BundleScanner = FsBundleScanner> {
    config: Config,
    runner: R,
    store: S,
    bundles: BundleSource<B>,
    hotkeys: HotkeyTable,
    hotkeys_loaded: bool,
    recency: RecencyList,
    apps: Vec<ApplicationEntity>,
    is_loading: bool,
    search_text: String,
}

impl<R: CommandRunner, S: KeyValueStore> CoreService<R, S> {
    pub fn new(
        config: Config,
        runner: R,
        store: S,
        cache: Arc<InstalledAppsCache>,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let bundles = BundleSource::from_config(&config, cache);
        Ok(Self::assemble(config, runner, store, bundles))
    }
}

impl<R: CommandRunner, S: KeyValueStore, B: BundleScanner> CoreService<R, S, B> {
    pub fn with_scanner(
        config: Config,
        runner: R,
        store: S,
        scanner: B,
        cache: Arc<InstalledAppsCache>,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        let bundles = BundleSource::new(
            scanner,
            config.application_dirs.clone(),
            cache,
            Duration::from_millis(config.bundle_scan_timeout_ms),
        );
        Ok(Self::assemble(config, runner, store, bundles))
    }

    fn assemble(config: Config, runner: R, store: S, bundles: BundleSource<B>) -> Self {
        let recency = RecencyList::with_capacity(config.recency_capacity);
        Self {
            config,
            runner,
            store,
            bundles,
            hotkeys: HotkeyTable::default(),
            hotkeys_loaded: false,
            recency,
            apps: Vec::new(),
            is_loading: true,
            search_text: String::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hotkeys(&self) -> &HotkeyTable {
        &self.hotkeys
    }

    pub fn recency(&self) -> &RecencyList {
        &self.recency
    }

    pub fn apps(&self) -> &[ApplicationEntity] {
        &self.apps
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Reads hotkeys and recency; unreadable records fall back to empty.
    pub fn load_preferences(&mut self) {
        self.hotkeys = storage::load_hotkeys(&self.store);
        self.hotkeys_loaded = true;
        self.recency = storage::load_recency(&self.store, self.config.recency_capacity);
    }

    /// Rebuilds the merged, default-ordered application list.
    pub async fn refresh(&mut self) -> Result<&[ApplicationEntity], ServiceError> {
        self.is_loading = true;
        let (running, installed) = tokio::join!(
            list_running_applications(&self.runner),
            self.bundles.list_installed_applications()
        );
        let aliases = resolve_aliases(&self.runner, &running).await;

        let mut merged = merge_applications(&running, &installed, &aliases);
        default_order(&mut merged, &self.recency);
        info!(
            running = running.len(),
            installed = installed.len(),
            merged = merged.len(),
            "refreshed application list"
        );

        self.apps = merged;
        self.is_loading = false;
        if self.apps.is_empty() {
            return Err(ServiceError::NoApplications);
        }
        Ok(&self.apps)
    }

    /// The list as shown for the current search text.
    pub fn visible_apps(&self) -> Vec<ApplicationEntity> {
        let input = QueryInput::parse(&self.search_text);
        rank(
            &self.apps,
            input.search_text(),
            &self.recency,
            self.config.max_results as usize,
        )
    }

    /// Applies one edit of the search field.
    ///
    /// Unprefixed text that names a hotkey activates its app at once; any other
    /// text, prefixed or not, filters the list by name.
    pub async fn handle_input(&mut self, text: &str) -> Result<InputOutcome, ServiceError> {
        let input = QueryInput::parse(text);

        if self.hotkeys_loaded {
            let target = input
                .hotkey_candidate()
                .and_then(|typed| self.hotkeys.lookup(typed))
                .map(str::to_string);
            if let Some(app_name) = target {
                self.activate_by_name(&app_name).await?;
                return Ok(InputOutcome::Activated(app_name));
            }
        }

        self.search_text = text.to_string();
        Ok(InputOutcome::Filtered(self.visible_apps()))
    }

    /// Records the activation in recency, then opens the app.
    ///
    /// Recency tracks intent: it is updated even when the launch fails.
    pub async fn activate(&mut self, entity: &ApplicationEntity) -> Result<(), ServiceError> {
        self.recency.touch(&entity.name);
        storage::save_recency(&self.store, &self.recency);

        match activation::activate(&self.runner, entity).await {
            Ok(_) => Ok(()),
            Err(source) => {
                warn!(app = %entity.name, error = %source, "activation failed");
                Err(ServiceError::Launch {
                    app: entity.name.clone(),
                    source,
                })
            }
        }
    }

    /// Activates a listed app, or opens an unlisted name directly.
    pub async fn activate_by_name(&mut self, name: &str) -> Result<(), ServiceError> {
        let entity = self
            .apps
            .iter()
            .find(|app| app.name == name)
            .cloned()
            .unwrap_or_else(|| ApplicationEntity::named(name));
        self.activate(&entity).await
    }

    /// Binds `hotkey` to `app_name`; the table only changes once the write succeeds.
    pub fn assign_hotkey(&mut self, app_name: &str, hotkey: &str) -> Result<Notice, ServiceError> {
        let op = HotkeyOp::Assign;
        let assigned =
            normalize_hotkey(hotkey).map_err(|source| ServiceError::Hotkey { op, source })?;
        let updated = self
            .hotkeys
            .with_assignment(&assigned, app_name)
            .map_err(|source| ServiceError::Hotkey { op, source })?;
        storage::save_hotkeys(&self.store, &updated)
            .map_err(|source| ServiceError::HotkeyPersist { op, source })?;

        self.hotkeys = updated;
        info!(app = %app_name, hotkey = %assigned, "hotkey assigned");
        Ok(Notice::success(
            "Hotkey Assigned",
            format!("\"{assigned}\" assigned to {app_name}"),
        ))
    }

    pub fn remove_hotkey(&mut self, hotkey: &str) -> Result<Notice, ServiceError> {
        let op = HotkeyOp::Remove;
        let hotkey =
            normalize_hotkey(hotkey).map_err(|source| ServiceError::Hotkey { op, source })?;
        let (updated, app_name) = self
            .hotkeys
            .without(&hotkey)
            .map_err(|source| ServiceError::Hotkey { op, source })?;
        storage::save_hotkeys(&self.store, &updated)
            .map_err(|source| ServiceError::HotkeyPersist { op, source })?;

        self.hotkeys = updated;
        info!(app = %app_name, hotkey = %hotkey, "hotkey removed");
        Ok(Notice::success(
            "Hotkey Removed",
            format!("\"{hotkey}\" removed from {app_name}"),
        ))
    }

    pub fn hotkey_for(&self, app_name: &str) -> Option<&str> {
        self.hotkeys.hotkey_for(app_name)
    }

    /// `[hotkey] Running`, either part omitted when it does not apply.
    pub fn subtitle_for(&self, entity: &ApplicationEntity) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(hotkey) = self.hotkey_for(&entity.name) {
            parts.push(format!("[{hotkey}]"));
        }
        if entity.is_running {
            parts.push("Running".to_string());
        }
        parts.join(" ")
    }
}

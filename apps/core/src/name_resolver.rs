use std::path::Path;

use tracing::{debug, warn};

use crate::model::{bundle_display_name, normalize_display_name, AliasMap, RunningApp};
use crate::shell::CommandRunner;

pub const PROCESS_LISTING_PROGRAM: &str = "lsappinfo";
pub const PROCESS_LISTING_ARGS: [&str; 1] = ["list"];

const BUNDLE_PATH_KEY: &str = "bundle path=\"";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedProcess {
    pub display_name: String,
    pub bundle_path: Option<String>,
}

/// Resolves one display name to its canonical bundle name, or returns it unchanged.
pub async fn resolve_canonical_name<R: CommandRunner>(runner: &R, display_name: &str) -> String {
    match fetch_listing(runner).await {
        Some(listing) => canonical_name(&listing, display_name),
        None => display_name.to_string(),
    }
}

/// Resolves every running name against a single listing snapshot.
///
/// Only names whose canonical form differs are recorded. Each lookup falls
/// back to identity on its own; a failed listing query leaves the map empty.
pub async fn resolve_aliases<R: CommandRunner>(runner: &R, running: &[RunningApp]) -> AliasMap {
    let mut aliases = AliasMap::new();
    if running.is_empty() {
        return aliases;
    }

    let Some(listing) = fetch_listing(runner).await else {
        return aliases;
    };

    for app in running {
        let canonical = canonical_name(&listing, &app.name);
        if canonical != app.name {
            debug!(raw = %app.name, canonical = %canonical, "resolved canonical name");
            aliases.insert(app.name.clone(), canonical);
        }
    }
    aliases
}

/// First listing entry with an exactly matching name and a bundle path wins.
pub fn canonical_name(listing: &[ListedProcess], display_name: &str) -> String {
    let matched = listing.iter().find_map(|process| {
        if process.display_name != display_name {
            return None;
        }
        process.bundle_path.as_deref()
    });

    matched
        .and_then(|path| bundle_display_name(Path::new(path)))
        .unwrap_or_else(|| display_name.to_string())
}

/// Parses numbered `lsappinfo list` blocks:
///
/// ```text
///  8) "Google_Chrome" ASN:0x0-0x1c01c:
///     bundle path="/Applications/Google Chrome.app"
/// ```
pub fn parse_process_listing(output: &str) -> Vec<ListedProcess> {
    let mut processes: Vec<ListedProcess> = Vec::new();

    for line in output.lines() {
        if let Some(raw_name) = block_header_name(line) {
            processes.push(ListedProcess {
                display_name: normalize_display_name(raw_name),
                bundle_path: None,
            });
            continue;
        }

        let Some(current) = processes.last_mut() else {
            continue;
        };
        if current.bundle_path.is_some() {
            continue;
        }
        if let Some(path) = bundle_path_value(line) {
            current.bundle_path = Some(path.to_string());
        }
    }

    processes
}

fn block_header_name(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    let after_index = trimmed[digits..].strip_prefix(')')?;
    let quoted = after_index.trim_start();
    if quoted.len() == after_index.len() {
        return None;
    }

    let (name, _) = quoted.strip_prefix('"')?.split_once('"')?;
    Some(name)
}

fn bundle_path_value(line: &str) -> Option<&str> {
    let start = line.find(BUNDLE_PATH_KEY)? + BUNDLE_PATH_KEY.len();
    let (value, _) = line[start..].split_once('"')?;
    if value.is_empty() {
        return None;
    }
    Some(value)
}

async fn fetch_listing<R: CommandRunner>(runner: &R) -> Option<Vec<ListedProcess>> {
    match runner
        .run(PROCESS_LISTING_PROGRAM, &PROCESS_LISTING_ARGS)
        .await
    {
        Ok(stdout) => Some(parse_process_listing(&stdout)),
        Err(error) => {
            warn!(%error, "failed to query process listing; names stay unresolved");
            None
        }
    }
}

use tracing::{debug, warn};

use crate::model::{normalize_display_name, RunningApp};
use crate::shell::CommandRunner;

pub const VISIBLE_PROCESS_PROGRAM: &str = "lsappinfo";
pub const VISIBLE_PROCESS_ARGS: [&str; 1] = ["visibleProcessList"];

const RECORD_MARKER: &str = "ASN:";

/// Lists visible running applications. Best effort: failures yield an empty list.
pub async fn list_running_applications<R: CommandRunner>(runner: &R) -> Vec<RunningApp> {
    match runner
        .run(VISIBLE_PROCESS_PROGRAM, &VISIBLE_PROCESS_ARGS)
        .await
    {
        Ok(stdout) => {
            let apps = parse_visible_process_list(&stdout);
            debug!(count = apps.len(), "listed running applications");
            apps
        }
        Err(error) => {
            warn!(%error, "failed to list running applications");
            Vec::new()
        }
    }
}

/// Parses `ASN:0x0-0x1c01c-"Google_Chrome": ASN:0x0-0x2002-"Finder":` style output.
pub fn parse_visible_process_list(output: &str) -> Vec<RunningApp> {
    let mut apps = Vec::new();
    let mut rest = output;

    while let Some(start) = rest.find(RECORD_MARKER) {
        rest = &rest[start + RECORD_MARKER.len()..];
        if let Some((name, consumed)) = parse_record(rest) {
            apps.push(RunningApp {
                name: normalize_display_name(name),
            });
            rest = &rest[consumed..];
        }
    }

    apps
}

/// Returns the quoted name and the byte length of the record through its closing quote.
fn parse_record(record: &str) -> Option<(&str, usize)> {
    let (high, tail) = record.split_once('-')?;
    let (low, tail) = tail.split_once('-')?;
    if !is_identifier(high) || !is_identifier(low) {
        return None;
    }

    let quoted = tail.strip_prefix('"')?;
    let (name, _) = quoted.split_once('"')?;
    if name.is_empty() {
        return None;
    }

    let consumed = record.len() - quoted.len() + name.len() + 1;
    Some((name, consumed))
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty() && !token.contains(|c: char| c.is_whitespace() || c == '"')
}

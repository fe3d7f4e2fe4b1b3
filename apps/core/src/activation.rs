use tracing::info;

use crate::model::ApplicationEntity;
use crate::name_resolver::resolve_canonical_name;
use crate::shell::{CommandRunner, ShellError};

pub const OPEN_PROGRAM: &str = "open";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("empty launch target")]
    EmptyTarget,
    #[error("could not open {target}: {source}")]
    Command { target: String, source: ShellError },
}

/// What `open -a` receives: an application name or a bundle path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    Name(String),
    Path(String),
}

impl LaunchTarget {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(value) | Self::Path(value) => value,
        }
    }
}

/// Target for an entity that is not running, or whose name is already canonical.
pub fn launch_target(entity: &ApplicationEntity) -> LaunchTarget {
    match &entity.bundle_path {
        Some(path) if !entity.is_running => LaunchTarget::Path(path.to_string_lossy().into_owned()),
        _ => LaunchTarget::Name(entity.name.clone()),
    }
}

pub fn launch_command(target: &LaunchTarget) -> (&'static str, [&str; 2]) {
    (OPEN_PROGRAM, ["-a", target.as_str()])
}

/// Foregrounds a running app by canonical name, or opens an installed one by path.
pub async fn activate<R: CommandRunner>(
    runner: &R,
    entity: &ApplicationEntity,
) -> Result<LaunchTarget, LaunchError> {
    let target = if entity.is_running {
        LaunchTarget::Name(resolve_canonical_name(runner, &entity.name).await)
    } else {
        launch_target(entity)
    };

    if target.as_str().trim().is_empty() {
        return Err(LaunchError::EmptyTarget);
    }

    let (program, args) = launch_command(&target);
    runner
        .run(program, &args)
        .await
        .map_err(|source| LaunchError::Command {
            target: target.as_str().to_string(),
            source,
        })?;

    info!(app = %entity.name, target = %target.as_str(), "activated application");
    Ok(target)
}

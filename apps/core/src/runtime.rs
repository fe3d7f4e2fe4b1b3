use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::bundle_source::InstalledAppsCache;
use crate::config::{self, ConfigError};
use crate::core_service::{CoreService, InputOutcome, Notice, ServiceError};
use crate::model::ApplicationEntity;
use crate::shell::SystemCommandRunner;
use crate::storage::{SqliteStore, StoreError};
use crate::transport::handle_json;

const USAGE: &str = "usage: appswitch [--config <path>] <list | search <text> | input <text> | activate <name> | assign <hotkey> <name> | unassign <hotkey> | hotkeys | serve>";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Search(String),
    Input(String),
    Activate(String),
    Assign { hotkey: String, name: String },
    Unassign(String),
    Hotkeys,
    Serve,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut config_path = None;
    let mut rest: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("--config requires a path\n{USAGE}"))?;
                config_path = Some(PathBuf::from(value));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => rest.push(arg.as_str()),
        }
    }

    let Some((&name, operands)) = rest.split_first() else {
        return Ok(CliOptions {
            config_path,
            command: Command::List,
        });
    };

    let joined = operands.join(" ");
    let command = match (name, operands.len()) {
        ("list", 0) => Command::List,
        ("hotkeys", 0) => Command::Hotkeys,
        ("serve", 0) => Command::Serve,
        ("search", n) if n > 0 => Command::Search(joined),
        // Search-field text is taken verbatim so a leading space survives.
        ("input", 1) => Command::Input(operands[0].to_string()),
        ("activate", n) if n > 0 => Command::Activate(joined),
        ("assign", n) if n > 1 => Command::Assign {
            hotkey: operands[0].to_string(),
            name: operands[1..].join(" "),
        },
        ("unassign", 1) => Command::Unassign(operands[0].to_string()),
        _ => return Err(format!("unrecognized arguments: {}\n{USAGE}", rest.join(" "))),
    };

    Ok(CliOptions {
        config_path,
        command,
    })
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    if let Err(error) = crate::logging::init() {
        eprintln!("[appswitch] logging disabled: {error}");
    }
    info!(
        config_path = %config.config_path.display(),
        store_path = %config.store_path.display(),
        "startup"
    );

    let store = SqliteStore::open_file(&config.store_path)?;
    let cache = Arc::new(InstalledAppsCache::new(Duration::from_secs(
        config.installed_cache_ttl_secs,
    )));
    let mut service = CoreService::new(config, SystemCommandRunner, store, cache)?;
    service.load_preferences();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(&mut service, options.command))
}

async fn execute(
    service: &mut CoreService<SystemCommandRunner, SqliteStore>,
    command: Command,
) -> Result<(), RuntimeError> {
    match command {
        Command::Hotkeys => {
            for (hotkey, name) in service.hotkeys().assignments() {
                println!("{hotkey}\t{name}");
            }
            Ok(())
        }
        Command::Assign { hotkey, name } => {
            let result = service.assign_hotkey(&name, &hotkey);
            report(result)
        }
        Command::Unassign(hotkey) => {
            let result = service.remove_hotkey(&hotkey);
            report(result)
        }
        Command::Activate(name) => {
            service.refresh().await?;
            activate(service, &name).await
        }
        Command::List => {
            service.refresh().await?;
            print_rows(service, &service.visible_apps());
            Ok(())
        }
        Command::Search(text) => {
            service.refresh().await?;
            let outcome = service.handle_input(&format!(" {text}")).await?;
            if let InputOutcome::Filtered(apps) = outcome {
                print_rows(service, &apps);
            }
            Ok(())
        }
        Command::Input(text) => {
            service.refresh().await?;
            match service.handle_input(&text).await {
                Ok(InputOutcome::Activated(name)) => {
                    println!("activated {name}");
                    Ok(())
                }
                Ok(InputOutcome::Filtered(apps)) => {
                    print_rows(service, &apps);
                    Ok(())
                }
                Err(error) => fail(error),
            }
        }
        Command::Serve => serve(service).await,
    }
}

async fn activate(
    service: &mut CoreService<SystemCommandRunner, SqliteStore>,
    name: &str,
) -> Result<(), RuntimeError> {
    match service.activate_by_name(name).await {
        Ok(()) => Ok(()),
        Err(error) => fail(error),
    }
}

/// Answers one JSON request per stdin line until EOF.
async fn serve(
    service: &mut CoreService<SystemCommandRunner, SqliteStore>,
) -> Result<(), RuntimeError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_json(service, &line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

fn print_rows(service: &CoreService<SystemCommandRunner, SqliteStore>, apps: &[ApplicationEntity]) {
    for app in apps {
        let subtitle = service.subtitle_for(app);
        if subtitle.is_empty() {
            println!("{}", app.name);
        } else {
            println!("{}\t{subtitle}", app.name);
        }
    }
}

fn report(result: Result<Notice, ServiceError>) -> Result<(), RuntimeError> {
    match result {
        Ok(notice) => {
            println!("{}: {}", notice.title, notice.message);
            Ok(())
        }
        Err(error) => fail(error),
    }
}

fn fail(error: ServiceError) -> Result<(), RuntimeError> {
    let notice = Notice::from_error(&error);
    eprintln!("{}: {}", notice.title, notice.message);
    Err(RuntimeError::Service(error))
}

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },
    #[error("{program} exited with {code:?}: {stderr}")]
    Status {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Runs an external command and yields its stdout.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ShellError>> + Send;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ShellError> {
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|error| ShellError::Spawn {
                program: program.to_string(),
                message: error.to_string(),
            })?;

        if !output.status.success() {
            return Err(ShellError::Status {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Answers commands from a fixed script and records every invocation.
#[derive(Debug, Default)]
pub struct ScriptedCommandRunner {
    responses: HashMap<String, Result<String, ShellError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedCommandRunner {
    pub fn with_output(mut self, command: &str, stdout: &str) -> Self {
        self.responses
            .insert(command.to_string(), Ok(stdout.to_string()));
        self
    }

    pub fn with_failure(mut self, command: &str, stderr: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            Err(ShellError::Status {
                program: command.to_string(),
                code: Some(1),
                stderr: stderr.to_string(),
            }),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CommandRunner for ScriptedCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ShellError> {
        let line = command_line(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }
        match self.responses.get(&line) {
            Some(response) => response.clone(),
            None => Err(ShellError::Spawn {
                program: program.to_string(),
                message: format!("no scripted response for `{line}`"),
            }),
        }
    }
}

/// Joins a command line for log lines and scripted runners.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

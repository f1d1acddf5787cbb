//! External tool invocation (`sha512sum`, `tar`, `mv`).

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A program, its arguments and an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for a in &self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

/// A tool ran but exited unsuccessfully. `output` holds what it printed.
#[derive(Debug, thiserror::Error)]
#[error("run [{command}]: {status}: {output}")]
pub struct ToolError {
    pub command: String,
    pub status: String,
    pub output: String,
}

/// Runs external commands, capturing stdout and stderr together.
pub trait CommandRunner {
    /// Run to completion and return the captured output.
    /// A non-zero exit is reported as a [`ToolError`].
    fn run(&self, cmd: &ToolCommand) -> Result<String>;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<String> {
        tracing::trace!(cmd = %cmd, "running command");
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(dir) = &cmd.current_dir {
            command.current_dir(dir);
        }
        let out = command
            .output()
            .with_context(|| format!("spawn [{}]", cmd))?;

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        if !out.status.success() {
            return Err(ToolError {
                command: cmd.to_string(),
                status: out.status.to_string(),
                output,
            }
            .into());
        }
        Ok(output)
    }
}

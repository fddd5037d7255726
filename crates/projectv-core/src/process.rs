//! External program invocation
//!
//! Every program projectV starts goes through a [`ProcessRunner`], so the
//! session can be driven against a recording runner in tests.

use crate::error::LaunchError;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments, in order
    pub args: Vec<OsString>,
    /// Working directory, inherited when `None`
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create an invocation without arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run inside `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of a blocking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code; `None` when killed by a signal
    pub code: Option<i32>,
}

impl RunStatus {
    /// Exit code zero
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs and launches external programs
pub trait ProcessRunner {
    /// Run to completion, blocking the caller
    ///
    /// # Errors
    /// The program could not be started
    fn run(&mut self, spec: &CommandSpec) -> Result<RunStatus, LaunchError>;

    /// Start and return immediately; the exit status is never collected
    ///
    /// # Errors
    /// The program could not be started
    fn spawn_detached(&mut self, spec: &CommandSpec) -> Result<(), LaunchError>;
}

/// Runner backed by [`std::process::Command`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec) -> Result<RunStatus, LaunchError> {
        tracing::info!("Running: {}", spec);
        let status = spec
            .to_command()
            .stdin(Stdio::null())
            .status()
            .map_err(|e| LaunchError::spawn(&spec.program, e))?;
        Ok(status.into())
    }

    fn spawn_detached(&mut self, spec: &CommandSpec) -> Result<(), LaunchError> {
        tracing::info!("Launching: {}", spec);
        spec.to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LaunchError::spawn(&spec.program, e))?;
        Ok(())
    }
}

use crate::error::StudioError;
use crate::Result;
use anyhow::Context;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// An external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of inheriting the terminal
    pub capture: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How an external command ended
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured output; empty when the terminal was inherited
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "a signal".to_string(),
        }
    }

    /// Turn a non-zero exit into a fatal error
    pub fn into_result(self, invocation: &Invocation) -> std::result::Result<Self, StudioError> {
        if self.success() {
            Ok(self)
        } else {
            Err(StudioError::CommandFailed {
                command: invocation.to_string(),
                status: self.status_text(),
            })
        }
    }
}

/// Spawns external processes and waits for them
pub trait ProcessRunner {
    /// Runs to completion. Spawn failures are errors; a non-zero exit is not.
    fn run(&self, invocation: &Invocation) -> Result<RunOutcome>;
}

/// Runs commands on the host, blocking until they exit
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutcome> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }

        let not_found = || {
            format!(
                "Command '{}' not found. Please ensure it is installed and in your PATH.",
                invocation.program
            )
        };

        if invocation.capture {
            let output = cmd
                .stdin(Stdio::null())
                .output()
                .with_context(not_found)?;
            Ok(RunOutcome {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .with_context(not_found)?;
            Ok(RunOutcome {
                code: status.code(),
                ..Default::default()
            })
        }
    }
}

/// Records invocations and replays scripted outcomes
///
/// Once the script runs out every command succeeds with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    script: RefCell<VecDeque<RunOutcome>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: RunOutcome) -> Self {
        self.script.borrow_mut().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Command lines of all recorded invocations
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<RunOutcome> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(RunOutcome::ok))
    }
}

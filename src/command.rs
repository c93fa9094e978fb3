use duct::cmd;
use log::{debug, trace, warn};
use mockall::automock;
use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

const DEFAULT_GIT: &str = "git";

/// A single git invocation: the arguments and the directory to run them in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    args: Vec<String>,
    directory: PathBuf,
}

impl Task {
    /// Create a task from the git arguments (without the executable) and the working directory.
    pub fn new<I, S>(args: I, directory: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Task {
            args: args.into_iter().map(Into::into).collect(),
            directory: directory.into(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The git subcommand, e.g. `clone` or `pull`.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Custom error describing the error cases of running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started, e.g. the executable is missing
    /// or the directory does not exist.
    #[error("Failed to run \"{command}\" on {directory}: {source}")]
    CannotStart {
        command: String,
        directory: String,
        source: std::io::Error,
    },
    /// The command exited with a non-zero exit code (or was killed by a signal).
    #[error("Failed to run \"{command}\" on {directory}")]
    NonZeroExitcode {
        command: String,
        directory: String,
        code: Option<i32>,
    },
    /// The captured output contains non-UTF8 characters.
    #[error("Failed to read the output of \"{command}\" on {directory}")]
    NonUtf8Return { command: String, directory: String },
}

/// Runs the steps of a reconciliation.
///
/// Every call is synchronous: it returns when the process exited.
#[automock]
pub trait CommandRunner {
    /// Run the task and succeed if it exits with zero.
    fn run(&self, task: &Task) -> Result<(), CommandError>;
    /// Run the task and return its standard output.
    fn read(&self, task: &Task) -> Result<String, CommandError>;
}

/// Runs tasks with the git executable.
///
/// The executable can carry its own leading arguments, e.g. `git -c protocol.version=2`,
/// these are inserted before the arguments of every task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitRunner {
    program: String,
    prefix: Vec<String>,
}

impl Default for GitRunner {
    fn default() -> Self {
        GitRunner {
            program: String::from(DEFAULT_GIT),
            prefix: vec![],
        }
    }
}

impl GitRunner {
    /// Parse the git command the way a shell would split it.
    ///
    /// Returns `None` if the command is empty or has unbalanced quotes.
    pub fn parse(command: &str) -> Option<Self> {
        let split_args = shlex::split(command)?;
        let (program, prefix) = split_args.split_first()?;

        let runner = GitRunner {
            program: program.clone(),
            prefix: prefix.to_vec(),
        };
        trace!("Parsed {command:?} to {runner:?}.");

        Some(runner)
    }

    fn full_args(&self, task: &Task) -> Vec<String> {
        self.prefix.iter().chain(task.args()).cloned().collect()
    }

    fn command_line(&self, task: &Task) -> String {
        std::iter::once(&self.program)
            .chain(self.full_args(task).iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn start_error(&self, task: &Task, source: std::io::Error) -> CommandError {
        CommandError::CannotStart {
            command: self.command_line(task),
            directory: task.directory().display().to_string(),
            source,
        }
    }
}

impl CommandRunner for GitRunner {
    fn run(&self, task: &Task) -> Result<(), CommandError> {
        debug!(
            "Running \"{}\" in directory {}.",
            self.command_line(task),
            task.directory().display()
        );

        let output = cmd(&self.program, self.full_args(task))
            .dir(task.directory())
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|err| self.start_error(task, err))?;

        let output_str = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            output_str.lines().for_each(|line| {
                debug!("{line}");
            });
            Ok(())
        } else {
            output_str.lines().for_each(|line| {
                warn!("{line}");
            });
            Err(CommandError::NonZeroExitcode {
                command: self.command_line(task),
                directory: task.directory().display().to_string(),
                code: output.status.code(),
            })
        }
    }

    fn read(&self, task: &Task) -> Result<String, CommandError> {
        debug!(
            "Reading \"{}\" in directory {}.",
            self.command_line(task),
            task.directory().display()
        );

        let output = cmd(&self.program, self.full_args(task))
            .dir(task.directory())
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|err| self.start_error(task, err))?;

        if !output.status.success() {
            String::from_utf8_lossy(&output.stderr)
                .lines()
                .for_each(|line| {
                    warn!("{line}");
                });
            return Err(CommandError::NonZeroExitcode {
                command: self.command_line(task),
                directory: task.directory().display().to_string(),
                code: output.status.code(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| CommandError::NonUtf8Return {
            command: self.command_line(task),
            directory: task.directory().display().to_string(),
        })
    }
}

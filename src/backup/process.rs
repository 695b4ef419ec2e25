//! Synchronous execution of external programs.
//!
//! Commands are built from a program and an explicit argument vector; no
//! shell is involved, so database and table names reach the program
//! verbatim. Only stdout redirection to a file is supported.

use crate::backup::function_path;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use bon::Builder;
use function_name::named;
use getset::Getters;
use itertools::Itertools;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

#[derive(Clone, Debug, PartialEq, Eq, Builder, Getters)]
#[getset(get = "pub")]
pub struct ExternalCommand {
    #[builder(into)]
    program: PathBuf,
    #[builder(default, into)]
    args: Vec<String>,
    #[builder(into)]
    current_dir: Option<PathBuf>,
    /// Standard output goes here instead of being discarded.
    /// Relative paths are resolved against `current_dir`.
    #[builder(into)]
    stdout_file: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn resolved_stdout_file(&self) -> Option<Cow<'_, Path>> {
        let file = self.stdout_file.as_deref()?;
        match &self.current_dir {
            Some(dir) if file.is_relative() => Some(Cow::Owned(dir.join(file))),
            _ => Some(Cow::Borrowed(file)),
        }
    }
}

/// Single-quotes `word` when it is empty or holds whitespace or quotes, so
/// the rendered command line stays unambiguous.
fn quote(word: &str) -> Cow<'_, str> {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        return Cow::Borrowed(word);
    }
    Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
}

impl Display for ExternalCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        if !self.args.is_empty() {
            write!(f, " {}", self.args.iter().map(|arg| quote(arg)).join(" "))?;
        }
        if let Some(stdout_file) = &self.stdout_file {
            write!(f, " > {}", quote(&stdout_file.to_string_lossy()))?;
        }
        Ok(())
    }
}

pub trait CommandRunner {
    /// Runs `command` to completion. A non-zero exit is an
    /// [`Error::CommandFailed`].
    fn exec(&self, command: &ExternalCommand) -> Result<()>;
}

/// Runs commands with [`std::process::Command`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    #[named]
    fn exec(&self, command: &ExternalCommand) -> Result<()> {
        tracing::info!("{}", command);

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.current_dir {
            process.current_dir(dir);
        }
        match command.resolved_stdout_file() {
            Some(path) => {
                let file = File::create(&path)
                    .map_err(Error::from)
                    .with_msg(format!("Failed to create output file {:?}", path))?;
                process.stdout(Stdio::from(file));
            }
            None => {
                process.stdout(Stdio::null());
            }
        }

        let output = process
            .output()
            .map_err(Error::from)
            .with_msg(format!("Failed to start \"{}\"", command))
            .with_debug_object_and_fn_name(command.clone(), function_path!())?;

        if output.status.success() {
            return Ok(());
        }

        let exit_code = exit_code(&output.status);
        Err(Error::command_failed(
            command.to_string(),
            exit_code,
            exit_code_text(exit_code),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

#[cfg(unix)]
fn exit_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    // Shell convention for processes killed by a signal
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Best-effort description of a shell exit code.
pub fn exit_code_text(code: i32) -> &'static str {
    match code {
        0 => "OK",
        1 => "General error",
        2 => "Misuse of shell builtins",
        126 => "Invoked command cannot execute",
        127 => "Command not found",
        128 => "Invalid exit argument",
        129 => "Hangup",
        130 => "Interrupt",
        131 => "Quit and dump core",
        132 => "Illegal instruction",
        133 => "Trace/breakpoint trap",
        134 => "Process aborted",
        135 => "Bus error: \"access to undefined portion of memory object\"",
        136 => "Floating point exception: \"erroneous arithmetic operation\"",
        137 => "Kill (terminate immediately)",
        138 => "User-defined 1",
        139 => "Segmentation violation",
        140 => "User-defined 2",
        141 => "Write to pipe with no one reading",
        142 => "Signal raised by alarm",
        143 => "Termination (request to terminate)",
        152 => "CPU time limit exceeded",
        153 => "File size limit exceeded",
        255 => "Exit status out of range",
        _ => "Unknown error",
    }
}

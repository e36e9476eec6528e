//! External command execution utilities.
//!
//! Diagram toolchain steps and doctor probes go through [`Cmd`], so each
//! invocation yields the exit status plus captured stdout/stderr.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let output = Cmd::from_slice(&["perl", "/usr/bin/pdfcrop"]).arg("fig.pdf").cwd(dir).output()?;
//! if !output.status.success() {
//!     bail!(format_error("pdfcrop", &output, &EMPTY_FILTER));
//! }
//! ```

use crate::debug;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    sync::OnceLock,
};

/// Lines of stdout kept in a failure message (LaTeX is chatty).
const STDOUT_TAIL_LINES: usize = 20;

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default, Debug, Clone)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    filter: Option<&'static FilterRule>,
}

impl Cmd {
    /// Create from a command array (e.g., `["pdfcrop"]` or `["perl", "/usr/bin/pdfcrop"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set output filter for logging.
    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Filter applied to this command's output.
    pub fn output_filter(&self) -> &'static FilterRule {
        self.filter.unwrap_or(&EMPTY_FILTER)
    }

    /// Program name for log prefixes and error messages.
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map_or_else(
                || self.program.to_string_lossy().to_string(),
                |n| n.to_string_lossy().to_string(),
            )
    }

    /// Human-readable command line, for debug output.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Execute and capture output, whatever the exit status.
    ///
    /// Only fails when the process cannot be spawned.
    pub fn output(&self) -> Result<Output> {
        let name = self.program_name();
        debug!("exec"; "{}", self.display());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        cmd.output()
            .with_context(|| format!("Failed to execute `{name}`"))
    }
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Filter rule for command output logging.
///
/// Used to reduce noise by skipping known warnings or irrelevant messages.
#[derive(Debug)]
pub struct FilterRule {
    /// Prefixes to skip when logging output.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    /// Create a new filter rule.
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    /// Check if a line should be skipped.
    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Lines that pass the filter, ANSI codes removed.
    fn keep(&self, output: &str) -> Vec<String> {
        output
            .lines()
            .map(|line| strip_ansi(line).trim().to_string())
            .filter(|line| !self.should_skip(line))
            .collect()
    }

    /// Log output lines that pass the filter (verbose only).
    pub fn log(&self, name: &str, output: &str) {
        let lines = self.keep(output);
        if !lines.is_empty() {
            debug!(name; "{}", lines.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

// ============================================================================
// Helpers
// ============================================================================

/// Strip ANSI escape codes from string.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

/// Format error message for failed command.
pub fn format_error(name: &str, output: &Output, filter: &FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}", output.status);

    let stderr_lines = filter.keep(&stderr);
    if !stderr_lines.is_empty() {
        msg.push('\n');
        msg.push_str(&stderr_lines.join("\n"));
    }

    let stdout_lines: Vec<_> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    if !stdout_lines.is_empty() {
        let skip = stdout_lines.len().saturating_sub(STDOUT_TAIL_LINES);
        msg.push_str("\nStdout:\n");
        msg.push_str(&stdout_lines[skip..].join("\n"));
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================

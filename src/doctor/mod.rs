//! Environment checks for the tutorial.
//!
//! Each [`Requirement`] is probed once:
//!
//! - with a `probe` command, the first stdout line is the installed version
//! - without one, `program` only has to be on `PATH`
//!
//! The result is turned into [`Finding`]s. Only a required item that is
//! missing or older than its minimum fails the run; everything else is advice.

mod version;

pub use version::parse_lenient;

use std::path::PathBuf;

use crate::{config::Requirement, debug, utils::exec::Cmd};

/// What the probe saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Installed {
    /// Probe printed a version.
    Version(String),
    /// Program is on `PATH`; no version asked for.
    Present(PathBuf),
    /// Probe failed or program not found.
    Absent(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Advice,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Run the requirement's probe.
pub fn probe(req: &Requirement) -> Installed {
    if let Some(argv) = req.probe.as_ref().filter(|p| !p.is_empty()) {
        return probe_version(argv);
    }
    match req.program.as_deref() {
        Some(program) => match which::which(program) {
            Ok(path) => Installed::Present(path),
            Err(e) => Installed::Absent(format!("{program}: {e}")),
        },
        None => Installed::Absent("nothing to probe".into()),
    }
}

fn probe_version(argv: &[String]) -> Installed {
    let cmd = Cmd::from_slice(argv);
    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => return Installed::Absent(format!("{e:#}")),
    };
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let last = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("");
        return Installed::Absent(format!("`{}` {}: {}", cmd.program_name(), output.status, last.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next().map(str::trim).filter(|l| !l.is_empty()) {
        Some(line) => Installed::Version(line.to_string()),
        None => Installed::Absent(format!("`{}` printed no version", cmd.program_name())),
    }
}

/// Decide what to report for one requirement.
pub fn evaluate(req: &Requirement, installed: &Installed) -> Vec<Finding> {
    let name = &req.name;
    let version = match installed {
        Installed::Absent(reason) => {
            debug!("doctor"; "{}: {}", name, reason);
            let severity = if req.required {
                Severity::Failure
            } else {
                Severity::Advice
            };
            let message = req
                .missing
                .clone()
                .unwrap_or_else(|| format!("{name} was not found"));
            return vec![Finding::new(severity, message)];
        }
        Installed::Present(path) => {
            return vec![Finding::new(Severity::Ok, format!("{name} found at {}", path.display()))];
        }
        Installed::Version(v) => v,
    };

    let mut findings = Vec::new();
    let parsed = parse_lenient(version);

    if let Some(minimum) = &req.minimum {
        match compare(parsed.as_ref(), minimum) {
            Some(std::cmp::Ordering::Less) => {
                let severity = if req.required {
                    Severity::Failure
                } else {
                    Severity::Advice
                };
                findings.push(Finding::new(
                    severity,
                    format!("{name} version {minimum} or newer is required. You have {version}"),
                ));
            }
            Some(_) => {}
            None => findings.push(unparseable(name, version, minimum)),
        }
    }

    if let Some(recommended) = &req.recommended {
        match compare(parsed.as_ref(), recommended) {
            Some(std::cmp::Ordering::Equal) => {}
            Some(_) => findings.push(Finding::new(
                Severity::Advice,
                format!("The stable {name} version {recommended} is recommended. You have {version}"),
            )),
            None => findings.push(unparseable(name, version, recommended)),
        }
    }

    if let Some(suggested) = &req.suggested_minimum {
        match compare(parsed.as_ref(), suggested) {
            Some(std::cmp::Ordering::Less) => findings.push(Finding::new(
                Severity::Advice,
                format!("The latest version of {name} is recommended. You have {version}"),
            )),
            Some(_) => {}
            None => findings.push(unparseable(name, version, suggested)),
        }
    }

    if findings.is_empty() {
        findings.push(Finding::new(Severity::Ok, format!("{name} {version}")));
    }
    findings
}

/// `installed` compared to `wanted`, or `None` if either does not parse.
fn compare(installed: Option<&semver::Version>, wanted: &str) -> Option<std::cmp::Ordering> {
    let wanted = parse_lenient(wanted)?;
    installed.map(|v| v.cmp(&wanted))
}

fn unparseable(name: &str, version: &str, wanted: &str) -> Finding {
    Finding::new(
        Severity::Advice,
        format!("Cannot compare {name} version `{version}` with {wanted}"),
    )
}

/// Findings for every requirement, in order.
pub fn check_all(requirements: &[Requirement]) -> Vec<(String, Vec<Finding>)> {
    requirements
        .iter()
        .map(|req| {
            let installed = probe(req);
            debug!("doctor"; "{}: {:?}", req.name, installed);
            (req.name.clone(), evaluate(req, &installed))
        })
        .collect()
}

//! `[doctor]` section configuration.
//!
//! Each `[[doctor.requirements]]` entry describes one thing the tutorial
//! needs. Providing the array replaces the built-in list.
//!
//! # Example
//!
//! ```toml
//! [[doctor.requirements]]
//! name = "SymPy"
//! probe = ["python3", "-c", "import sympy; print(sympy.__version__)"]
//! minimum = "0.7.5"
//! recommended = "0.7.5"
//! missing = "sympy is required"
//! required = true
//!
//! [[doctor.requirements]]
//! name = "pdflatex"
//! program = "pdflatex"
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Environment check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctorConfig {
    pub requirements: Vec<Requirement>,
    /// Printed verbatim after the checks.
    pub notes: Vec<String>,
}

/// One probed dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    /// Display name.
    pub name: String,
    /// Program looked up on PATH when there is no `probe`.
    pub program: Option<String>,
    /// Command printing the installed version on its first stdout line.
    pub probe: Option<Vec<String>>,
    /// Older versions fail the check.
    pub minimum: Option<String>,
    /// Older versions only get a hint to upgrade.
    pub suggested_minimum: Option<String>,
    /// Any other version gets a hint naming this one.
    pub recommended: Option<String>,
    /// Message when the probe fails or the program is absent.
    pub missing: Option<String>,
    /// Whether absence fails the run.
    pub required: bool,
}

impl Requirement {
    fn python_module(name: &str, module: &str) -> Self {
        Self {
            name: name.into(),
            probe: Some(vec![
                "python3".into(),
                "-c".into(),
                format!("import {module}; print({module}.__version__)"),
            ]),
            ..Default::default()
        }
    }

    fn program(name: &str, missing: &str) -> Self {
        Self {
            name: name.into(),
            program: Some(name.into()),
            missing: Some(missing.into()),
            ..Default::default()
        }
    }
}

impl Default for DoctorConfig {
    fn default() -> Self {
        let requirements = vec![
            Requirement {
                minimum: Some("0.7.5".into()),
                recommended: Some("0.7.5".into()),
                missing: Some("sympy is required".into()),
                required: true,
                ..Requirement::python_module("SymPy", "sympy")
            },
            Requirement {
                missing: Some(
                    "matplotlib is required for the plotting section of the tutorial".into(),
                ),
                ..Requirement::python_module("matplotlib", "matplotlib")
            },
            Requirement {
                suggested_minimum: Some("2.1.0".into()),
                missing: Some("IPython notebook is required.".into()),
                ..Requirement::python_module("IPython", "IPython")
            },
            Requirement::program("pdflatex", "pdflatex is required to render TikZ diagrams"),
            Requirement::program("pdfcrop", "pdfcrop is required to render TikZ diagrams"),
            Requirement::program(
                "convert",
                "ImageMagick `convert` is required to render TikZ diagrams",
            ),
        ];

        let notes = vec![
            "A fortran and/or C compiler is required for the code generation portion\n\
             of the tutorial. However, if you do not have one, you should not worry, as it\n\
             will not be a large part of the tutorial."
                .into(),
        ];

        Self {
            requirements,
            notes,
        }
    }
}

impl DoctorConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (i, req) in self.requirements.iter().enumerate() {
            let field = format!("doctor.requirements[{i}]");
            if req.name.trim().is_empty() {
                diag.error(&field, "requirement needs a name");
            }
            let has_probe = req.probe.as_ref().is_some_and(|p| !p.is_empty());
            if !has_probe && req.program.is_none() {
                diag.error(&field, "set either `probe` or `program`");
            }
            let versioned =
                req.minimum.is_some() || req.suggested_minimum.is_some() || req.recommended.is_some();
            if versioned && !has_probe {
                diag.error(&field, "version constraints need a `probe` command");
            }
        }
    }
}

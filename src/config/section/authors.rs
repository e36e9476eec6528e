//! `[authors]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [authors]
//! input = "../sympy/AUTHORS"
//! output = "slides/authors.tex"
//! batch = 110       # authors per frame
//! columns = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigDiagnostics;

/// Author slide generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorsConfig {
    /// AUTHORS file to read.
    pub input: PathBuf,
    /// Beamer fragment to write.
    pub output: PathBuf,
    /// Authors per frame.
    pub batch: usize,
    /// `multicols` column count.
    pub columns: usize,
}

impl Default for AuthorsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("AUTHORS"),
            output: PathBuf::from("authors.tex"),
            batch: 110,
            columns: 5,
        }
    }
}

impl AuthorsConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.input = crate::utils::path::expand_path(&self.input, root);
        self.output = crate::utils::path::expand_path(&self.output, root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.batch == 0 {
            diag.error("authors.batch", "batch must be at least 1");
        }
        if self.columns == 0 {
            diag.error("authors.columns", "columns must be at least 1");
        }
    }
}

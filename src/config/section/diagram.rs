//! `[diagram]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [diagram]
//! dirs = ["source/pics"]                 # Scanned when `render` gets no paths
//! extension = "tex"                      # Source file extension
//! digest = "sha1"                        # sha1 | blake3
//! strict = true                          # Tool failure aborts the render
//! latex = ["pdflatex", "-halt-on-error"]
//! crop = ["perl", "/usr/bin/pdfcrop"]
//! convert = ["convert"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ConfigDiagnostics;
use crate::freshness::DigestKind;

/// TikZ rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Directories scanned for sources when no paths are given.
    pub dirs: Vec<PathBuf>,

    /// Source file extension (without dot).
    pub extension: String,

    /// Digest algorithm written to markers.
    pub digest: DigestKind,

    /// Stop and skip the marker when any tool exits non-zero.
    /// With `false`, failures are only warned about and the marker is
    /// still written.
    pub strict: bool,

    /// LaTeX compiler argv. `-output-directory=<dir>` and the source are appended.
    pub latex: Vec<String>,

    /// PDF crop argv. The PDF path is appended; `<stem>-crop.pdf` is expected.
    pub crop: Vec<String>,

    /// Raster conversion argv. Input PDF and output PNG are appended.
    pub convert: Vec<String>,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            dirs: vec![PathBuf::from("source/pics")],
            extension: "tex".into(),
            digest: DigestKind::Sha1,
            strict: true,
            latex: vec!["pdflatex".into(), "-halt-on-error".into()],
            crop: vec!["pdfcrop".into()],
            convert: vec!["convert".into()],
        }
    }
}

impl DiagramConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.dirs = self
            .dirs
            .iter()
            .map(|d| crate::utils::path::expand_path(d, root))
            .collect();
        self.extension = self.extension.trim_start_matches('.').to_string();
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, argv) in [
            ("diagram.latex", &self.latex),
            ("diagram.crop", &self.crop),
            ("diagram.convert", &self.convert),
        ] {
            if argv.first().is_none_or(|p| p.trim().is_empty()) {
                diag.error(field, "command must name a program");
            }
        }
        if self.extension.is_empty() {
            diag.error("diagram.extension", "extension must not be empty");
        }
    }
}

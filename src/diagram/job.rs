//! Paths touched by one render.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::freshness::marker_path;

/// Every file a render of `source` reads, writes or removes.
///
/// Relative sources are anchored at the current directory, since the tools
/// run with `dir` as their working directory. For `pics/fig.tex`:
///
/// | file               | role                         |
/// |--------------------|------------------------------|
/// | `pics/fig.pdf`     | compiler output, then crop   |
/// | `pics/fig-crop.pdf`| cropper output               |
/// | `pics/fig.png`     | final image                  |
/// | `pics/fig.aux/log` | transient, removed after     |
/// | `pics/.fig.tex`    | cache marker                 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub source: PathBuf,
    /// Directory holding the source; build artifacts land here.
    pub dir: PathBuf,
    /// `dir` joined with the source name minus its extension.
    stem: PathBuf,
}

impl RenderJob {
    pub fn new(source: &Path) -> Self {
        let source = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
        let dir = match source.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = source
            .file_stem()
            .map_or_else(|| dir.clone(), |s| dir.join(s));
        Self {
            source,
            dir,
            stem,
        }
    }

    /// Stem with a literal suffix appended (`fig` + `.pdf`).
    ///
    /// `with_extension` would eat dotted stems like `fig.v2`.
    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s: OsString = self.stem.clone().into_os_string();
        s.push(suffix);
        PathBuf::from(s)
    }

    pub fn pdf(&self) -> PathBuf {
        self.with_suffix(".pdf")
    }

    pub fn cropped_pdf(&self) -> PathBuf {
        self.with_suffix("-crop.pdf")
    }

    pub fn png(&self) -> PathBuf {
        self.with_suffix(".png")
    }

    /// Compiler leftovers removed after a render.
    pub fn transient(&self) -> [PathBuf; 2] {
        [self.with_suffix(".aux"), self.with_suffix(".log")]
    }

    pub fn log_file(&self) -> PathBuf {
        self.with_suffix(".log")
    }

    pub fn marker(&self) -> PathBuf {
        marker_path(&self.source)
    }
}

//! Render errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::{Step, StepFailure};

#[derive(Debug, Error)]
pub enum RenderError {
    /// The source could not be read for hashing.
    #[error("cannot read `{path}`")]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external tool failed in strict mode.
    #[error("{step} failed for `{path}`: {failure}\nsee {log} for the full log")]
    Step {
        step: Step,
        path: PathBuf,
        log: String,
        failure: StepFailure,
    },

    /// Moving artifacts or writing the marker failed.
    #[error("cannot update `{path}`")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RenderError {
    pub fn source_path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Source {
            path: path.into(),
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

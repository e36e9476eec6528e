//! Hidden sidecar markers recording the digest of the last good render.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ContentDigest, DigestKind, compute_file_digest};
use crate::debug;

/// Result of comparing a source against its marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Marker matches the current source digest.
    Fresh(ContentDigest),
    /// No marker yet.
    Missing(ContentDigest),
    /// Marker holds a different digest.
    Stale {
        current: ContentDigest,
        stored: String,
    },
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Digest of the source at check time.
    pub fn digest(&self) -> &ContentDigest {
        match self {
            Self::Fresh(d) | Self::Missing(d) => d,
            Self::Stale { current, .. } => current,
        }
    }

    pub fn into_digest(self) -> ContentDigest {
        match self {
            Self::Fresh(d) | Self::Missing(d) => d,
            Self::Stale { current, .. } => current,
        }
    }
}

/// Marker path: same directory, base name prefixed with `.`.
///
/// `pics/fig.tex` -> `pics/.fig.tex`
pub fn marker_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!(".{name}"))
}

/// Read a marker. `Ok(None)` when it does not exist.
pub fn read_marker(marker: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(marker) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrite a marker with the digest and nothing else.
pub fn write_marker(marker: &Path, digest: &ContentDigest) -> io::Result<()> {
    fs::write(marker, digest.as_hex())
}

/// Digest the source and compare it to its marker.
///
/// Fails only when the source cannot be read; an unreadable marker counts as
/// missing.
pub fn check(source: &Path, kind: DigestKind) -> io::Result<Freshness> {
    let current = compute_file_digest(source, kind)?;

    let marker = marker_path(source);
    let stored = read_marker(&marker).unwrap_or(None);
    Ok(match stored {
        None => Freshness::Missing(current),
        Some(s) if current.matches(&s) => Freshness::Fresh(current),
        Some(stored) => {
            if stored.len() != kind.hex_len() {
                debug!("freshness"; "{} holds a non-{} digest", marker.display(), kind);
            }
            Freshness::Stale { current, stored }
        }
    })
}

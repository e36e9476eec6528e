//! Freshness detection: content digests of diagram sources, recorded in
//! hidden sidecar markers.
//!
//! A source `pics/fig.tex` is fresh when `pics/.fig.tex` holds the hex digest
//! of its current bytes.

mod hash;
mod marker;

pub use hash::{ContentDigest, DigestKind, compute_file_digest};
pub use marker::{Freshness, check, marker_path, write_marker};

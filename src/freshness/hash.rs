//! Content digests over raw file bytes.
//!
//! SHA-1 is the default so markers stay compatible with the ones the Sphinx
//! extension used to write. The digest is a change fingerprint only.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Hash algorithm used for cache markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    #[default]
    Sha1,
    Blake3,
}

impl DigestKind {
    /// Length of the hex encoding produced by this algorithm.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Blake3 => 64,
        }
    }

    /// Digest an in-memory buffer.
    pub fn digest_bytes(self, bytes: &[u8]) -> ContentDigest {
        let mut hasher = Hasher::new(self);
        hasher.update(bytes);
        hasher.finish()
    }

    /// Digest a reader in chunks.
    pub fn digest_reader<R: Read>(self, reader: R) -> io::Result<ContentDigest> {
        let mut reader = BufReader::with_capacity(64 * 1024, reader);
        let mut hasher = Hasher::new(self);
        let mut buffer = [0u8; 64 * 1024];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(hasher.finish())
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => f.write_str("sha1"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}

enum Hasher {
    Sha1(Sha1),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn new(kind: DigestKind) -> Self {
        match kind {
            DigestKind::Sha1 => Self::Sha1(Sha1::new()),
            DigestKind::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Sha1(h) => h.update(bytes),
            Self::Blake3(h) => {
                h.update(bytes);
            }
        }
    }

    fn finish(self) -> ContentDigest {
        let hex = match self {
            Self::Sha1(h) => hex::encode(h.finalize()),
            Self::Blake3(h) => hex::encode(h.finalize().as_bytes()),
        };
        ContentDigest(hex)
    }
}

/// Lowercase hex digest of a file's contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// The hex string, as written to marker files.
    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// Compare against marker content.
    ///
    /// Marker content must match exactly; a trailing newline added by an
    /// editor makes the marker stale.
    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 12 chars are enough for log lines
        write!(f, "{}", &self.0[..self.0.len().min(12)])
    }
}

/// Digest the raw bytes of a file.
pub fn compute_file_digest(path: &Path, kind: DigestKind) -> io::Result<ContentDigest> {
    let file = File::open(path)?;
    kind.digest_reader(file)
}

//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `expand_path` - `~` expansion, then resolve against a base directory
//! - `is_hidden` - dotfile check (cache markers are dotfiles)

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve a relative path against `base`.
///
/// Non-UTF-8 paths skip tilde expansion.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    };

    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

/// Whether the file name starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_expand_path_relative() {
        let resolved = expand_path(Path::new("build/html"), Path::new("/docs"));
        assert_eq!(resolved, PathBuf::from("/docs/build/html"));
    }

    #[test]
    fn test_expand_path_absolute_untouched() {
        let resolved = expand_path(Path::new("/opt/mathjax"), Path::new("/docs"));
        assert_eq!(resolved, PathBuf::from("/opt/mathjax"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let resolved = expand_path(Path::new("~/mathjax"), Path::new("/docs"));
        assert!(resolved.ends_with("mathjax"));
        if std::env::var_os("HOME").is_some() {
            assert!(!resolved.to_string_lossy().contains('~'));
        }
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("pics/.fig.tex")));
        assert!(!is_hidden(Path::new("pics/fig.tex")));
        assert!(!is_hidden(Path::new("/")));
    }
}

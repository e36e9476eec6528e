//! Source discovery for batch renders.

use jwalk::WalkDir;
use std::path::{Path, PathBuf};

use crate::utils::path::is_hidden;

/// Expand files and directories into a sorted, deduplicated source list.
///
/// Files are taken as given. Directories are walked recursively for files
/// with `extension`; hidden entries (including cache markers) are skipped.
/// Paths that do not exist are returned unchanged so the render reports them.
pub fn collect_sources(paths: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = paths
        .iter()
        .flat_map(|path| {
            if path.is_dir() {
                walk(path, extension)
            } else {
                vec![path.clone()]
            }
        })
        .collect();
    sources.sort();
    sources.dedup();
    sources
}

fn walk(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| !is_hidden(p) && has_extension(p, extension))
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_walks_recursively_by_extension() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("b.tex"));
        touch(&root.join("sub/a.tex"));
        touch(&root.join("sub/a.png"));
        touch(&root.join("sub/.a.tex"));
        touch(&root.join(".hidden/c.tex"));

        let found = collect_sources(&[root.to_path_buf()], "tex");
        assert_eq!(found, vec![root.join("b.tex"), root.join("sub/a.tex")]);
    }

    #[test]
    fn test_explicit_files_kept_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("fig.tex"));
        let missing = root.join("missing.tex");

        let found = collect_sources(
            &[root.join("fig.tex"), root.to_path_buf(), missing.clone()],
            "tex",
        );
        assert_eq!(found, vec![root.join("fig.tex"), missing]);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(has_extension(Path::new("a.TEX"), "tex"));
        assert!(!has_extension(Path::new("a.tex.bak"), "tex"));
        assert!(!has_extension(Path::new("tex"), "tex"));
    }
}

//! `doctools authors`: regenerate the author slides.

use std::fs;

use anyhow::{Context, Result};

use crate::{
    authors::{FrameLayout, frame_count, parse_authors, render_frames},
    config::AuthorsConfig,
    log,
    utils::plural_count,
};

pub fn run_authors(config: &AuthorsConfig) -> Result<()> {
    let content = fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;

    let authors = parse_authors(&content);
    let layout = FrameLayout {
        batch: config.batch,
        columns: config.columns,
    };
    let tex = render_frames(&authors, layout);

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&config.output, tex)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    log!(
        "authors";
        "{} in {} -> {}",
        plural_count(authors.len(), "author"),
        plural_count(frame_count(authors.len(), config.batch), "frame"),
        config.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_frames_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("AUTHORS");
        fs::write(&input, "A <a@x>\nB <b@x>\nC <c@x>\n").unwrap();

        let config = AuthorsConfig {
            input,
            output: dir.path().join("slides/authors.tex"),
            batch: 2,
            columns: 3,
        };
        run_authors(&config).unwrap();

        let tex = fs::read_to_string(&config.output).unwrap();
        assert!(tex.starts_with("\\begin{frame}{Authors}\n\\begin{multicols}{3}\n"));
        assert!(tex.contains("\\begin{frame}{Authors (continued)}\n"));
    }

    #[test]
    fn test_empty_authors_gives_empty_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("AUTHORS");
        fs::write(&input, "no addresses here\n").unwrap();
        let config = AuthorsConfig {
            input,
            output: dir.path().join("authors.tex"),
            ..Default::default()
        };
        run_authors(&config).unwrap();
        assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
    }

    #[test]
    fn test_missing_input_names_path() {
        let dir = TempDir::new().unwrap();
        let config = AuthorsConfig {
            input: dir.path().join("AUTHORS"),
            output: dir.path().join("authors.tex"),
            ..Default::default()
        };
        let err = format!("{:#}", run_authors(&config).unwrap_err());
        assert!(err.contains("AUTHORS"));
        assert!(!config.output.exists());
    }
}

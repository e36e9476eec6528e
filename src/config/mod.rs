//! Configuration management for `doctools.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [diagram] [serve] [authors] [doctor]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! ├── util.rs        # config file discovery
//! └── mod.rs         # DocsConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults and
//! the current directory is the root. Relative paths inside the file are
//! resolved against the directory holding it.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{AuthorsConfig, DiagramConfig, DoctorConfig, Requirement, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{
    cli::{Cli, Commands, RenderArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing doctools.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub diagram: DiagramConfig,
    pub serve: ServeConfig,
    pub authors: AuthorsConfig,
    pub doctor: DoctorConfig,
}

impl DocsConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is not an
    /// error unless a non-default name was requested.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let found = find_config_file(&cli.config, &cwd);

        let mut config = match &found {
            Some(path) => Self::from_path(path)?,
            None if cli.config != Path::new(DEFAULT_CONFIG_NAME) => {
                return Err(ConfigError::Io(
                    cli.config.clone(),
                    std::io::Error::from(std::io::ErrorKind::NotFound),
                )
                .into());
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG_NAME);
                Self::default()
            }
        };

        let root = found
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.clone(), Path::to_path_buf);
        config.config_path = found.map(|p| crate::utils::path::normalize_path(&p));
        config.finalize(&root, &cwd, cli);
        config.validate()?;

        if let Some(path) = &config.config_path {
            crate::debug!("config"; "loaded {}", path.display());
        }

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Resolve paths against the root and apply command-line overrides.
    ///
    /// CLI paths are relative to the working directory, config paths to the
    /// root, so overrides are applied after normalization.
    fn finalize(&mut self, root: &Path, cwd: &Path, cli: &Cli) {
        self.root = crate::utils::path::normalize_path(root);
        crate::logger::set_verbose(cli.verbose);

        let root = self.root.clone();
        self.diagram.normalize(&root);
        self.serve.normalize(&root);
        self.authors.normalize(&root);

        self.apply_command_options(&cli.command, cwd);
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, command: &Commands, cwd: &Path) {
        let from_cwd = |p: &PathBuf| crate::utils::path::expand_path(p, cwd);

        match command {
            Commands::Render { args } => self.apply_render_args(args),
            Commands::Serve {
                interface,
                port,
                root,
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.root, root.as_ref().map(from_cwd).as_ref());
            }
            Commands::Authors {
                input,
                output,
                batch,
            } => {
                Self::update_option(&mut self.authors.input, input.as_ref().map(from_cwd).as_ref());
                Self::update_option(
                    &mut self.authors.output,
                    output.as_ref().map(from_cwd).as_ref(),
                );
                Self::update_option(&mut self.authors.batch, batch.as_ref());
            }
            Commands::Doctor => {}
        }
    }

    /// Apply render arguments from CLI.
    fn apply_render_args(&mut self, args: &RenderArgs) {
        Self::update_option(&mut self.diagram.strict, args.strict.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.diagram.validate(&mut diag);
        self.serve.validate(&mut diag);
        self.authors.validate(&mut diag);
        self.doctor.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

/// File name looked up when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "doctools.toml";

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DocsConfig {
    let (parsed, ignored) = DocsConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_invalid_toml() {
        let err = DocsConfig::parse_with_ignored("[serve\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_default_config() {
        let config = DocsConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.serve.port, 8000);
        assert_eq!(config.authors.batch, 110);
        assert!(config.diagram.strict);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[serve]\nport = 9000\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = DocsConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.serve.port, 9000);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_finalize_resolves_against_root() {
        let cli = Cli::parse_from(["doctools", "serve"]);
        let mut config = test_parse_config("[serve]\nroot = \"_build/html\"");
        config.finalize(Path::new("/docs"), Path::new("/elsewhere"), &cli);

        assert_eq!(config.serve.root, PathBuf::from("/docs/_build/html"));
        assert_eq!(config.serve.mathjax, PathBuf::from("/docs/mathjax"));
        assert_eq!(config.diagram.dirs, vec![PathBuf::from("/docs/source/pics")]);
    }

    #[test]
    fn test_cli_overrides_serve() {
        let cli = Cli::parse_from(["doctools", "serve", "-p", "9001", "-r", "out"]);
        let mut config = DocsConfig::default();
        config.finalize(Path::new("/docs"), Path::new("/work"), &cli);

        assert_eq!(config.serve.port, 9001);
        // CLI paths are relative to cwd, not the config root
        assert_eq!(config.serve.root, PathBuf::from("/work/out"));
    }

    #[test]
    fn test_cli_overrides_authors_and_render() {
        let cli = Cli::parse_from(["doctools", "authors", "-b", "50", "-i", "/src/AUTHORS"]);
        let mut config = DocsConfig::default();
        config.finalize(Path::new("/docs"), Path::new("/work"), &cli);
        assert_eq!(config.authors.batch, 50);
        assert_eq!(config.authors.input, PathBuf::from("/src/AUTHORS"));
        assert_eq!(config.authors.output, PathBuf::from("/docs/authors.tex"));

        let cli = Cli::parse_from(["doctools", "render", "--strict=false"]);
        let mut config = DocsConfig::default();
        config.finalize(Path::new("/docs"), Path::new("/work"), &cli);
        assert!(!config.diagram.strict);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = test_parse_config("[authors]\nbatch = 0\ncolumns = 0\n[serve]\nport = 0");
        let err = config.validate().unwrap_err();
        let diag = match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(d)) => d,
            other => panic!("unexpected error {other:?}"),
        };
        assert_eq!(diag.len(), 3);
    }
}

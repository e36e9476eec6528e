//! `[serve]` section configuration.
//!
//! Contains development server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8000                 # HTTP port number
//! root = "build/html"         # Built HTML tree
//! mathjax = "mathjax"         # MathJax bundle, served under /mathjax/
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Content root served for every path not under `/mathjax/`.
    pub root: PathBuf,

    /// Directory backing `/mathjax/`.
    pub mathjax: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8000,
            root: PathBuf::from("build/html"),
            mathjax: PathBuf::from("mathjax"),
        }
    }
}

impl ServeConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.root = crate::utils::path::expand_path(&self.root, root);
        self.mathjax = crate::utils::path::expand_path(&self.mathjax, root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error("serve.port", "port must be between 1 and 65535");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use std::path::{Path, PathBuf};

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_serve_config() {
        let config = test_parse_config("[serve]\ninterface = \"0.0.0.0\"\nport = 8080");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
        );
        assert_eq!(config.serve.port, 8080);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 8000);
        assert_eq!(config.serve.root, PathBuf::from("build/html"));
        assert_eq!(config.serve.mathjax, PathBuf::from("mathjax"));
    }

    #[test]
    fn test_serve_config_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    }

    #[test]
    fn test_serve_config_normalize() {
        let mut config = test_parse_config("[serve]\nmathjax = \"/usr/share/mathjax\"");
        config.serve.normalize(Path::new("/docs"));
        assert_eq!(config.serve.root, PathBuf::from("/docs/build/html"));
        assert_eq!(config.serve.mathjax, PathBuf::from("/usr/share/mathjax"));
    }

    #[test]
    fn test_serve_config_port_zero_rejected() {
        let config = test_parse_config("[serve]\nport = 0");
        let mut diag = ConfigDiagnostics::new();
        config.serve.validate(&mut diag);
        assert!(!diag.is_empty());
    }
}

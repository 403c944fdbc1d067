//! Bootstrap configuration.
//!
//! The client needs exactly two decisions to start: which page to attach
//! to, and whether reloads are hard or soft. Both come from the CLI, with
//! an optional `live-client.toml` underneath it (CLI wins). The reload
//! endpoint address is derived from the page URL unless given explicitly.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;

/// Well-known path of the reload endpoint on the dev server.
pub const WS_ENDPOINT_PATH: &str = "/live-server-ws";

/// Default config file, read only if present.
pub const DEFAULT_CONFIG_FILE: &str = "live-client.toml";

// ============================================================================
// Errors
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// File Format
// ============================================================================

/// `live-client.toml` contents.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    connect: ConnectSection,
}

/// `[connect]` section.
#[derive(Debug, Default, Deserialize)]
struct ConnectSection {
    /// Reload endpoint address (`ws://...`).
    address: Option<String>,
    /// Full-navigation reloads instead of head/body swaps.
    hard: Option<bool>,
}

impl ConfigFile {
    /// Read a config file. A missing file at the default path is an empty
    /// config; a missing file the user named explicitly is an error.
    fn read(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(path.to_path_buf(), e)),
        }
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Merged bootstrap configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The page the client holds and reloads.
    pub page: Url,
    /// Reload endpoint address.
    pub address: String,
    /// Hard (full navigation) vs soft (head/body swap) reloads.
    pub hard: bool,
}

impl ClientConfig {
    /// Build the effective configuration from CLI arguments and the
    /// optional config file.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => ConfigFile::read(path, true)?,
            None => ConfigFile::read(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };

        let page = parse_page_url(&cli.page)?;
        let address = match cli.address.clone().or(file.connect.address) {
            Some(address) => address,
            None => derive_address(&page)?,
        };
        let hard = cli.hard || file.connect.hard.unwrap_or(false);

        Ok(Self {
            page,
            address,
            hard,
        })
    }
}

/// Parse and validate the page URL.
fn parse_page_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::Validation(format!("invalid page URL `{raw}`: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::Validation(format!(
                "page URL must be http(s), got `{other}`"
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Validation(format!(
            "page URL `{raw}` has no host"
        )));
    }

    Ok(url)
}

/// Derive `ws://<host>:<port>/live-server-ws` from the page URL.
///
/// An https page gets a wss endpoint.
fn derive_address(page: &Url) -> Result<String, ConfigError> {
    let host = page
        .host_str()
        .ok_or_else(|| ConfigError::Validation("page URL has no host".to_string()))?;
    let scheme = if page.scheme() == "https" { "wss" } else { "ws" };

    Ok(match page.port() {
        Some(port) => format!("{scheme}://{host}:{port}{WS_ENDPOINT_PATH}"),
        None => format!("{scheme}://{host}{WS_ENDPOINT_PATH}"),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_derive_address_with_port() {
        let page = Url::parse("http://127.0.0.1:8080/index.html").unwrap();
        assert_eq!(
            derive_address(&page).unwrap(),
            "ws://127.0.0.1:8080/live-server-ws"
        );
    }

    #[test]
    fn test_derive_address_without_port() {
        let page = Url::parse("http://devbox/").unwrap();
        assert_eq!(derive_address(&page).unwrap(), "ws://devbox/live-server-ws");
    }

    #[test]
    fn test_derive_address_https_is_wss() {
        let page = Url::parse("https://devbox:8443/").unwrap();
        assert_eq!(
            derive_address(&page).unwrap(),
            "wss://devbox:8443/live-server-ws"
        );
    }

    #[test]
    fn test_page_url_validation() {
        assert!(parse_page_url("http://localhost:8080/").is_ok());
        assert!(matches!(
            parse_page_url("ftp://localhost/"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            parse_page_url("not a url"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_defaults_from_page() {
        let cli = cli(&["live-client", "http://localhost:3000/docs/"]);
        let config = ClientConfig::load(&cli).unwrap();

        assert_eq!(config.page.as_str(), "http://localhost:3000/docs/");
        assert_eq!(config.address, "ws://localhost:3000/live-server-ws");
        assert!(!config.hard);
    }

    #[test]
    fn test_cli_overrides_derived_address() {
        let cli = cli(&[
            "live-client",
            "http://localhost:3000/",
            "--address",
            "ws://127.0.0.1:9000/live-server-ws",
            "--hard",
        ]);
        let config = ClientConfig::load(&cli).unwrap();

        assert_eq!(config.address, "ws://127.0.0.1:9000/live-server-ws");
        assert!(config.hard);
    }

    #[test]
    fn test_config_file_fills_gaps() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[connect]\naddress = \"ws://10.0.0.5:8080/live-server-ws\"\nhard = true"
        )
        .unwrap();

        let cli = cli(&[
            "live-client",
            "http://localhost:3000/",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        let config = ClientConfig::load(&cli).unwrap();

        assert_eq!(config.address, "ws://10.0.0.5:8080/live-server-ws");
        assert!(config.hard);
    }

    #[test]
    fn test_explicit_missing_config_file_is_error() {
        let cli = cli(&[
            "live-client",
            "http://localhost:3000/",
            "--config",
            "/definitely/not/here.toml",
        ]);
        assert!(matches!(
            ClientConfig::load(&cli),
            Err(ConfigError::Io(_, _))
        ));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connect\naddress = 3").unwrap();

        let cli = cli(&[
            "live-client",
            "http://localhost:3000/",
            "--config",
            file.path().to_str().unwrap(),
        ]);
        assert!(matches!(
            ClientConfig::load(&cli),
            Err(ConfigError::Toml(_))
        ));
    }
}

//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Headless live-reload client CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Page to attach to (e.g., http://127.0.0.1:8080/)
    #[arg(value_hint = clap::ValueHint::Url)]
    pub page: String,

    /// Reload endpoint address (default: derived from the page URL)
    #[arg(short, long)]
    pub address: Option<String>,

    /// Use full-navigation reloads instead of in-place head/body swaps
    #[arg(long)]
    pub hard: bool,

    /// Config file path (default: live-client.toml, if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::try_parse_from(["live-client", "http://localhost:8080/"]).unwrap();

        assert_eq!(cli.page, "http://localhost:8080/");
        assert!(cli.address.is_none());
        assert!(!cli.hard);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "live-client",
            "http://localhost:8080/blog/",
            "--address",
            "ws://localhost:9000/live-server-ws",
            "--hard",
            "--verbose",
            "-C",
            "client.toml",
        ])
        .unwrap();

        assert_eq!(
            cli.address.as_deref(),
            Some("ws://localhost:9000/live-server-ws")
        );
        assert!(cli.hard);
        assert!(cli.verbose);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("client.toml"))
        );
    }

    #[test]
    fn test_page_is_required() {
        assert!(Cli::try_parse_from(["live-client"]).is_err());
    }
}

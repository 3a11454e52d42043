//! CLI parse: clap types for presync. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Presync CLI - rename-aware target-tree reconciliation
#[derive(Parser)]
#[command(name = "presync")]
#[command(
    about = "Renames moved files in a mirror target by content match, so an rsync-style pass treats them as unchanged"
)]
pub struct Cli {
    /// Path to the source directory
    #[arg(long)]
    pub source: PathBuf,

    /// Path to the target directory
    #[arg(long)]
    pub target: PathBuf,

    /// Report what would be done, but don't rename any files
    #[arg(long)]
    pub dry_run: bool,

    /// Print additional information (sets log level to debug)
    #[arg(long)]
    pub debug: bool,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_and_target_are_required() {
        assert!(Cli::try_parse_from(["presync"]).is_err());
        assert!(Cli::try_parse_from(["presync", "--source", "/a"]).is_err());
        assert!(Cli::try_parse_from(["presync", "--source", "/a", "--target", "/b"]).is_ok());
    }

    #[test]
    fn test_flags_default_off() {
        let cli = Cli::try_parse_from(["presync", "--source", "/a", "--target", "/b"]).unwrap();
        assert!(!cli.dry_run);
        assert!(!cli.debug);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_dry_run_and_debug_flags() {
        let cli = Cli::try_parse_from([
            "presync",
            "--source",
            "/a",
            "--target",
            "/b",
            "--dry-run",
            "--debug",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert!(cli.debug);
    }
}

//! Command-line interface definitions for spark-folio

use clap::Parser;
use std::path::PathBuf;

/// CLI structure for the spark-folio application
#[derive(Parser)]
#[command(name = "spark-folio")]
#[command(version)]
#[command(about = "Terminal portfolio with section-aware navigation", long_about = None)]
pub struct Cli {
    /// Site configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Portfolio content file (defaults to the bundled content)
    #[arg(long, value_name = "FILE")]
    pub content: Option<PathBuf>,

    /// Route to open, e.g. /projects or /project/shop-mart
    #[arg(short, long, default_value = "/")]
    pub route: String,

    /// File contact messages are appended to
    #[arg(long, value_name = "FILE", default_value = "outbox.toml")]
    pub outbox: PathBuf,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["spark-folio"]);
        assert_eq!(cli.route, "/");
        assert_eq!(cli.outbox, PathBuf::from("outbox.toml"));
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "spark-folio",
            "--config",
            "folio.toml",
            "-r",
            "/projects",
            "-vv",
            "--log-file",
            "folio.log",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("folio.toml")));
        assert_eq!(cli.route, "/projects");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("folio.log")));
    }
}

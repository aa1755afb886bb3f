//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Harvest conference proceedings and chart topic trends.
///
/// Each subcommand runs its whole pipeline with defaults when given no flags.
#[derive(Parser, Debug)]
#[command(name = "proceedings")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/proceedings/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Folder holding <year>.json proceedings files
    #[arg(long, value_name = "DIR", global = true)]
    pub proceedings_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch catalog listings and archival metadata, one file per year
    Harvest(HarvestArgs),
    /// Fill in missing abstracts from the papers' PDFs
    Enrich,
    /// Strip markup and ligatures from stored abstracts
    Clean,
    /// Tally keyword trends per year and draw charts
    Analyze(AnalyzeArgs),
    /// Rank relevant papers by archival download count
    TopDownloads(TopDownloadsArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

/// Inclusive year range overrides.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct YearRangeArgs {
    /// First year (inclusive)
    #[arg(long, value_name = "YEAR", value_parser = clap::value_parser!(i32).range(1900..=2100))]
    pub from: Option<i32>,

    /// Last year (inclusive)
    #[arg(long, value_name = "YEAR", value_parser = clap::value_parser!(i32).range(1900..=2100))]
    pub to: Option<i32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct HarvestArgs {
    #[command(flatten)]
    pub years: YearRangeArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub years: YearRangeArgs,

    /// Folder for trends.json and the SVG charts
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TopDownloadsArgs {
    #[command(flatten)]
    pub years: YearRangeArgs,

    /// Papers listed per year (1-100)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub limit: Option<u16>,

    /// Folder for top_downloads.json
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_subcommand_is_required() {
        let result = Cli::try_parse_from(["proceedings"]);
        assert!(result.is_err());
        let kind = result.unwrap_err().kind();
        assert!(matches!(
            kind,
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                | clap::error::ErrorKind::MissingSubcommand
        ));
    }

    #[test]
    fn test_cli_harvest_defaults() {
        let cli = Cli::try_parse_from(["proceedings", "harvest"]).unwrap();
        let Command::Harvest(args) = cli.command else {
            panic!("expected harvest command");
        };
        assert!(args.years.from.is_none());
        assert!(args.years.to.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_harvest_year_range() {
        let cli =
            Cli::try_parse_from(["proceedings", "harvest", "--from", "2010", "--to", "2012"])
                .unwrap();
        let Command::Harvest(args) = cli.command else {
            panic!("expected harvest command");
        };
        assert_eq!(args.years.from, Some(2010));
        assert_eq!(args.years.to, Some(2012));
    }

    #[test]
    fn test_cli_year_out_of_range_rejected() {
        let result = Cli::try_parse_from(["proceedings", "analyze", "--from", "1800"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "proceedings",
            "enrich",
            "-vv",
            "--proceedings-dir",
            "data",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Enrich));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.proceedings_dir, Some(PathBuf::from("data")));
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let cli = Cli::try_parse_from(["proceedings", "-q", "clean"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Command::Clean));
    }

    #[test]
    fn test_cli_analyze_output_dir() {
        let cli = Cli::try_parse_from(["proceedings", "analyze", "--output-dir", "charts"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.output_dir, Some(PathBuf::from("charts")));
    }

    #[test]
    fn test_cli_top_downloads_limit() {
        let cli = Cli::try_parse_from(["proceedings", "top-downloads", "--limit", "3"]).unwrap();
        let Command::TopDownloads(args) = cli.command else {
            panic!("expected top-downloads command");
        };
        assert_eq!(args.limit, Some(3));
    }

    #[test]
    fn test_cli_top_downloads_limit_zero_rejected() {
        let result = Cli::try_parse_from(["proceedings", "top-downloads", "--limit", "0"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_config_show() {
        let cli = Cli::try_parse_from(["proceedings", "config", "show", "--config", "c.toml"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Cli::try_parse_from(["proceedings", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Cli::try_parse_from(["proceedings", "harvest", "--invalid-flag"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}

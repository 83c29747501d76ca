//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the ROM download manager.
#[derive(Parser)]
#[command(name = "romdl")]
#[command(about = "ROM download manager service")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["romdl", "paths", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Paths)));
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::parse_from(["romdl", "serve"]);
        let Some(Commands::Serve {
            port,
            static_dir,
            api_only,
        }) = cli.command
        else {
            panic!("expected serve");
        };
        assert_eq!(port, 8000);
        assert!(static_dir.is_none());
        assert!(!api_only);
    }

    #[test]
    fn history_flags() {
        let cli = Cli::parse_from(["romdl", "history", "--status", "completed", "--limit", "5"]);
        let Some(Commands::History { status, limit }) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(status.as_deref(), Some("completed"));
        assert_eq!(limit, 5);
    }
}

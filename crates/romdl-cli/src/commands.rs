//! Main commands enum.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (JSON API, progress WebSocket, optional UI)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8000, env = "ROMDL_PORT")]
        port: u16,
        /// Directory with a static UI, served under /web
        #[arg(long, env = "ROMDL_STATIC_DIR")]
        static_dir: Option<PathBuf>,
        /// Serve only the API, even if a static directory is configured
        #[arg(long)]
        api_only: bool,
    },

    /// Print History records as JSON
    History {
        /// Keep only records with this status (e.g. completed, error)
        #[arg(long)]
        status: Option<String>,
        /// Keep only the most recent N records (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },

    /// Reconcile and print the progress of one URL as JSON
    Progress {
        /// Source URL of the download
        url: String,
    },

    /// Show resolved paths for all romdl directories
    Paths,
}

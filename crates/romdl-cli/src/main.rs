//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use romdl_cli::{Cli, CliError, Commands, bootstrap, handlers};
use romdl_core::ResolvedPaths;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let paths = ResolvedPaths::resolve()?;

    let result = match command {
        Commands::Serve {
            port,
            static_dir,
            api_only,
        } => return handlers::serve::execute(paths, port, static_dir, api_only).await,
        Commands::Paths => return handlers::paths::execute(&paths),
        Commands::History { status, limit } => {
            let ctx = bootstrap(paths);
            handlers::history::execute(&ctx, status.as_deref(), limit).await
        }
        Commands::Progress { url } => {
            let ctx = bootstrap(paths);
            handlers::progress::execute(&ctx, &url).await
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }
    Ok(())
}

fn exit_with(err: &CliError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(err.exit_code());
}

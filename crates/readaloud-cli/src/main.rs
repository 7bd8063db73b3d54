//! readaloud CLI entry point.
//!
//! Parses arguments, sets up tracing, then dispatches to a command.

mod cli;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions need nothing else
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "readaloud", &mut std::io::stdout());
        return Ok(());
    }

    let filter = readaloud_observe::verbosity_filter(cli.verbose, cli.quiet);
    readaloud_observe::init_tracing(&filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::Read(args) => cli::read::run_read(cli.data_dir, args, cli.json).await,
        Commands::Page {
            image,
            speak,
            reader,
        } => cli::page::run_page(cli.data_dir, image, speak, reader, cli.json).await,
        Commands::Check { reader } => cli::check::run_check(cli.data_dir, reader, cli.json).await,
        Commands::Completions { .. } => Ok(()),
    };

    readaloud_observe::shutdown_tracing();
    result
}

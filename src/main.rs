use clap::Parser;
use tracing_subscriber::EnvFilter;

use myco_search::{cli, web};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("myco_search=debug,info")
    } else {
        EnvFilter::new("myco_search=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Lookup(args) => {
            cli::lookup::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Search(args) => {
            cli::search::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}

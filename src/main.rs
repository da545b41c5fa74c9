use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hashlookup::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    hashlookup::output::set_quiet(cli.quiet);
    init_tracing(cli.verbose);

    hashlookup::cli::run(cli)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "hashlookup=debug",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

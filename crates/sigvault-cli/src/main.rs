//! sigvault CLI entry point.

use clap::Parser;
use sigvault_cli::{init_logging, run, Cli};
use sigvault_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load errors are reported by the command itself.
    let logging = Config::load_or_default(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();
    init_logging(cli.verbose, &logging);

    run(cli).await
}

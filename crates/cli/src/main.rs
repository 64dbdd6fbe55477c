mod cli;
mod output;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    cli::run(cli).await
}

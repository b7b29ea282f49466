use anyhow::Result;
use clap::Parser;
use tablero_pivot::cli::{Cli, Command};
use tablero_pivot::{catalog, chart, label, query};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let formatter = cli.global.formatter()?;
    let config = cli.global.client_config();

    match cli.command {
        Command::Label(args) => label::run(args, &formatter).await,
        Command::Catalog => catalog::run_catalog(&config, &formatter).await,
        Command::Values(args) => catalog::run_values(args, &config, &formatter).await,
        Command::Query(args) => query::run(args, &config, &formatter).await,
        Command::Chart(args) => chart::run(args, &config, &formatter).await,
    }
}

use log::LevelFilter;
use simple_logger::SimpleLogger;

mod command;
pub mod constants;
pub mod core;
pub mod validation;

use clap::{Parser, Subcommand};

use crate::command::assets::{command_assets, AssetsCommandParameters};
use crate::command::init::{command_init, InitParameters};
use crate::command::pools::{command_pools, PoolsCommandParameters};
use crate::command::prices::{command_prices, PricesCommandParameters};
use crate::core::Error;

#[derive(Parser)]
#[command(name = "price-index")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Write a profile indexing the known tokens of a chain")]
    Init(InitParameters),

    #[command(about = "Fetch the price of every indexed token in a single batched call")]
    Prices(PricesCommandParameters),

    #[command(about = "List the indexed tokens in order")]
    Assets(AssetsCommandParameters),

    #[command(about = "Show the pool each indexed token is priced from")]
    Pools(PoolsCommandParameters),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // The max level follows the profile verbosity once loaded
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()
        .map_err(|e| Error::Execution(e.to_string()))?;
    log::set_max_level(LevelFilter::Info);

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(params) => command_init(params).await?,
        Commands::Prices(params) => command_prices(params).await?,
        Commands::Assets(params) => command_assets(params).await?,
        Commands::Pools(params) => command_pools(params).await?,
    }

    Ok(())
}

use std::path::Path;

use clap::Args;
use price_index_ethereum::ChainID;
use price_index_oracle::uniswap::DEFAULT_TWAP_INTERVAL;
use tracing::info;

use crate::constants::{DEFAULT_CHAIN_ID, DEFAULT_FEE, DEFAULT_PROFILE, DEFAULT_VERBOSITY};
use crate::core::configuration::{Configuration, VerbosityConfiguration};
use crate::core::Error;
use crate::validation::assert_configuration;

#[derive(Args, Clone)]
pub struct InitParameters {
    #[clap(long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    #[clap(long, default_value = DEFAULT_CHAIN_ID)]
    pub chain_id: ChainID,

    #[clap(long)]
    pub rpc_url: Option<String>,

    #[clap(long, default_value_t = DEFAULT_FEE)]
    pub fee: u32,

    #[clap(long, default_value_t = DEFAULT_TWAP_INTERVAL)]
    pub twap_interval: u32,

    #[clap(long, default_value = DEFAULT_VERBOSITY)]
    pub verbosity: VerbosityConfiguration,

    /// Overwrite the profile if it exists
    #[clap(long)]
    pub force: bool,
}

pub async fn command_init(params: InitParameters) -> Result<(), Error> {
    if Path::new(&params.profile).exists() && !params.force {
        return Err(Error::Validation(format!("Profile {} already exists, use --force to overwrite it", params.profile)));
    }

    let mut configuration = Configuration::new(params.chain_id, params.rpc_url, params.fee, params.twap_interval);
    configuration.verbosity = params.verbosity;
    configuration.tokens = Some(configuration.tokens());

    assert_configuration(&configuration)?;
    configuration.write_to_file(&params.profile)?;

    info!("✅ Profile written to {}", params.profile);

    Ok(())
}

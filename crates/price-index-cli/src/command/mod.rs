use price_index_oracle::OracleClient;
use tracing::info;

use crate::core::configuration::Configuration;
use crate::core::Error;
use crate::validation::assert_configuration;

pub mod assets;
pub mod init;
pub mod pools;
pub mod prices;

mod display;

/// Loads and validates the profile, then builds an oracle client indexing its tokens.
pub async fn load_oracle(profile: &str, rpc_url: Option<String>) -> Result<(Configuration, OracleClient), Error> {
    let configuration = Configuration::from_file(profile)?.with_rpc_url(rpc_url)?;
    log::set_max_level(configuration.verbosity.level_filter());

    assert_configuration(&configuration)?;

    if let Some(ethereum) = configuration.oracle.source.ethereum() {
        info!("Using chain-id: {}", ethereum.chain_id);
        info!("Using RPC URL: {}", ethereum.endpoint);
    }
    info!("Profile path: {}", profile);

    let oracle = OracleClient::new(&configuration.oracle)?;
    for token in configuration.tokens() {
        oracle.add_token_to_index(token).await?;
    }

    Ok((configuration, oracle))
}

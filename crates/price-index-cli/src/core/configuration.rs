use std::fs;
use std::str::FromStr;

use ethers_core::types::Address;
use log::LevelFilter;
use price_index_ethereum::constants::{Endpoint, Token};
use price_index_ethereum::{ChainID, Configuration as EthereumConfiguration};
use price_index_oracle::uniswap::{UniswapV3PriceSourceConfiguration, DEFAULT_TWAP_INTERVAL};
use price_index_oracle::Configuration as OracleConfiguration;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FEE, DEFAULT_RPC_TIMEOUT};
use crate::core::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbosityConfiguration {
    Debug,
    Info,
}

impl VerbosityConfiguration {
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::Debug,
            Self::Info => LevelFilter::Info,
        }
    }
}

impl FromStr for VerbosityConfiguration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(VerbosityConfiguration::Debug),
            "info" => Ok(VerbosityConfiguration::Info),
            _ => Err(Error::Validation(format!("unknown verbosity {}", s))),
        }
    }
}

/// Content of a profile file
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub verbosity: VerbosityConfiguration,

    pub oracle: OracleConfiguration,

    /// Tokens to index, in order. Falls back to the known tokens of the chain when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Address>>,
}

impl Configuration {
    /// Profile pricing the known tokens of `chain_id` against WETH
    pub fn new(chain_id: ChainID, rpc_url: Option<String>, fee: u32, twap_interval: u32) -> Self {
        let endpoint = rpc_url.unwrap_or(Endpoint::default_rpc_url(&chain_id).to_string());

        Self {
            verbosity: VerbosityConfiguration::Info,
            oracle: OracleConfiguration {
                base_token: Token::weth(&chain_id).address,
                fee,
                source: UniswapV3PriceSourceConfiguration {
                    twap_interval,
                    factory: None,
                    ethereum: EthereumConfiguration::new(chain_id, &endpoint, DEFAULT_RPC_TIMEOUT),
                }
                .into(),
            },
            tokens: None,
        }
    }

    pub fn from_file(path: &str) -> Result<Self, Error> {
        let data = fs::read(path).map_err(|e| Error::Configuration(format!("could not read {}: {}", path, e)))?;

        serde_json::from_slice(&data).map_err(|e| Error::Configuration(e.to_string()))
    }

    pub fn write_to_file(&self, path: &str) -> Result<(), Error> {
        let data = serde_json::to_string_pretty(&self).map_err(|e| Error::Configuration(e.to_string()))?;

        fs::write(path, data).map_err(|e| Error::Configuration(e.to_string()))
    }

    pub fn chain_id(&self) -> Option<ChainID> {
        self.oracle.source.ethereum().map(|x| x.chain_id)
    }

    /// Replaces the primary endpoint of the price source
    pub fn with_rpc_url(mut self, rpc_url: Option<String>) -> Result<Self, Error> {
        if let Some(rpc_url) = rpc_url {
            let ethereum = self
                .oracle
                .source
                .ethereum_mut()
                .ok_or(Error::Configuration("price source has no ethereum endpoint".to_string()))?;

            ethereum.endpoint = rpc_url;
        }

        Ok(self)
    }

    /// Tokens to index, in order
    pub fn tokens(&self) -> Vec<Address> {
        match (&self.tokens, self.chain_id()) {
            (Some(tokens), _) => tokens.clone(),
            (None, Some(chain_id)) => Token::default_index(&chain_id).into_iter().map(|x| x.address).collect(),
            (None, None) => vec![],
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new(ChainID::Mainnet, None, DEFAULT_FEE, DEFAULT_TWAP_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use ethers_core::types::Address;
    use price_index_ethereum::constants::Token;
    use price_index_ethereum::ChainID;
    use serde_json::json;

    use crate::core::configuration::{Configuration, VerbosityConfiguration};

    #[test]
    fn default_profile_prices_fixture_against_weth() {
        let configuration = Configuration::default();

        assert_eq!(configuration.oracle.base_token, Token::weth(&ChainID::Mainnet).address);
        assert_eq!(configuration.oracle.fee, 3000);
        assert_eq!(configuration.chain_id(), Some(ChainID::Mainnet));

        let expected: Vec<Address> = Token::default_index(&ChainID::Mainnet).into_iter().map(|x| x.address).collect();
        assert_eq!(configuration.tokens(), expected);
    }

    #[test]
    fn parse_profile() {
        // Given
        let profile = json!({
            "verbosity": "debug",
            "oracle": {
                "base_token": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
                "fee": 500,
                "source": {
                    "provider": "uniswap_v3",
                    "ethereum": { "chain_id": "mainnet", "endpoint": "http://localhost:8545", "timeout": 5 }
                }
            },
            "tokens": ["0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"]
        });

        // When
        let configuration: Configuration = serde_json::from_value(profile).unwrap();

        // Then
        assert_eq!(configuration.verbosity, VerbosityConfiguration::Debug);
        assert_eq!(configuration.oracle.fee, 500);
        assert_eq!(configuration.tokens(), vec![Token::usdc(&ChainID::Mainnet).address]);

        let ethereum = configuration.oracle.source.ethereum().unwrap();
        assert_eq!(ethereum.endpoint, "http://localhost:8545");
        assert!(ethereum.fallbacks.is_empty());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let profile = json!({
            "verbosity": "info",
            "oracle": {
                "base_token": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
                "fee": 3000,
                "source": { "provider": "chainlink" }
            }
        });

        assert!(serde_json::from_value::<Configuration>(profile).is_err());
    }

    #[test]
    fn rpc_url_overrides_endpoint() {
        let configuration = Configuration::default().with_rpc_url(Some("http://localhost:8545".to_string())).unwrap();

        assert_eq!(configuration.oracle.source.ethereum().unwrap().endpoint, "http://localhost:8545");
    }

    #[test]
    fn profile_survives_file_round_trip() {
        let path = std::env::temp_dir().join("price-index-profile-test.json");
        let path = path.to_str().unwrap();

        let configuration = Configuration::new(ChainID::Sepolia, None, 500, 0);
        configuration.write_to_file(path).unwrap();
        let loaded = Configuration::from_file(path).unwrap();

        assert_eq!(loaded.chain_id(), Some(ChainID::Sepolia));
        assert_eq!(loaded.oracle.fee, 500);
        assert_eq!(loaded.tokens(), configuration.tokens());
    }

    #[test]
    fn verbosity_from_str() {
        assert_eq!(VerbosityConfiguration::from_str("debug").unwrap(), VerbosityConfiguration::Debug);
        assert!(VerbosityConfiguration::from_str("trace").is_err());
    }
}

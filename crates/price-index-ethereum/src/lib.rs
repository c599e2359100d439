use ethers_core::types::{Address, Bytes};
use price_index_common::fallback::{self, BreakerConfiguration};
use price_index_common::{log_if_error, measure_duration, metric};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

pub mod constants;
pub mod contract;
pub mod math;
pub mod multicall;

mod network;
pub use network::ChainID;
pub use tracing;

mod client;

use crate::client::EthereumClient;
use crate::constants::Contract;
use crate::contract::FunctionCall;

/// JSON-RPC error code of a reverted call (EIP-1474)
pub const EXECUTION_REVERTED_CODE: i64 = 3;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid url {0}")]
    URL(String),

    #[error(transparent)]
    HTTP(#[from] reqwest::Error),

    #[error("request error status={status} body={body}")]
    Status { status: u16, body: String },

    #[error("rpc error code={code} message={message}")]
    Rpc { code: i64, message: String },

    #[error("wrong format error {0}")]
    Format(String),

    #[error("internal error {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the node executed the call and it reverted. Any other error, including
    /// JSON-RPC errors such as rate limits or internal node errors, is blamed on the endpoint.
    pub fn is_execution_error(&self) -> bool {
        match self {
            Self::Rpc { code: EXECUTION_REVERTED_CODE, .. } => true,
            Self::Rpc { code: -32000, message } => message.to_lowercase().contains("execution reverted"),
            _ => false,
        }
    }
}

impl From<fallback::Error<Error>> for Error {
    fn from(value: fallback::Error<Error>) -> Self {
        match value {
            fallback::Error::Rejected => Self::Internal("could not connect to endpoint".to_string()),
            fallback::Error::Inner(e) => e,
        }
    }
}

impl From<ethers_core::abi::Error> for Error {
    fn from(value: ethers_core::abi::Error) -> Self {
        Self::Format(value.to_string())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub chain_id: ChainID,
    pub endpoint: String,
    pub timeout: u64,

    #[serde(default)]
    pub fallbacks: Vec<String>,

    #[serde(default)]
    pub breaker: BreakerConfiguration,

    /// Overrides the canonical Multicall3 deployment
    #[serde(default)]
    pub multicall: Option<Address>,
}

impl Configuration {
    pub fn new(chain_id: ChainID, endpoint: &str, timeout: u64) -> Self {
        Self {
            chain_id,
            endpoint: endpoint.to_string(),
            timeout,
            fallbacks: vec![],
            breaker: BreakerConfiguration::default(),
            multicall: None,
        }
    }
}

#[derive(Clone)]
pub struct Client {
    chain_id: ChainID,
    multicall: Address,

    inner: EthereumClient,
}

impl Client {
    pub fn new(configuration: &Configuration) -> Result<Self, Error> {
        let mut client = EthereumClient::new(&configuration.endpoint, configuration.timeout, configuration.breaker)?;
        for fallback in &configuration.fallbacks {
            client = client.with_fallback(fallback, configuration.timeout)?;
        }

        Ok(Self {
            chain_id: configuration.chain_id,
            multicall: configuration.multicall.unwrap_or(Contract::MULTICALL3),
            inner: client,
        })
    }

    /// Returns the chain_id on which this client is bound
    pub fn chain_id(&self) -> &ChainID {
        &self.chain_id
    }

    /// Execute all the `calls` in a single Multicall3 `aggregate3` request. The batch is
    /// atomic: if any call reverts the whole request fails. Return data is given in the
    /// order of `calls`.
    #[instrument(name = "aggregate", skip(self, calls), fields(calls = calls.len()))]
    pub async fn aggregate(&self, calls: &[FunctionCall]) -> Result<Vec<Bytes>, Error> {
        let request = multicall::encode_aggregate3(self.multicall, calls);

        let (result, duration) = measure_duration!(log_if_error!(self.inner.eth_call(&request).await));

        metric!(histogram[ethereum_rpc] = duration.as_millis(), method = "aggregate");
        metric!(on error result => counter [ ethereum_rpc_error ] = 1, method = "aggregate");

        multicall::decode_aggregate3(&result?, calls.len())
    }
}

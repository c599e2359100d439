use std::sync::Arc;

use bigdecimal::BigDecimal;
use ethers_core::types::{Address, U256};
use price_index_common::{log_if_error, measure_duration, metric};
use price_index_ethereum::math::format_units;
use price_index_ethereum::Configuration as EthereumConfiguration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::registry::AssetRegistry;
use crate::uniswap::{UniswapV3PriceSource, UniswapV3PriceSourceConfiguration};

mod decimals;
pub mod math;
pub mod registry;
pub mod uniswap;

#[cfg(feature = "testing")]
pub mod mock;

#[derive(Error, Debug)]
pub enum Error {
    #[error("asset {0:?} is already indexed")]
    DuplicateAsset(Address),

    #[error("no asset to price")]
    EmptyAssetSet,

    #[error("price oracle unavailable {0}")]
    OracleUnavailable(String),

    #[error("no pool for asset {0:?}")]
    MissingPool(Address),

    #[error("wrong format error {0}")]
    Format(String),

    #[error("price is invalid {0:?}")]
    InvalidPrice(Address),

    #[error("invalid configuration {0}")]
    Configuration(String),
}

impl From<price_index_ethereum::Error> for Error {
    fn from(value: price_index_ethereum::Error) -> Self {
        match value {
            price_index_ethereum::Error::Format(e) => Self::Format(e),
            price_index_ethereum::Error::URL(e) => Self::Configuration(format!("invalid url {}", e)),
            e => Self::OracleUnavailable(e.to_string()),
        }
    }
}

/// Price of one whole unit of `asset`, as an amount of the smallest unit of the base token.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceQuote {
    pub asset: Address,
    pub decimals: u8,
    pub base_decimals: u8,

    pub price: U256,
}

impl PriceQuote {
    /// Price expressed in whole base tokens
    pub fn as_decimal(&self) -> BigDecimal {
        format_units(self.price, self.base_decimals)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum SourceConfiguration {
    #[cfg(feature = "testing")]
    #[serde(skip)]
    Mock(Arc<dyn mock::MockPriceSource>),

    #[serde(rename = "uniswap_v3")]
    UniswapV3(UniswapV3PriceSourceConfiguration),
}

impl SourceConfiguration {
    /// Ethereum node used by the source, if any
    pub fn ethereum(&self) -> Option<&EthereumConfiguration> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(_) => None,

            Self::UniswapV3(x) => Some(&x.ethereum),
        }
    }

    pub fn ethereum_mut(&mut self) -> Option<&mut EthereumConfiguration> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(_) => None,

            Self::UniswapV3(x) => Some(&mut x.ethereum),
        }
    }
}

/// Fetches the prices of a set of assets with one batched request to the underlying source.
#[derive(Clone)]
pub enum PriceQueryBatcher {
    #[cfg(feature = "testing")]
    Mock(Arc<dyn mock::MockPriceSource>),

    UniswapV3(UniswapV3PriceSource),
}

#[cfg(feature = "testing")]
impl From<Arc<dyn mock::MockPriceSource>> for PriceQueryBatcher {
    fn from(value: Arc<dyn mock::MockPriceSource>) -> Self {
        Self::Mock(value)
    }
}

impl PriceQueryBatcher {
    pub fn new(configuration: &SourceConfiguration) -> Result<Self, Error> {
        let batcher = match configuration {
            #[cfg(feature = "testing")]
            SourceConfiguration::Mock(x) => Self::Mock(x.clone()),

            SourceConfiguration::UniswapV3(x) => Self::UniswapV3(UniswapV3PriceSource::new(x)?),
        };

        Ok(batcher)
    }

    #[cfg(feature = "testing")]
    pub fn mock<I: 'static + mock::MockPriceSource>() -> Self {
        Self::Mock(Arc::new(I::new()))
    }

    /// Address of the pool quoting `asset` against `base`, for sources reading on-chain pools
    pub fn pool_address(&self, asset: Address, base: Address, fee: u32) -> Option<Address> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(_) => None,

            Self::UniswapV3(source) => (asset != base).then(|| source.pool_address(asset, base, fee)),
        }
    }

    /// Returns the price of every asset in `assets` against `base` using the pools of the given
    /// `fee` tier. The i-th quote is the price of the i-th asset.
    /// Errors
    ///  - [`Error::EmptyAssetSet`] if `assets` is empty, no request is made
    ///  - [`Error::OracleUnavailable`] if the source cannot be reached or the batch reverts
    ///  - [`Error::Format`] if the source answer is not aligned with `assets`
    #[instrument(name = "fetch_all", skip(self, assets), fields(assets = assets.len()))]
    pub async fn fetch_all(&self, assets: &[Address], base: Address, fee: u32) -> Result<Vec<PriceQuote>, Error> {
        if assets.is_empty() {
            return Err(Error::EmptyAssetSet);
        }

        let (result, duration) = measure_duration!(log_if_error!(self.fetch_aligned(assets, base, fee).await));

        metric!(counter[price_request] = 1, method = "fetch_all");
        metric!(histogram[price_request_duration_milliseconds] = duration.as_millis(), method = "fetch_all");
        metric!(on error result => counter [ price_request_error ] = 1, method = "fetch_all");

        result
    }

    async fn fetch_aligned(&self, assets: &[Address], base: Address, fee: u32) -> Result<Vec<PriceQuote>, Error> {
        let quotes = match self {
            #[cfg(feature = "testing")]
            Self::Mock(source) => source.fetch_all(assets, base, fee).await,

            Self::UniswapV3(source) => source.fetch_all(assets, base, fee).await,
        }?;

        if quotes.len() != assets.len() {
            return Err(Error::Format(format!("received {} prices for {} assets", quotes.len(), assets.len())));
        }

        if let Some(index) = quotes.iter().zip(assets).position(|(quote, asset)| quote.asset != *asset) {
            return Err(Error::Format(format!("price at position {} does not belong to {:?}", index, assets[index])));
        }

        Ok(quotes)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub base_token: Address,
    pub fee: u32,

    pub source: SourceConfiguration,
}

/// Keeps an index of assets and prices all of them against a fixed base token and fee tier.
///
/// Clones share the same index.
#[derive(Clone)]
pub struct OracleClient {
    base_token: Address,
    fee: u32,

    registry: Arc<RwLock<AssetRegistry>>,
    batcher: PriceQueryBatcher,
}

impl OracleClient {
    pub fn new(configuration: &Configuration) -> Result<Self, Error> {
        let batcher = PriceQueryBatcher::new(&configuration.source)?;

        Ok(Self::with_batcher(configuration.base_token, configuration.fee, batcher))
    }

    pub fn with_batcher(base_token: Address, fee: u32, batcher: PriceQueryBatcher) -> Self {
        Self {
            base_token,
            fee,

            registry: Arc::new(RwLock::new(AssetRegistry::new())),
            batcher,
        }
    }

    pub fn base_token(&self) -> Address {
        self.base_token
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    /// Pool from which the price of `asset` is read, if the source reads pools
    pub fn pool_of(&self, asset: Address) -> Option<Address> {
        self.batcher.pool_address(asset, self.base_token, self.fee)
    }

    #[instrument(name = "add_token_to_index", skip(self))]
    pub async fn add_token_to_index(&self, asset: Address) -> Result<(), Error> {
        self.registry.write().await.add(asset)
    }

    pub async fn get_assets(&self) -> Vec<Address> {
        self.registry.read().await.list()
    }

    /// Prices every indexed asset, in index order.
    pub async fn get_all_prices(&self) -> Result<Vec<PriceQuote>, Error> {
        let assets = self.get_assets().await;

        self.batcher.fetch_all(&assets, self.base_token, self.fee).await
    }
}

use std::collections::HashMap;

use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, Bytes, U256};
use ethers_core::utils::{get_create2_address_from_hash, keccak256};
use price_index_ethereum::constants::UniswapV3;
use price_index_ethereum::contract::FunctionCall;
use price_index_ethereum::math::one_unit;
use price_index_ethereum::{Client, Configuration as EthereumConfiguration};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::decimals::DecimalsResolver;
use crate::math::{average_tick, quote_at_tick};
use crate::{Error, PriceQuote, PriceQueryBatcher, SourceConfiguration};

pub const DEFAULT_TWAP_INTERVAL: u32 = 60;

fn default_twap_interval() -> u32 {
    DEFAULT_TWAP_INTERVAL
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UniswapV3PriceSourceConfiguration {
    /// Observation window in seconds. Zero reads the current pool tick instead of an average.
    #[serde(default = "default_twap_interval")]
    pub twap_interval: u32,

    /// Overrides the factory deployed on the configured chain
    #[serde(default)]
    pub factory: Option<Address>,

    pub ethereum: EthereumConfiguration,
}

impl From<UniswapV3PriceSourceConfiguration> for SourceConfiguration {
    fn from(value: UniswapV3PriceSourceConfiguration) -> Self {
        Self::UniswapV3(value)
    }
}

/// Computes the address of the `token_a`/`token_b` pool with the given `fee` as deployed by
/// the Uniswap V3 `factory` with CREATE2. The order of the tokens does not matter.
pub fn pool_address(factory: Address, token_a: Address, token_b: Address, fee: u32) -> Address {
    let (token0, token1) = if token_a < token_b { (token_a, token_b) } else { (token_b, token_a) };

    let salt = keccak256(abi::encode(&[Token::Address(token0), Token::Address(token1), Token::Uint(U256::from(fee))]));
    get_create2_address_from_hash(factory, salt, UniswapV3::POOL_INIT_CODE_HASH)
}

// int24 and int56 are sign-extended to 256 bits, their low 64 bits are the i64 value
fn int_to_i64(value: U256) -> i64 {
    value.low_u64() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observation {
    /// Arithmetic mean tick over the last given seconds
    Twap(u32),

    /// Current tick
    Spot,
}

impl Observation {
    fn new(twap_interval: u32) -> Self {
        match twap_interval {
            0 => Self::Spot,
            x => Self::Twap(x),
        }
    }

    fn call(&self, pool: Address) -> FunctionCall {
        match self {
            Self::Twap(interval) => FunctionCall::new(
                pool,
                "observe(uint32[])",
                &[Token::Array(vec![Token::Uint(U256::from(*interval)), Token::Uint(U256::zero())])],
            ),
            Self::Spot => FunctionCall::new(pool, "slot0()", &[]),
        }
    }

    fn decode_tick(&self, data: &Bytes) -> Result<i32, Error> {
        match self {
            Self::Twap(interval) => {
                let output = [ParamType::Array(Box::new(ParamType::Int(56))), ParamType::Array(Box::new(ParamType::Uint(160)))];
                let cumulatives = abi::decode(&output, data)
                    .map_err(|e| Error::Format(e.to_string()))?
                    .into_iter()
                    .next()
                    .and_then(Token::into_array)
                    .ok_or(Error::Format("invalid observe answer".to_string()))?;

                let ticks = cumulatives
                    .into_iter()
                    .map(|x| x.into_int().map(int_to_i64))
                    .collect::<Option<Vec<i64>>>()
                    .ok_or(Error::Format("invalid tick cumulative".to_string()))?;

                match ticks.as_slice() {
                    [start, end] => average_tick(*start, *end, *interval),
                    _ => Err(Error::Format(format!("observe returned {} tick cumulatives", ticks.len()))),
                }
            },
            Self::Spot => {
                let output = [
                    ParamType::Uint(160),
                    ParamType::Int(24),
                    ParamType::Uint(16),
                    ParamType::Uint(16),
                    ParamType::Uint(16),
                    ParamType::Uint(8),
                    ParamType::Bool,
                ];

                let tick = abi::decode(&output, data)
                    .map_err(|e| Error::Format(e.to_string()))?
                    .into_iter()
                    .nth(1)
                    .and_then(Token::into_int)
                    .map(int_to_i64)
                    .ok_or(Error::Format("invalid slot0 answer".to_string()))?;

                i32::try_from(tick).map_err(|_| Error::Format(format!("tick {} out of range", tick)))
            },
        }
    }
}

/// The calls of one price query and the way to turn their answers into quotes.
///
/// The batch starts with a `decimals()` call per token with unknown decimals (base first),
/// followed by one pool observation per asset. An asset equal to the base token has no pool.
#[derive(Debug)]
pub(crate) struct QuoteBatch {
    base: Address,
    assets: Vec<Address>,
    pools: Vec<Option<Address>>,

    known_decimals: HashMap<Address, u8>,
    missing_decimals: Vec<Address>,

    observation: Observation,
}

impl QuoteBatch {
    pub(crate) fn calls(&self) -> Vec<FunctionCall> {
        let decimals = self.missing_decimals.iter().map(|x| DecimalsResolver::call(*x));
        let observations = self.pools.iter().flatten().map(|x| self.observation.call(*x));

        decimals.chain(observations).collect()
    }

    pub(crate) fn settle(self, results: Vec<Bytes>, resolver: &DecimalsResolver) -> Result<Vec<PriceQuote>, Error> {
        let expected = self.missing_decimals.len() + self.pools.iter().flatten().count();
        if results.len() != expected {
            return Err(Error::Format(format!("batch returned {} results, expected {}", results.len(), expected)));
        }

        let mut results = results.into_iter();

        let mut decimals = self.known_decimals;
        for (token, data) in self.missing_decimals.iter().zip(results.by_ref()) {
            let value = DecimalsResolver::decode(*token, &data)?;
            resolver.insert(*token, value);
            decimals.insert(*token, value);
        }

        let decimals_of = |token: &Address| decimals.get(token).cloned().ok_or(Error::Format(format!("unknown decimals for {:?}", token)));
        let base_decimals = decimals_of(&self.base)?;

        let mut quotes = Vec::with_capacity(self.assets.len());
        for (asset, pool) in self.assets.iter().zip(self.pools.iter()) {
            let asset_decimals = decimals_of(asset)?;
            let amount = one_unit(asset_decimals).ok_or(Error::InvalidPrice(*asset))?;

            let price = match pool {
                None => amount,
                Some(_) => {
                    let data = results.next().ok_or(Error::Format("missing pool observation".to_string()))?;
                    if data.is_empty() {
                        return Err(Error::MissingPool(*asset));
                    }

                    let tick = self.observation.decode_tick(&data)?;
                    quote_at_tick(tick, amount, *asset, self.base)?.ok_or(Error::InvalidPrice(*asset))?
                },
            };

            quotes.push(PriceQuote {
                asset: *asset,
                decimals: asset_decimals,
                base_decimals,
                price,
            });
        }

        Ok(quotes)
    }
}

/// Prices tokens against a base token from the Uniswap V3 pools of a single fee tier.
#[derive(Clone)]
pub struct UniswapV3PriceSource {
    client: Client,
    factory: Address,
    observation: Observation,

    resolver: DecimalsResolver,
}

impl From<UniswapV3PriceSource> for PriceQueryBatcher {
    fn from(value: UniswapV3PriceSource) -> Self {
        Self::UniswapV3(value)
    }
}

impl UniswapV3PriceSource {
    pub fn new(configuration: &UniswapV3PriceSourceConfiguration) -> Result<Self, Error> {
        let client = Client::new(&configuration.ethereum)?;
        let factory = configuration.factory.unwrap_or(UniswapV3::factory(client.chain_id()));

        Ok(Self {
            client,
            factory,
            observation: Observation::new(configuration.twap_interval),

            resolver: DecimalsResolver::new(),
        })
    }

    /// Address of the pool quoting `token` against `base` for the given `fee` tier
    pub fn pool_address(&self, token: Address, base: Address, fee: u32) -> Address {
        pool_address(self.factory, token, base, fee)
    }

    pub(crate) fn plan(&self, assets: &[Address], base: Address, fee: u32) -> QuoteBatch {
        let (known_decimals, missing_decimals) = self.resolver.resolve_from_cache(std::iter::once(&base).chain(assets.iter()));

        let pools = assets
            .iter()
            .map(|asset| (*asset != base).then(|| self.pool_address(*asset, base, fee)))
            .collect();

        QuoteBatch {
            base,
            assets: assets.to_vec(),
            pools,
            known_decimals,
            missing_decimals,
            observation: self.observation,
        }
    }

    /// Fetches the price of every asset in a single multicall.
    #[instrument(name = "uniswap_v3_fetch_all", skip(self, assets), fields(assets = assets.len()))]
    pub async fn fetch_all(&self, assets: &[Address], base: Address, fee: u32) -> Result<Vec<PriceQuote>, Error> {
        let batch = self.plan(assets, base, fee);
        let results = self.client.aggregate(&batch.calls()).await?;

        batch.settle(results, &self.resolver)
    }
}

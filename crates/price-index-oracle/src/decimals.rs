use std::collections::HashMap;
use std::time::Duration;

use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, Bytes};
use price_index_common::cache::ExpirableCache;
use price_index_ethereum::contract::FunctionCall;

use crate::Error;

const DECIMALS_VALIDITY: Duration = Duration::from_secs(24 * 3600);

/// Keeps the decimals of the tokens already seen, so that only unknown tokens need a
/// `decimals()` call in the next batch.
#[derive(Clone)]
pub struct DecimalsResolver {
    cache: ExpirableCache<Address, u8>,
}

impl Default for DecimalsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DecimalsResolver {
    pub fn new() -> Self {
        Self {
            cache: ExpirableCache::new(1024, DECIMALS_VALIDITY),
        }
    }

    /// Splits `tokens` into the known decimals and the tokens still to resolve. The
    /// latter are given once each, in the order of `tokens`.
    pub fn resolve_from_cache<'a>(&self, tokens: impl IntoIterator<Item = &'a Address>) -> (HashMap<Address, u8>, Vec<Address>) {
        let mut known = HashMap::new();
        let mut missing = vec![];

        for token in tokens {
            if known.contains_key(token) || missing.contains(token) {
                continue;
            }

            match self.cache.get(token) {
                Some(decimals) => {
                    known.insert(*token, decimals);
                },
                None => missing.push(*token),
            }
        }

        (known, missing)
    }

    pub fn insert(&self, token: Address, decimals: u8) {
        self.cache.insert(token, decimals);
    }

    pub fn call(token: Address) -> FunctionCall {
        FunctionCall::new(token, "decimals()", &[])
    }

    /// Decodes the answer of a `decimals()` call made on `token`
    pub fn decode(token: Address, data: &Bytes) -> Result<u8, Error> {
        if data.is_empty() {
            return Err(Error::Format(format!("token {:?} has no decimals", token)));
        }

        let value = abi::decode(&[ParamType::Uint(8)], data)
            .map_err(|e| Error::Format(e.to_string()))?
            .into_iter()
            .next()
            .and_then(Token::into_uint)
            .ok_or(Error::Format(format!("invalid decimals for {:?}", token)))?;

        u8::try_from(value).map_err(|_| Error::Format(format!("invalid decimals for {:?}", token)))
    }
}

use std::fmt::Debug;

use async_trait::async_trait;
use ethers_core::types::Address;

use crate::{Error, PriceQuote};

#[async_trait]
pub trait MockPriceSource: 'static + Send + Sync + Debug {
    fn new() -> Self
    where
        Self: Sized;

    async fn fetch_all(&self, _assets: &[Address], _base: Address, _fee: u32) -> Result<Vec<PriceQuote>, Error> {
        unimplemented!()
    }
}

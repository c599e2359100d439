use std::collections::HashSet;

use ethers_core::types::Address;

use crate::constants::FEE_TIERS;
use crate::core::configuration::Configuration;
use crate::core::Error;

pub fn assert_fee_tier(fee: u32) -> Result<(), Error> {
    if !FEE_TIERS.contains(&fee) {
        return Err(Error::Validation(format!("Fee {} is not a Uniswap V3 fee tier, expected one of {:?}", fee, FEE_TIERS)));
    }

    Ok(())
}

pub fn assert_unique_tokens(tokens: &[Address]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for token in tokens {
        if !seen.insert(token) {
            return Err(Error::Validation(format!("Token {:?} is listed more than once", token)));
        }
    }

    Ok(())
}

pub fn assert_configuration(configuration: &Configuration) -> Result<(), Error> {
    assert_fee_tier(configuration.oracle.fee)?;
    assert_unique_tokens(&configuration.tokens())?;

    Ok(())
}

use ethers_core::types::{Address, H160, H256};
use hex_literal::hex;

use crate::ChainID;

/// Contract addresses, identical on every supported network
pub struct Contract;

impl Contract {
    pub const MULTICALL3: Address = H160(hex!("cA11bde05977b3631167028862bE2a173976CA11"));
}

/// Uniswap V3 deployment used to derive pool addresses
pub struct UniswapV3;

impl UniswapV3 {
    pub const POOL_INIT_CODE_HASH: H256 = H256(hex!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54"));

    pub const fn factory(chain_id: &ChainID) -> Address {
        match chain_id {
            ChainID::Sepolia => H160(hex!("0227628f3F023bb0B980b67D528571c95c6DaC1c")),
            ChainID::Mainnet => H160(hex!("1F98431c8aD98523631AE4a59f267346ea31F984")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub decimals: u8,
    pub address: Address,
}

impl Token {
    pub const fn weth(chain_id: &ChainID) -> Token {
        match chain_id {
            ChainID::Sepolia => Token {
                symbol: "WETH",
                decimals: 18,
                address: H160(hex!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14")),
            },
            ChainID::Mainnet => Token {
                symbol: "WETH",
                decimals: 18,
                address: H160(hex!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
            },
        }
    }

    pub const fn usdc(chain_id: &ChainID) -> Token {
        match chain_id {
            ChainID::Sepolia => Token {
                symbol: "USDC",
                decimals: 6,
                address: H160(hex!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238")),
            },
            ChainID::Mainnet => Token {
                symbol: "USDC",
                decimals: 6,
                address: H160(hex!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")),
            },
        }
    }

    pub const fn uni(_chain_id: &ChainID) -> Token {
        Token {
            symbol: "UNI",
            decimals: 18,
            address: H160(hex!("1f9840a85d5aF5bf1D1762F925BDADdC4201F984")),
        }
    }

    pub const USDT: Token = Token {
        symbol: "USDT",
        decimals: 6,
        address: H160(hex!("dAC17F958D2ee523a2206206994597C13D831ec7")),
    };

    pub const WBTC: Token = Token {
        symbol: "WBTC",
        decimals: 8,
        address: H160(hex!("2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599")),
    };

    pub const APE: Token = Token {
        symbol: "APE",
        decimals: 18,
        address: H160(hex!("4d224452801ACEd8B2F0aebE155379bb5D594381")),
    };

    /// Tokens indexed when a profile does not list any
    pub fn default_index(chain_id: &ChainID) -> Vec<Token> {
        match chain_id {
            ChainID::Sepolia => vec![Self::usdc(chain_id), Self::uni(chain_id)],
            ChainID::Mainnet => vec![Self::usdc(chain_id), Self::USDT, Self::uni(chain_id), Self::WBTC, Self::APE],
        }
    }

    /// Looks up a known token by address
    pub fn find(chain_id: &ChainID, address: &Address) -> Option<Token> {
        let mut tokens = Self::default_index(chain_id);
        tokens.push(Self::weth(chain_id));

        tokens.into_iter().find(|x| x.address == *address)
    }
}

pub struct Endpoint;

impl Endpoint {
    pub const fn default_rpc_url(chain_id: &ChainID) -> &'static str {
        match chain_id {
            ChainID::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
            ChainID::Mainnet => "https://ethereum-rpc.publicnode.com",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use ethers_core::types::{Address, H256};

    use crate::constants::{Contract, Token, UniswapV3};
    use crate::ChainID;

    #[test]
    fn const_address_matches_runtime_parsing() {
        let expected = Address::from_str("0xcA11bde05977b3631167028862bE2a173976CA11").unwrap();
        assert_eq!(Contract::MULTICALL3, expected);
    }

    #[test]
    fn factory_and_init_code_hash_match_runtime_parsing() {
        let factory = Address::from_str("0x1F98431c8aD98523631AE4a59f267346ea31F984").unwrap();
        let hash = H256::from_str("0xe34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54").unwrap();

        assert_eq!(UniswapV3::factory(&ChainID::Mainnet), factory);
        assert_eq!(UniswapV3::POOL_INIT_CODE_HASH, hash);
    }

    #[test]
    fn default_mainnet_index_is_ordered() {
        let symbols: Vec<&str> = Token::default_index(&ChainID::Mainnet).iter().map(|x| x.symbol).collect();
        assert_eq!(symbols, vec!["USDC", "USDT", "UNI", "WBTC", "APE"]);
    }

    #[test]
    fn find_known_token() {
        let weth = Token::weth(&ChainID::Mainnet);
        assert_eq!(Token::find(&ChainID::Mainnet, &weth.address), Some(weth));
        assert_eq!(Token::find(&ChainID::Mainnet, &Address::zero()), None);
    }
}

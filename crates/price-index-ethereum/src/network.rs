use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Represent the chain id which is either Sepolia or Mainnet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainID {
    Sepolia,
    Mainnet,
}

impl FromStr for ChainID {
    type Err = Error;

    /// - sepolia -> ChainID::Sepolia
    /// - mainnet, main -> ChainID::Mainnet
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sepolia" => Ok(Self::Sepolia),
            "mainnet" | "main" => Ok(Self::Mainnet),
            _ => Err(Error::Internal(format!("invalid chain {}", s))),
        }
    }
}

impl Display for ChainID {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sepolia => write!(f, "sepolia"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

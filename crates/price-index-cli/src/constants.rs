// Core configuration defaults
pub const DEFAULT_VERBOSITY: &str = "info";
pub const DEFAULT_PROFILE: &str = "price-index.json";

// Ethereum configuration defaults
pub const DEFAULT_CHAIN_ID: &str = "mainnet";
pub const DEFAULT_RPC_TIMEOUT: u64 = 10;

// Oracle configuration defaults
pub const DEFAULT_FEE: u32 = 3000;

/// Fee tiers enabled on the Uniswap V3 factory, in hundredths of a bip
pub const FEE_TIERS: [u32; 4] = [100, 500, 3000, 10000];

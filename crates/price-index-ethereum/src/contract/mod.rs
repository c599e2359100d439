use ethers_core::abi::{self, Token};
use ethers_core::types::{Address, Bytes};
use ethers_core::utils::id;

/// A read-only call to a contract: the target and the ABI encoded calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub to: Address,
    pub data: Bytes,
}

impl FunctionCall {
    /// Encodes a call to the function with the given canonical `signature`, e.g.
    /// `observe(uint32[])`, using `arguments` as its parameters.
    pub fn new(to: Address, signature: &str, arguments: &[Token]) -> Self {
        let mut data = id(signature).to_vec();
        data.extend(abi::encode(arguments));

        Self { to, data: data.into() }
    }

    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|x| x.try_into().ok())
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::abi::Token;
    use ethers_core::types::Address;

    use crate::contract::FunctionCall;

    #[test]
    fn encodes_selector_and_arguments() {
        let holder = Address::repeat_byte(0x22);
        let call = FunctionCall::new(Address::repeat_byte(0x11), "balanceOf(address)", &[Token::Address(holder)]);

        assert_eq!(call.selector(), Some([0x70, 0xa0, 0x82, 0x31]));
        assert_eq!(call.data.len(), 4 + 32);
        assert_eq!(&call.data[16..36], holder.as_bytes());
    }

    #[test]
    fn encodes_call_without_arguments() {
        let call = FunctionCall::new(Address::zero(), "decimals()", &[]);

        assert_eq!(call.selector(), Some([0x31, 0x3c, 0xe5, 0x67]));
        assert_eq!(call.data.len(), 4);
    }
}

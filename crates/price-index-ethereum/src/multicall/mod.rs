use ethers_core::abi::{self, ParamType, Token};
use ethers_core::types::{Address, Bytes};

use crate::contract::FunctionCall;
use crate::{Error, EXECUTION_REVERTED_CODE};

pub const AGGREGATE3_SIGNATURE: &str = "aggregate3((address,bool,bytes)[])";

/// Builds the `aggregate3` call executing every call of `calls` with `allowFailure = false`,
/// so the node reverts the whole batch as soon as one of them reverts.
pub fn encode_aggregate3(multicall: Address, calls: &[FunctionCall]) -> FunctionCall {
    let calls = calls
        .iter()
        .map(|call| Token::Tuple(vec![Token::Address(call.to), Token::Bool(false), Token::Bytes(call.data.to_vec())]))
        .collect();

    FunctionCall::new(multicall, AGGREGATE3_SIGNATURE, &[Token::Array(calls)])
}

/// Decodes the `(bool success, bytes returnData)[]` answer of `aggregate3`. The answer must
/// contain exactly `expected` successful results.
pub fn decode_aggregate3(data: &[u8], expected: usize) -> Result<Vec<Bytes>, Error> {
    let output = ParamType::Array(Box::new(ParamType::Tuple(vec![ParamType::Bool, ParamType::Bytes])));

    let results = abi::decode(&[output], data)?
        .into_iter()
        .next()
        .and_then(Token::into_array)
        .ok_or(Error::Format("aggregate3 answer is not an array".to_string()))?;

    if results.len() != expected {
        return Err(Error::Format(format!("aggregate3 returned {} results, expected {}", results.len(), expected)));
    }

    results.into_iter().enumerate().map(|(index, result)| decode_result(index, result)).collect()
}

fn decode_result(index: usize, result: Token) -> Result<Bytes, Error> {
    let mut fields = result
        .into_tuple()
        .ok_or(Error::Format(format!("aggregate3 result {} is not a tuple", index)))?
        .into_iter();

    match (fields.next().and_then(Token::into_bool), fields.next().and_then(Token::into_bytes)) {
        (Some(true), Some(data)) => Ok(data.into()),
        (Some(false), _) => Err(Error::Rpc {
            code: EXECUTION_REVERTED_CODE,
            message: format!("call {} reverted", index),
        }),
        _ => Err(Error::Format(format!("aggregate3 result {} is malformed", index))),
    }
}

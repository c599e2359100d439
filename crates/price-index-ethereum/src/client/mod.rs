use std::time::Duration;

use ethers_core::types::{Address, Bytes};
use price_index_common::fallback::{BreakerConfiguration, FailurePredicate, WithFallback};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::contract::FunctionCall;
use crate::Error;

const JSONRPC_VERSION: &str = "2.0";
const LATEST_BLOCK: &str = "latest";

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallParameters<'a>, &'static str),
}

#[derive(Serialize)]
struct CallParameters<'a> {
    to: &'a Address,
    data: &'a Bytes,
}

#[derive(Deserialize)]
struct Response {
    result: Option<Bytes>,
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

#[derive(Clone)]
struct EthereumRPCClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl EthereumRPCClient {
    fn new(endpoint: &str, timeout: u64) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint).map_err(|e| Error::URL(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(5))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self { endpoint, client })
    }

    async fn eth_call(&self, call: &FunctionCall) -> Result<Bytes, Error> {
        let request = Request {
            jsonrpc: JSONRPC_VERSION,
            id: 1,
            method: "eth_call",
            params: (CallParameters { to: &call.to, data: &call.data }, LATEST_BLOCK),
        };

        let response = self.client.post(self.endpoint.clone()).json(&request).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let response = serde_json::from_str::<Response>(&text).map_err(|e| Error::Format(e.to_string()))?;
        match (response.result, response.error) {
            (_, Some(error)) => Err(Error::Rpc {
                code: error.code,
                message: error.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::Format(format!("missing result body={}", text))),
        }
    }
}

impl FailurePredicate<Error> for EthereumRPCClient {
    fn is_err(&self, err: &Error) -> bool {
        !err.is_execution_error()
    }
}

/// JSON-RPC client over a primary endpoint and its fallbacks.
#[derive(Clone)]
pub struct EthereumClient(WithFallback<EthereumRPCClient>);

impl EthereumClient {
    pub fn new(endpoint: &str, timeout: u64, breaker: BreakerConfiguration) -> Result<Self, Error> {
        Ok(Self(WithFallback::new(breaker).with(EthereumRPCClient::new(endpoint, timeout)?)))
    }

    pub fn with_fallback(mut self, endpoint: &str, timeout: u64) -> Result<Self, Error> {
        self.0 = self.0.with(EthereumRPCClient::new(endpoint, timeout)?);
        Ok(self)
    }

    #[instrument(name = "eth_call", skip(self, call), fields(to = ?call.to))]
    pub async fn eth_call(&self, call: &FunctionCall) -> Result<Bytes, Error> {
        self.0
            .call(|x| async move { x.eth_call(call).await })
            .await
            .map_err(|e| {
                tracing::warn!("{}", e);
                e.into()
            })
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::types::{Address, Bytes};
    use price_index_common::fallback::BreakerConfiguration;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::EthereumClient;
    use crate::contract::FunctionCall;
    use crate::Error;

    fn call() -> FunctionCall {
        FunctionCall {
            to: Address::repeat_byte(0x11),
            data: Bytes::from(vec![0x31, 0x3c, 0xe5, 0x67]),
        }
    }

    #[tokio::test]
    async fn should_return_call_result() {
        // Given
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_call" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x12" })))
            .mount(&server)
            .await;

        let client = EthereumClient::new(&server.uri(), 5, BreakerConfiguration::default()).unwrap();

        // When
        let result = client.eth_call(&call()).await.unwrap();

        // Then
        assert_eq!(result, Bytes::from(vec![0x12]));
    }

    #[tokio::test]
    async fn should_surface_revert_as_rpc_error() {
        // Given
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": 3, "message": "execution reverted" }
            })))
            .mount(&server)
            .await;

        let client = EthereumClient::new(&server.uri(), 5, BreakerConfiguration::default()).unwrap();

        // When
        let result = client.eth_call(&call()).await;

        // Then
        assert!(matches!(result, Err(Error::Rpc { code: 3, .. })));
    }

    #[tokio::test]
    async fn should_use_fallback_when_primary_fails() {
        // Given
        let primary = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(503)).mount(&primary).await;

        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x" })))
            .mount(&fallback)
            .await;

        let client = EthereumClient::new(&primary.uri(), 5, BreakerConfiguration::default())
            .unwrap()
            .with_fallback(&fallback.uri(), 5)
            .unwrap();

        // When
        let result = client.eth_call(&call()).await.unwrap();

        // Then
        assert_eq!(result, Bytes::new());
    }

    #[tokio::test]
    async fn should_use_fallback_when_primary_is_rate_limited() {
        // Given
        let primary = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32005, "message": "request rate exceeded" }
            })))
            .mount(&primary)
            .await;

        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x12" })))
            .expect(1)
            .mount(&fallback)
            .await;

        let client = EthereumClient::new(&primary.uri(), 5, BreakerConfiguration::default())
            .unwrap()
            .with_fallback(&fallback.uri(), 5)
            .unwrap();

        // When
        let result = client.eth_call(&call()).await.unwrap();

        // Then
        assert_eq!(result, Bytes::from(vec![0x12]));
    }

    #[tokio::test]
    async fn should_not_retry_revert_on_fallback() {
        // Given
        let primary = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32000, "message": "execution reverted" }
            })))
            .mount(&primary)
            .await;

        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": "0x12" })))
            .expect(0)
            .mount(&fallback)
            .await;

        let client = EthereumClient::new(&primary.uri(), 5, BreakerConfiguration::default())
            .unwrap()
            .with_fallback(&fallback.uri(), 5)
            .unwrap();

        // When
        let result = client.eth_call(&call()).await;

        // Then
        assert!(matches!(result, Err(Error::Rpc { code: -32000, .. })));
    }

    #[test]
    fn only_reverts_are_execution_errors() {
        let rpc = |code: i64, message: &str| Error::Rpc {
            code,
            message: message.to_string(),
        };

        assert!(rpc(3, "execution reverted").is_execution_error());
        assert!(rpc(-32000, "Execution reverted: STF").is_execution_error());
        assert!(!rpc(-32000, "header not found").is_execution_error());
        assert!(!rpc(-32005, "request rate exceeded").is_execution_error());
        assert!(!rpc(-32603, "internal error").is_execution_error());
        assert!(!rpc(-32601, "method not found").is_execution_error());
        assert!(!Error::Internal("could not connect to endpoint".to_string()).is_execution_error());
    }

    #[tokio::test]
    async fn should_fail_on_http_error() {
        // Given
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let client = EthereumClient::new(&server.uri(), 5, BreakerConfiguration::default()).unwrap();

        // When
        let result = client.eth_call(&call()).await;

        // Then
        assert!(matches!(result, Err(Error::Status { status: 500, .. })));
    }

    #[test]
    fn should_reject_invalid_url() {
        let result = EthereumClient::new("not a url", 5, BreakerConfiguration::default());
        assert!(matches!(result, Err(Error::URL(_))));
    }
}

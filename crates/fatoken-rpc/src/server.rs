// crates/fatoken-rpc/src/server.rs
//
// RPC server setup: FaRpcServer and RpcConfig.
//
// JSON-RPC over tonic: a single unary service accepts a JSON-encoded
// `{method, params}` envelope, dispatches to the matching handler and
// returns a JSON-encoded `{success, result, error, code}` envelope.

use std::future::Future;

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::transport::Server;
use tonic::Status;

use fatoken_core::error::LedgerError;

use crate::handlers;
use crate::middleware;
use crate::state::LedgerState;

/// Fully-qualified name of the JSON-RPC service. Clients POST envelopes to
/// `/{SERVICE_NAME}/Call`.
pub const SERVICE_NAME: &str = "fatoken.rpc.LedgerService";

/// Error code for params that fail to deserialize.
pub const BAD_REQUEST: &str = "BAD_REQUEST";
/// Error code for a method name the server does not know.
pub const UNKNOWN_METHOD: &str = "UNKNOWN_METHOD";
/// Error code for a response that failed to serialize.
pub const INTERNAL: &str = "INTERNAL";

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50061,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-RPC Envelope
// ---------------------------------------------------------------------------

/// A JSON-RPC-style request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// The RPC method to invoke (e.g., "token/transfer", "query/balance").
    pub method: String,
    /// JSON-encoded parameters for the method.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A JSON-RPC-style response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub success: bool,
    /// The result data (if success).
    pub result: Option<serde_json::Value>,
    /// Error message (if not success).
    pub error: Option<String>,
    /// Machine-readable error code (if not success).
    #[serde(default)]
    pub code: Option<String>,
}

impl JsonRpcResponse {
    fn ok(value: serde_json::Value) -> Self {
        Self {
            success: true,
            result: Some(value),
            error: None,
            code: None,
        }
    }

    fn failure(err: RpcError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(err.message),
            code: Some(err.code),
        }
    }
}

/// A failed call: stable code plus human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

impl RpcError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<LedgerError> for RpcError {
    fn from(err: LedgerError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// FaRpcServer
// ---------------------------------------------------------------------------

/// The ledger's RPC server.
#[derive(Debug, Clone)]
pub struct FaRpcServer {
    config: RpcConfig,
    state: LedgerState,
}

impl FaRpcServer {
    pub fn new(config: RpcConfig, state: LedgerState) -> Self {
        Self { config, state }
    }

    /// Serve until the process is terminated.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn start_with_shutdown<F>(&self, signal: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()>,
    {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("fatoken RPC server starting on {}", addr);

        let service = LedgerServiceImpl {
            state: self.state.clone(),
        };

        Server::builder()
            .accept_http1(true)
            .add_service(tonic::service::interceptor::InterceptedService::new(
                FaJsonRpcServer::new(service),
                middleware::logging_interceptor,
            ))
            .serve_with_shutdown(addr, signal)
            .await?;

        tracing::info!("fatoken RPC server stopped");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Holds shared state and dispatches JSON-RPC calls to handlers.
#[derive(Clone)]
struct LedgerServiceImpl {
    state: LedgerState,
}

impl LedgerServiceImpl {
    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let state = &self.state;
        let params = request.params;

        let result = match request.method.as_str() {
            // Token
            "token/transfer" => {
                dispatch_handler(params, |r| handlers::token::handle_transfer(state, r)).await
            }
            "token/approve" => {
                dispatch_handler(params, |r| handlers::token::handle_approve(state, r)).await
            }

            // Staking
            "staking/stake" => {
                dispatch_handler(params, |r| handlers::staking::handle_stake(state, r)).await
            }
            "staking/unstake" => {
                dispatch_handler(params, |r| handlers::staking::handle_unstake(state, r)).await
            }
            "staking/settle" => {
                dispatch_handler(params, |r| handlers::staking::handle_settle(state, r)).await
            }

            // Queries
            "query/balance" => {
                dispatch_handler(params, |r| handlers::query::handle_get_balance(state, r)).await
            }
            "query/allowance" => {
                dispatch_handler(params, |r| handlers::query::handle_get_allowance(state, r))
                    .await
            }
            "query/account" => {
                dispatch_handler(params, |r| handlers::query::handle_get_account(state, r)).await
            }
            "query/storage" => {
                dispatch_handler(params, |r| handlers::query::handle_get_storage(state, r)).await
            }
            "query/total_supply" => {
                dispatch_handler(params, |r| {
                    handlers::query::handle_get_total_supply(state, r)
                })
                .await
            }

            // Node
            "node/health" => {
                dispatch_handler(params, |r| handlers::node::handle_get_health(state, r)).await
            }

            other => Err(RpcError::new(
                UNKNOWN_METHOD,
                format!("Unknown method: {}", other),
            )),
        };

        match result {
            Ok(value) => JsonRpcResponse::ok(value),
            Err(err) => JsonRpcResponse::failure(err),
        }
    }
}

/// Generic dispatch helper: deserialize params into a request type,
/// call the handler, and serialize the result to JSON.
///
/// Parameterless methods accept `null` or a missing `params` as `{}`.
async fn dispatch_handler<Req, Resp, F, Fut>(
    params: serde_json::Value,
    handler: F,
) -> Result<serde_json::Value, RpcError>
where
    Req: serde::de::DeserializeOwned,
    Resp: serde::Serialize,
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Resp, LedgerError>>,
{
    let params = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params
    };
    let request: Req = serde_json::from_value(params).map_err(|e| {
        RpcError::new(BAD_REQUEST, format!("Failed to deserialize request: {}", e))
    })?;
    let response = handler(request).await?;
    serde_json::to_value(response)
        .map_err(|e| RpcError::new(INTERNAL, format!("Failed to serialize response: {}", e)))
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------
// One gRPC service with one method. Request and response bodies are raw
// JSON bytes, so no proto codegen is needed.

/// The tonic service wrapper: accepts bytes, deserializes as JSON-RPC and
/// dispatches.
#[derive(Clone)]
pub struct FaJsonRpcServer {
    inner: LedgerServiceImpl,
}

impl std::fmt::Debug for FaJsonRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaJsonRpcServer").finish()
    }
}

impl FaJsonRpcServer {
    fn new(inner: LedgerServiceImpl) -> Self {
        Self { inner }
    }
}

impl tonic::server::NamedService for FaJsonRpcServer {
    const NAME: &'static str = SERVICE_NAME;
}

impl<B> tower_service::Service<http::Request<B>> for FaJsonRpcServer
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let body_bytes = match collect_body(req.into_body()).await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!("Failed to read request body: {}", e);
                    let resp = JsonRpcResponse::failure(RpcError::new(
                        BAD_REQUEST,
                        format!("Failed to read request body: {}", e),
                    ));
                    return Ok(build_response(&resp));
                }
            };

            let rpc_request: JsonRpcRequest = match serde_json::from_slice(&body_bytes) {
                Ok(r) => r,
                Err(e) => {
                    let resp = JsonRpcResponse::failure(RpcError::new(
                        BAD_REQUEST,
                        format!("Invalid JSON-RPC request: {}", e),
                    ));
                    return Ok(build_response(&resp));
                }
            };

            let rpc_response = inner.dispatch(rpc_request).await;
            Ok(build_response(&rpc_response))
        })
    }
}

/// Collect the body of an HTTP request into bytes.
async fn collect_body<B>(body: B) -> Result<Vec<u8>, String>
where
    B: HttpBody + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B::Data: Send,
{
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    loop {
        match std::future::poll_fn(|cx| HttpBody::poll_frame(body.as_mut(), cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    use bytes::Buf;
                    collected.extend_from_slice(data.chunk());
                }
            }
            Some(Err(e)) => return Err(e.into().to_string()),
            None => break,
        }
    }

    Ok(collected)
}

/// Build an HTTP response carrying the JSON-encoded envelope.
fn build_response(envelope: &JsonRpcResponse) -> http::Response<tonic::body::BoxBody> {
    let json = serde_json::to_vec(envelope).unwrap_or_default();
    let body = tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    );

    let mut response = http::Response::new(body);
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use fatoken_core::identity::Address;
    use fatoken_core::time::Timestamp;
    use fatoken_core::traits::ManualClock;
    use fatoken_ledger::{GenesisConfig, Ledger};

    fn service(clock: ManualClock) -> LedgerServiceImpl {
        service_with(GenesisConfig::new(Address::new("alice").unwrap()), clock)
    }

    fn service_with(genesis: GenesisConfig, clock: ManualClock) -> LedgerServiceImpl {
        let ledger = Ledger::genesis(genesis).unwrap();
        LedgerServiceImpl {
            state: LedgerState::new(ledger, Arc::new(clock)),
        }
    }

    fn call(method: &str, params: serde_json::Value) -> JsonRpcRequest {
        JsonRpcRequest {
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_transfer_then_balance() {
        let svc = service(ManualClock::new(Timestamp::new(0)));
        let resp = svc
            .dispatch(call(
                "token/transfer",
                json!({"caller": "alice", "from": "alice", "to": "bob", "amount": 100}),
            ))
            .await;
        assert!(resp.success, "{:?}", resp.error);

        let resp = svc
            .dispatch(call("query/balance", json!({"address": "bob"})))
            .await;
        assert!(resp.success);
        assert_eq!(resp.result.unwrap()["balance"], json!(100));
    }

    #[tokio::test]
    async fn test_ledger_error_carries_code() {
        let svc = service(ManualClock::new(Timestamp::new(0)));
        let resp = svc
            .dispatch(call(
                "token/transfer",
                json!({"caller": "bob", "from": "alice", "to": "bob", "amount": 1}),
            ))
            .await;
        assert!(!resp.success);
        assert_eq!(resp.code.as_deref(), Some("UNAUTHORIZED"));
        assert_eq!(resp.error.as_deref(), Some("Not permitted"));
    }

    #[tokio::test]
    async fn test_bad_params_and_unknown_method() {
        let svc = service(ManualClock::new(Timestamp::new(0)));

        let resp = svc
            .dispatch(call("staking/stake", json!({"caller": "", "amount": 1})))
            .await;
        assert_eq!(resp.code.as_deref(), Some(BAD_REQUEST));

        let resp = svc.dispatch(call("staking/slash", json!({}))).await;
        assert_eq!(resp.code.as_deref(), Some(UNKNOWN_METHOD));
    }

    #[tokio::test]
    async fn test_parameterless_methods_accept_null() {
        let svc = service(ManualClock::new(Timestamp::new(0)));
        for method in ["query/storage", "query/total_supply", "node/health"] {
            let resp = svc.dispatch(call(method, serde_json::Value::Null)).await;
            assert!(resp.success, "{} failed: {:?}", method, resp.error);
        }
    }

    #[tokio::test]
    async fn test_stake_and_settle_over_rpc() {
        let clock = ManualClock::new(Timestamp::new(100));
        let svc = service(clock.clone());

        let resp = svc
            .dispatch(call("staking/stake", json!({"caller": "alice", "amount": 500})))
            .await;
        assert!(resp.success);

        clock.advance(2);
        let resp = svc
            .dispatch(call("staking/settle", json!({"caller": "alice"})))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["receipt"]["reward_realized"], json!(2_000_000));
        assert_eq!(result["staked"], json!(500));
    }

    #[tokio::test]
    async fn test_amounts_above_u64_survive_the_envelope() {
        let clock = ManualClock::new(Timestamp::new(0));
        let genesis = GenesisConfig::new(Address::new("alice").unwrap())
            .with_reward_rate(u64::MAX.into());
        let svc = service_with(genesis, clock.clone());

        let resp = svc
            .dispatch(call("staking/stake", json!({"caller": "alice", "amount": 1})))
            .await;
        assert!(resp.success, "{:?}", resp.error);

        clock.advance(2);
        let resp = svc
            .dispatch(call("staking/settle", json!({"caller": "alice"})))
            .await;
        assert!(resp.success, "{:?}", resp.error);
        let expected = 999 + 2 * u128::from(u64::MAX);
        let position: handlers::staking::PositionResponse =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(position.balance, expected);
        assert_eq!(position.receipt.reward_realized, 2 * u128::from(u64::MAX));

        let resp = svc.dispatch(call("query/storage", json!({}))).await;
        assert!(resp.success, "{:?}", resp.error);
        let storage: fatoken_ledger::StorageSnapshot =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(storage.total_supply, 1_000 + 2 * u128::from(u64::MAX));

        let resp = svc.dispatch(call("query/total_supply", json!({}))).await;
        assert!(resp.success, "{:?}", resp.error);
        assert_eq!(
            resp.result.unwrap()["rewards_issued"].to_string(),
            "36893488147419103230"
        );

        // Full-width amounts are accepted on the way in too.
        let resp = svc
            .dispatch(call(
                "token/transfer",
                json!({
                    "caller": "alice",
                    "from": "alice",
                    "to": "bob",
                    "amount": serde_json::to_value(expected).unwrap(),
                }),
            ))
            .await;
        assert!(resp.success, "{:?}", resp.error);
        let resp = svc
            .dispatch(call("query/balance", json!({"address": "bob"})))
            .await;
        assert_eq!(resp.result.unwrap()["balance"].to_string(), expected.to_string());
    }

    #[test]
    fn test_envelope_code_defaults_to_none() {
        let resp: JsonRpcResponse =
            serde_json::from_str(r#"{"success":true,"result":1,"error":null}"#).unwrap();
        assert!(resp.code.is_none());
    }
}

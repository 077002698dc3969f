// crates/fatoken-cli/src/rpc_client.rs
//
// Lightweight JSON-RPC client that POSTs envelopes to the fatoken daemon.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use fatoken_rpc::{JsonRpcRequest, JsonRpcResponse, SERVICE_NAME};

/// Failures surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} ({code})")]
    Rpc { code: String, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response for {0} carried no result")]
    EmptyResult(String),

    #[error("No caller given; pass --caller <ADDRESS>")]
    MissingCaller,
}

/// Client bound to one daemon endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    endpoint: String,
    http: reqwest::Client,
}

impl RpcClient {
    /// `base` is the daemon URL, e.g. `http://127.0.0.1:50061`.
    pub fn new(base: &str) -> Self {
        Self {
            endpoint: call_url(base),
            http: reqwest::Client::new(),
        }
    }

    /// Send `params` to `method` and decode the result.
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, CliError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request = JsonRpcRequest {
            method: method.to_string(),
            params: serde_json::to_value(params)?,
        };

        let resp = self.http.post(&self.endpoint).json(&request).send().await?;
        let rpc_response: JsonRpcResponse = resp.json().await?;
        decode(method, rpc_response)
    }
}

fn call_url(base: &str) -> String {
    format!("{}/{}/Call", base.trim_end_matches('/'), SERVICE_NAME)
}

/// Turn an envelope into either the typed result or a `CliError::Rpc`.
fn decode<R: DeserializeOwned>(method: &str, response: JsonRpcResponse) -> Result<R, CliError> {
    if !response.success {
        return Err(CliError::Rpc {
            code: response.code.unwrap_or_else(|| "UNKNOWN".to_string()),
            message: response.error.unwrap_or_default(),
        });
    }
    let value = response
        .result
        .ok_or_else(|| CliError::EmptyResult(method.to_string()))?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_url() {
        assert_eq!(
            call_url("http://127.0.0.1:50061/"),
            "http://127.0.0.1:50061/fatoken.rpc.LedgerService/Call"
        );
    }

    #[test]
    fn test_decode_error_envelope() {
        let resp = JsonRpcResponse {
            success: false,
            result: None,
            error: Some("Not permitted".to_string()),
            code: Some("UNAUTHORIZED".to_string()),
        };
        let err = decode::<serde_json::Value>("token/transfer", resp).unwrap_err();
        assert_eq!(err.to_string(), "Not permitted (UNAUTHORIZED)");
    }

    #[test]
    fn test_decode_success() {
        let resp = JsonRpcResponse {
            success: true,
            result: Some(json!({"a": 1})),
            error: None,
            code: None,
        };
        let value: serde_json::Value = decode("query/storage", resp).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_decode_full_width_amount() {
        let body = r#"{"success":true,"result":{"balance":340282366920938463463374607431768211455},"error":null,"code":null}"#;
        let resp: JsonRpcResponse = serde_json::from_str(body).unwrap();
        let value: serde_json::Value = decode("query/balance", resp).unwrap();
        let balance: u128 = serde_json::from_value(value["balance"].clone()).unwrap();
        assert_eq!(balance, u128::MAX);
    }

    #[test]
    fn test_decode_missing_result() {
        let resp = JsonRpcResponse {
            success: true,
            result: None,
            error: None,
            code: None,
        };
        assert!(matches!(
            decode::<serde_json::Value>("node/health", resp),
            Err(CliError::EmptyResult(_))
        ));
    }
}

//! Eligibility oracle client.
//!
//! The claim API speaks JSON-RPC over HTTPS POST and is the source of truth
//! for what an address may claim. One request per account, no retries.

use std::time::Duration;

use alloy_primitives::B256;
use async_trait::async_trait;
use lsk_claim_types::{EligibilityRecord, MultisigMembership};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::MigrationError;

pub const CHECK_ELIGIBILITY: &str = "checkEligibility";

/// Answers "what may this source address claim".
#[async_trait]
pub trait EligibilityOracle: Send + Sync {
    async fn check_eligibility(
        &self,
        source_address: &str,
    ) -> Result<EligibilityRecord, MigrationError>;
}

/// HTTP JSON-RPC client for the claim API of one network.
pub struct JsonRpcOracle {
    endpoint: String,
    client: reqwest::Client,
}

impl JsonRpcOracle {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EligibilityOracle for JsonRpcOracle {
    async fn check_eligibility(
        &self,
        source_address: &str,
    ) -> Result<EligibilityRecord, MigrationError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": "2",
            "method": CHECK_ELIGIBILITY,
            "params": { "lskAddress": source_address },
        });
        debug!(endpoint = %self.endpoint, %source_address, "querying eligibility");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MigrationError::OracleUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MigrationError::OracleUnavailable(e.to_string()))?;

        if !status.is_success() {
            // Keep the oracle's own explanation when it sent one.
            return Err(match rpc_error_message(&body) {
                Some(message) => MigrationError::OracleUnavailable(format!(
                    "claim API returned HTTP {status}: {message}"
                )),
                None => MigrationError::OracleUnavailable(format!(
                    "claim API returned HTTP {status}"
                )),
            });
        }
        parse_eligibility_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EligibilityResult {
    account: Option<AccountEntry>,
    #[serde(default)]
    multisig_accounts: Vec<MultisigMembership>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountEntry {
    balance_beddows: Value,
    hash: String,
    #[serde(default)]
    proof: Vec<String>,
}

/// Decode a raw JSON-RPC response body into an [`EligibilityRecord`].
pub fn parse_eligibility_response(body: &str) -> Result<EligibilityRecord, MigrationError> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|e| protocol(format!("undecodable response: {e}")))?;

    if let Some(error) = response.error {
        return Err(match error.code {
            Some(code) => protocol(format!("{} (code {code})", error.message)),
            None => protocol(error.message),
        });
    }

    let result = response
        .result
        .ok_or_else(|| protocol("response has neither result nor error".to_string()))?;
    let result: EligibilityResult = serde_json::from_value(result)
        .map_err(|e| protocol(format!("unexpected result shape: {e}")))?;

    let Some(account) = result.account else {
        return Ok(EligibilityRecord::not_eligible(result.multisig_accounts));
    };

    let balance = parse_balance(&account.balance_beddows)?;
    let signing_hash = parse_b256(&account.hash)?;
    let membership_proof = account
        .proof
        .iter()
        .map(String::as_str)
        .map(parse_b256)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EligibilityRecord {
        is_eligible: true,
        balance,
        signing_hash,
        membership_proof,
        multisig_memberships: result.multisig_accounts,
    })
}

fn rpc_error_message(body: &str) -> Option<String> {
    let response: RpcResponse = serde_json::from_str(body).ok()?;
    response.error.map(|e| e.message).filter(|m| !m.is_empty())
}

fn protocol(message: String) -> MigrationError {
    MigrationError::OracleProtocolError(message)
}

/// Beddows arrive as a decimal string; plain JSON numbers are tolerated.
fn parse_balance(value: &Value) -> Result<u64, MigrationError> {
    match value {
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|e| protocol(format!("invalid balanceBeddows `{s}`: {e}"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| protocol(format!("invalid balanceBeddows `{n}`"))),
        other => Err(protocol(format!("invalid balanceBeddows `{other}`"))),
    }
}

fn parse_b256(text: &str) -> Result<B256, MigrationError> {
    let raw = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(raw).map_err(|e| protocol(format!("invalid hex `{text}`: {e}")))?;
    if bytes.len() != 32 {
        return Err(protocol(format!(
            "expected 32-byte value, got {} bytes in `{text}`",
            bytes.len()
        )));
    }
    Ok(B256::from_slice(&bytes))
}

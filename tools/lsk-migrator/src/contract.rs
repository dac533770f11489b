//! `ClaimContract` backed by an EVM JSON-RPC endpoint through `ethers`.

use std::{sync::Arc, time::Duration};

use alloy_primitives::B256;
use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    abi::Abi,
    contract::{Contract, ContractCall, ContractError},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, PendingTransaction, Provider, ProviderError},
    signers::{LocalWallet, Signer},
    types::{Address as EthAddress, TransactionReceipt, H256, U64},
};
use lsk_claim_types::{ClaimArgs, CLAIM_REGULAR_ACCOUNT};
use tokio::time::error::Elapsed;
use tracing::{info, warn};

use crate::{
    config::{NetworkConfig, SecretKeyText},
    error::MigrationError,
    submitter::{ClaimContract, ReceiptStatus},
};

const L2_CLAIM_ABI: &str = include_str!("../abi/L2Claim.json");

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Claim contract client funded and signed by the operator's sender key.
pub struct EthersClaimContract {
    contract: Contract<SignerClient>,
    client: Arc<SignerClient>,
    confirmations: usize,
}

impl EthersClaimContract {
    /// Connect to `network.rpc_url` and bind the claim contract.
    ///
    /// The chain id is taken from the network config, or asked from the node once.
    pub async fn connect(
        network: &NetworkConfig,
        sender_key: &SecretKeyText,
        http_timeout: Duration,
    ) -> Result<Self> {
        let url = reqwest::Url::parse(&network.rpc_url)
            .with_context(|| format!("invalid rpc url for network `{}`", network.name))?;
        let http = reqwest::Client::builder()
            .timeout(http_timeout)
            .build()
            .context("failed building HTTP client")?;
        let provider = Provider::new(Http::new_with_client(url, http));

        let chain_id = match network.chain_id {
            Some(id) => id,
            None => provider
                .get_chainid()
                .await
                .context("failed querying chain id from rpc endpoint")?
                .as_u64(),
        };

        let wallet = sender_key
            .expose()
            .parse::<LocalWallet>()
            .map_err(|_| anyhow::anyhow!("invalid sender private key"))?
            .with_chain_id(chain_id);
        let sender = wallet.address();

        match provider.get_balance(sender, None).await {
            Ok(balance) if balance.is_zero() => {
                warn!(?sender, "sender has no balance; claim transactions will fail")
            }
            Ok(balance) => info!(?sender, %balance, chain_id, "destination sender ready"),
            Err(e) => warn!(?sender, error = %e, "could not read sender balance"),
        }

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let abi: Abi = serde_json::from_str(L2_CLAIM_ABI).context("failed parsing claim ABI")?;
        let contract = Contract::new(
            EthAddress::from(network.contract_address.into_array()),
            abi,
            client.clone(),
        );

        Ok(Self {
            contract,
            client,
            confirmations: 1,
        })
    }

    fn claim_call(&self, args: &ClaimArgs) -> Result<ContractCall<SignerClient, ()>, MigrationError> {
        let proof: Vec<H256> = args.proof.iter().map(|node| H256::from(node.0)).collect();
        let signature = (H256::from(args.signature.r.0), H256::from(args.signature.s.0));
        self.contract
            .method::<_, ()>(
                CLAIM_REGULAR_ACCOUNT,
                (
                    proof,
                    H256::from(args.public_key.0),
                    args.amount,
                    EthAddress::from(args.recipient.into_array()),
                    signature,
                ),
            )
            .map_err(|e| MigrationError::SimulationReverted(format!("failed encoding call: {e}")))
    }
}

/// Prefer the decoded `Error(string)` reason; fall back to whatever the node said.
fn revert_reason(err: &ContractError<SignerClient>) -> String {
    err.decode_revert::<String>().unwrap_or_else(|| err.to_string())
}

#[async_trait]
impl ClaimContract for EthersClaimContract {
    async fn simulate(&self, args: &ClaimArgs) -> Result<(), MigrationError> {
        let call = self.claim_call(args)?;
        call.call()
            .await
            .map_err(|e| MigrationError::SimulationReverted(revert_reason(&e)))
    }

    async fn broadcast(&self, args: &ClaimArgs) -> Result<B256, MigrationError> {
        let call = self.claim_call(args)?;
        let pending = call
            .send()
            .await
            .map_err(|e| MigrationError::BroadcastFailed(e.to_string()))?;
        Ok(B256::from(pending.tx_hash().0))
    }

    async fn await_receipt(
        &self,
        tx_hash: B256,
        timeout: Duration,
    ) -> Result<ReceiptStatus, MigrationError> {
        let pending = PendingTransaction::new(H256::from(tx_hash.0), self.client.provider())
            .confirmations(self.confirmations);

        let waited = tokio::time::timeout(timeout, pending).await;
        receipt_outcome(tx_hash, timeout, waited)
    }
}

/// Map one bounded wait for a receipt onto the claim outcome.
///
/// Anything short of a mined receipt is a timeout: the transaction may still land.
fn receipt_outcome(
    tx_hash: B256,
    timeout: Duration,
    waited: Result<Result<Option<TransactionReceipt>, ProviderError>, Elapsed>,
) -> Result<ReceiptStatus, MigrationError> {
    let receipt = match waited {
        Err(_) => {
            return Err(MigrationError::ConfirmationTimeout {
                tx_hash,
                reason: format!("no receipt within {}s", timeout.as_secs()),
            })
        }
        Ok(Err(e)) => {
            return Err(MigrationError::ConfirmationTimeout {
                tx_hash,
                reason: e.to_string(),
            })
        }
        Ok(Ok(None)) => {
            return Err(MigrationError::ConfirmationTimeout {
                tx_hash,
                reason: "transaction dropped from the mempool".to_string(),
            })
        }
        Ok(Ok(Some(receipt))) => receipt,
    };

    if receipt.status == Some(U64::from(1)) {
        Ok(ReceiptStatus::Success)
    } else {
        Ok(ReceiptStatus::Reverted)
    }
}

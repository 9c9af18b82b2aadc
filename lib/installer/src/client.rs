//! Chain access: transaction submission and confirmation.

use alloy::{
    contract::Error as ContractError,
    network::{EthereumWallet, ReceiptResponse},
    primitives::{Address, Bytes, Log, TxHash},
    providers::{
        DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder,
    },
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    sol_types::decode_revert_reason,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
    abi::{ModularProxy, ProxyFactory},
    salt::Salt,
};

/// EIP-1193 error code for a signature request the user declined.
const USER_REJECTED_REQUEST: i64 = 4001;

/// A single chain interaction that failed.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ChainFailure {
    /// The wallet declined to sign.
    #[error("wallet rejected the signature request")]
    Rejected,
    /// The transaction never made it onto the wire.
    #[error("transaction broadcast failed: {0}")]
    Submission(String),
    /// The receipt never arrived.
    #[error("transaction {tx} was not confirmed: {reason}")]
    Confirmation {
        /// Hash of the unconfirmed transaction.
        tx: TxHash,
        /// Why the wait ended.
        reason: String,
    },
    /// The call reverted, either at submission or once mined.
    #[error("contract reverted: {}", .reason.as_deref().unwrap_or("no reason returned"))]
    Reverted {
        /// Decoded revert reason, when the chain returned one.
        reason: Option<String>,
    },
}

/// The slice of a transaction receipt this crate needs: the hash, the
/// success flag, and the emitted logs. Produced once per confirmed
/// transaction and consumed by event extraction.
#[derive(Clone, Debug)]
pub struct Confirmation {
    /// Hash of the confirmed transaction.
    pub tx_hash: TxHash,
    /// Whether the transaction succeeded on-chain.
    pub status: bool,
    /// Emitted logs, in log order.
    pub logs: Vec<Log>,
}

impl Confirmation {
    /// Distills a full RPC receipt down to the fields callers consume.
    #[must_use]
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            status: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        }
    }
}

/// The seam between orchestration and the chain.
///
/// The two submit methods broadcast a write call and return immediately
/// with the pending transaction hash; [`ProxyChain::confirm`] suspends
/// until the transaction is included.
#[async_trait]
pub trait ProxyChain {
    /// Submits the factory's deploy call.
    ///
    /// # Errors
    ///
    /// Fails if the wallet rejects the signature or the broadcast fails.
    async fn submit_deploy(
        &self,
        factory: Address,
        implementation: Address,
        data: Bytes,
        salt: Salt,
    ) -> Result<TxHash, ChainFailure>;

    /// Submits the proxy's `installModule` call.
    ///
    /// # Errors
    ///
    /// Fails if the wallet rejects the signature or the broadcast fails.
    async fn submit_install(
        &self,
        proxy: Address,
        module: Address,
        data: Bytes,
    ) -> Result<TxHash, ChainFailure>;

    /// Waits for `tx` to be included and returns its confirmation.
    ///
    /// # Errors
    ///
    /// Fails if the receipt never arrives or the transaction reverted.
    async fn confirm(&self, tx: TxHash) -> Result<Confirmation, ChainFailure>;
}

/// [`ProxyChain`] over HTTP RPC: a wallet-filled provider for writes and a
/// read-only provider for confirmation waits.
pub struct AlloyChain {
    writer: DynProvider,
    reader: DynProvider,
}

impl AlloyChain {
    /// Connects both providers to a single RPC endpoint, signing writes
    /// with `signer`.
    #[must_use]
    pub fn connect(rpc_url: Url, signer: PrivateKeySigner) -> Self {
        let writer = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url.clone())
            .erased();
        let reader = ProviderBuilder::new().connect_http(rpc_url).erased();
        Self { writer, reader }
    }

    /// Builds the client from explicit providers. `writer` must be able to
    /// sign and send transactions; `reader` only ever polls for receipts.
    #[must_use]
    pub fn new(writer: DynProvider, reader: DynProvider) -> Self {
        Self { writer, reader }
    }
}

#[async_trait]
impl ProxyChain for AlloyChain {
    async fn submit_deploy(
        &self,
        factory: Address,
        implementation: Address,
        data: Bytes,
        salt: Salt,
    ) -> Result<TxHash, ChainFailure> {
        let factory = ProxyFactory::new(factory, self.writer.clone());
        let pending = factory
            .deployProxyByImplementation(implementation, data, salt.into())
            .send()
            .await
            .map_err(|e| classify(&e))?;
        let tx = *pending.tx_hash();
        debug!(%tx, "deploy transaction broadcast");
        Ok(tx)
    }

    async fn submit_install(
        &self,
        proxy: Address,
        module: Address,
        data: Bytes,
    ) -> Result<TxHash, ChainFailure> {
        let proxy = ModularProxy::new(proxy, self.writer.clone());
        let pending = proxy
            .installModule(module, data)
            .send()
            .await
            .map_err(|e| classify(&e))?;
        let tx = *pending.tx_hash();
        debug!(%tx, "install transaction broadcast");
        Ok(tx)
    }

    async fn confirm(&self, tx: TxHash) -> Result<Confirmation, ChainFailure> {
        let pending =
            PendingTransactionBuilder::new(self.reader.root().clone(), tx);
        let receipt = pending.get_receipt().await.map_err(|e| {
            ChainFailure::Confirmation { tx, reason: e.to_string() }
        })?;
        let confirmation = Confirmation::from_receipt(&receipt);
        debug!(%tx, status = confirmation.status, logs = confirmation.logs.len(), "transaction confirmed");
        if confirmation.status {
            Ok(confirmation)
        } else {
            // Mined receipts carry no revert payload, only the flag.
            Err(ChainFailure::Reverted { reason: None })
        }
    }
}

/// Maps an `alloy` contract error onto the failure taxonomy.
fn classify(err: &ContractError) -> ChainFailure {
    if let ContractError::TransportError(transport) = err {
        if let Some(payload) = transport.as_error_resp() {
            if payload.code == USER_REJECTED_REQUEST {
                return ChainFailure::Rejected;
            }
            if let Some(data) = payload.data.as_ref() {
                let hex = data.get().trim_matches('"');
                if let Ok(bytes) = alloy::hex::decode(hex) {
                    return ChainFailure::Reverted {
                        reason: decode_revert_reason(&bytes),
                    };
                }
            }
            return ChainFailure::Submission(payload.message.to_string());
        }
    }
    ChainFailure::Submission(err.to_string())
}

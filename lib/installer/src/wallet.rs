//! Wallet connection state.
//!
//! The orchestration consumes a wallet capability, it does not implement
//! one: connectors are enumerated, one of them is connected, and the
//! resulting account state (status, addresses, chain id) is rendered by
//! the front-end. [`LocalWallet`] is the single provided implementation,
//! backed by an in-process key.

use std::fmt;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use async_trait::async_trait;

/// An externally supplied connector capability: a stable id plus a
/// human-readable name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connector {
    /// Unique connector id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Connection lifecycle of the active account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No connector is active.
    NotConnected,
    /// A connect call is in flight.
    Connecting,
    /// A connector is active and an address is available.
    Connected,
    /// A previously active connector is re-establishing itself.
    Reconnecting,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotConnected => "not-connected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(label)
    }
}

/// Snapshot of the account as the presentation layer renders it.
#[derive(Clone, Debug)]
pub struct AccountState {
    /// Current connection status.
    pub status: ConnectionStatus,
    /// Addresses exposed by the connected wallet; empty when disconnected.
    pub addresses: Vec<Address>,
    /// Chain id the wallet is connected to, when known.
    pub chain_id: Option<u64>,
}

impl AccountState {
    fn disconnected() -> Self {
        Self {
            status: ConnectionStatus::NotConnected,
            addresses: Vec::new(),
            chain_id: None,
        }
    }
}

/// Connecting failed.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The requested connector id is not in the enumerated list.
    #[error("unknown connector id: {0}")]
    UnknownConnector(String),
}

/// Externally supplied wallet capability consumed by the front-end.
#[async_trait]
pub trait WalletConnection {
    /// The connectors this wallet offers.
    fn connectors(&self) -> &[Connector];

    /// Activates the connector with the given id.
    ///
    /// # Errors
    ///
    /// Fails if `connector_id` does not name an enumerated connector.
    async fn connect(
        &mut self,
        connector_id: &str,
    ) -> Result<AccountState, ConnectError>;

    /// Deactivates the current connector, if any.
    fn disconnect(&mut self);

    /// The current account snapshot.
    fn account(&self) -> AccountState;
}

/// Wallet backed by a single in-process private key, exposed through one
/// connector. Mirrors how a browser wallet surfaces itself without being
/// one.
pub struct LocalWallet {
    signer: PrivateKeySigner,
    chain_id: u64,
    connectors: Vec<Connector>,
    status: ConnectionStatus,
}

impl LocalWallet {
    /// Connector id of the single local-key connector.
    pub const CONNECTOR_ID: &'static str = "local-key";

    /// Wraps `signer` as a wallet for the given chain.
    #[must_use]
    pub fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        Self {
            signer,
            chain_id,
            connectors: vec![Connector {
                id: Self::CONNECTOR_ID.to_owned(),
                name: "Local key".to_owned(),
            }],
            status: ConnectionStatus::NotConnected,
        }
    }

    /// The wrapped signer, for building a chain client.
    #[must_use]
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// The signer's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl WalletConnection for LocalWallet {
    fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    async fn connect(
        &mut self,
        connector_id: &str,
    ) -> Result<AccountState, ConnectError> {
        if connector_id != Self::CONNECTOR_ID {
            return Err(ConnectError::UnknownConnector(
                connector_id.to_owned(),
            ));
        }
        self.status = ConnectionStatus::Connected;
        Ok(self.account())
    }

    fn disconnect(&mut self) {
        self.status = ConnectionStatus::NotConnected;
    }

    fn account(&self) -> AccountState {
        match self.status {
            ConnectionStatus::Connected => AccountState {
                status: ConnectionStatus::Connected,
                addresses: vec![self.signer.address()],
                chain_id: Some(self.chain_id),
            },
            _ => AccountState::disconnected(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::signers::local::PrivateKeySigner;

    use super::{ConnectionStatus, LocalWallet, WalletConnection};

    fn wallet() -> LocalWallet {
        LocalWallet::new(PrivateKeySigner::random(), 11_155_420)
    }

    #[tokio::test]
    async fn connect_exposes_address_and_chain_id() {
        let mut wallet = wallet();
        let expected = wallet.address();

        let account =
            wallet.connect(LocalWallet::CONNECTOR_ID).await.unwrap();

        assert_eq!(account.status, ConnectionStatus::Connected);
        assert_eq!(account.addresses, vec![expected]);
        assert_eq!(account.chain_id, Some(11_155_420));
    }

    #[tokio::test]
    async fn unknown_connector_is_rejected() {
        let mut wallet = wallet();
        let err = wallet.connect("injected").await.unwrap_err();
        assert!(err.to_string().contains("injected"));
        assert_eq!(
            wallet.account().status,
            ConnectionStatus::NotConnected
        );
    }

    #[tokio::test]
    async fn disconnect_clears_the_account() {
        let mut wallet = wallet();
        wallet.connect(LocalWallet::CONNECTOR_ID).await.unwrap();
        wallet.disconnect();

        let account = wallet.account();
        assert_eq!(account.status, ConnectionStatus::NotConnected);
        assert!(account.addresses.is_empty());
        assert_eq!(account.chain_id, None);
    }
}

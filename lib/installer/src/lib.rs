/*!
Deploys a proxy contract through a factory and installs a module on it.

The workflow is a fixed two-step sequence: submit the factory's deploy
call, wait for its receipt, read the deployed proxy address out of the
`ProxyDeployed` event, then submit the proxy's `installModule` call and
wait for that receipt too. [`Orchestrator`] drives the sequence over any
[`ProxyChain`] implementation; [`AlloyChain`] is the HTTP-RPC-backed one.
*/

pub mod abi;
mod client;
mod config;
mod orchestrator;
mod salt;
mod wallet;

pub use client::{AlloyChain, ChainFailure, Confirmation, ProxyChain};
pub use config::{InstallConfig, OP_SEPOLIA_CHAIN_ID, RPC_URL_ENV_VAR};
pub use orchestrator::{
    extract_proxy, FailureKind, InstallOutcome, Orchestrator, Stage,
    StageFailure, Status,
};
pub use salt::Salt;
pub use wallet::{
    AccountState, ConnectError, ConnectionStatus, Connector, LocalWallet,
    WalletConnection,
};

//! The two-step transaction orchestration.

use std::fmt;

use alloy::{
    primitives::{Address, Log},
    sol_types::SolEvent,
};
use tracing::{info, warn};

use crate::{
    abi::ProxyFactory,
    client::{ChainFailure, Confirmation, ProxyChain},
    config::InstallConfig,
};

/// The stages of a run, in execution order. Failures carry the stage they
/// happened at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Submitting the factory deploy call.
    Deploy,
    /// Waiting for the deploy receipt.
    ConfirmDeploy,
    /// Reading the proxy address out of the deploy logs.
    Extract,
    /// Submitting the install call.
    Install,
    /// Waiting for the install receipt.
    ConfirmInstall,
}

impl Stage {
    /// The stage's stable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::ConfirmDeploy => "confirmDeploy",
            Self::Extract => "extract",
            Self::Install => "install",
            Self::ConfirmInstall => "confirmInstall",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What went wrong, independent of the stage it went wrong at.
#[derive(Debug, thiserror::Error)]
pub enum FailureKind {
    /// The wallet declined to sign; recoverable, never retried here.
    #[error("wallet rejected the signature request")]
    UserRejection,
    /// The transaction could not be broadcast.
    #[error("transaction broadcast failed: {0}")]
    Submission(String),
    /// The confirmation wait ended without a usable receipt.
    #[error("transaction confirmation failed: {0}")]
    Confirmation(String),
    /// The deploy receipt contained no `ProxyDeployed` log. A hard stop:
    /// without the event there is no valid install target.
    #[error("no ProxyDeployed event found in the deploy receipt")]
    EventNotFound,
    /// A call reverted on-chain.
    #[error("contract reverted: {}", .reason.as_deref().unwrap_or("no reason returned"))]
    ContractRevert {
        /// Decoded revert reason, when available.
        reason: Option<String>,
    },
}

impl From<ChainFailure> for FailureKind {
    fn from(failure: ChainFailure) -> Self {
        match failure {
            ChainFailure::Rejected => Self::UserRejection,
            ChainFailure::Submission(msg) => Self::Submission(msg),
            ChainFailure::Confirmation { reason, .. } => {
                Self::Confirmation(reason)
            }
            ChainFailure::Reverted { reason } => {
                Self::ContractRevert { reason }
            }
        }
    }
}

/// A run that stopped short of `Done`, tagged with the stage it failed at.
#[derive(Debug, thiserror::Error)]
#[error("{kind} (stage: {stage})")]
pub struct StageFailure {
    /// Stage the run failed at.
    pub stage: Stage,
    /// What went wrong.
    pub kind: FailureKind,
}

/// Observable state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// No run in progress.
    Idle,
    /// Submitting the deploy transaction.
    Deploying,
    /// Waiting for the deploy receipt.
    AwaitingDeployConfirmation,
    /// Extracting the proxy address from the deploy logs.
    Extracting,
    /// Submitting the install transaction.
    Installing,
    /// Waiting for the install receipt.
    AwaitingInstallConfirmation,
    /// Both transactions confirmed.
    Done,
    /// The run stopped at the given stage.
    Failed(Stage),
}

impl Status {
    /// The terminal status of a finished run.
    #[must_use]
    pub fn of(result: &Result<InstallOutcome, StageFailure>) -> Self {
        match result {
            Ok(_) => Self::Done,
            Err(failure) => Self::Failed(failure.stage),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Deploying => f.write_str("deploying"),
            Self::AwaitingDeployConfirmation => {
                f.write_str("awaiting-deploy-confirmation")
            }
            Self::Extracting => f.write_str("extracting"),
            Self::Installing => f.write_str("installing"),
            Self::AwaitingInstallConfirmation => {
                f.write_str("awaiting-install-confirmation")
            }
            Self::Done => f.write_str("done"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
        }
    }
}

/// A completed run: the proxy that was deployed and both confirmations.
#[derive(Clone, Debug)]
pub struct InstallOutcome {
    /// Address of the deployed proxy, read from the `ProxyDeployed` event.
    pub proxy: Address,
    /// Confirmation of the deploy transaction.
    pub deploy: Confirmation,
    /// Confirmation of the install transaction.
    pub install: Confirmation,
}

/// Drives the fixed deploy → confirm → extract → install → confirm
/// sequence over a [`ProxyChain`].
///
/// The two transactions are strictly sequential: the install target only
/// exists once the deploy event has been extracted. Every stage is a
/// single attempt; nothing is retried. Dropping the returned future at an
/// await point stops issuing further calls, but a transaction that was
/// already submitted stays submitted.
pub struct Orchestrator<C> {
    chain: C,
    config: InstallConfig,
}

impl<C: ProxyChain> Orchestrator<C> {
    /// Binds the orchestration to a chain client and a configuration.
    pub fn new(chain: C, config: InstallConfig) -> Self {
        Self { chain, config }
    }

    /// The configuration this orchestrator runs with.
    #[must_use]
    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Runs the whole sequence once.
    ///
    /// # Errors
    ///
    /// Returns a [`StageFailure`] naming the stage the run stopped at;
    /// no failure escapes untagged. In particular a deploy receipt
    /// without a `ProxyDeployed` log fails at [`Stage::Extract`] and the
    /// install call is never submitted.
    pub async fn run(&self) -> Result<InstallOutcome, StageFailure> {
        let config = &self.config;

        transition(Status::Deploying);
        let deploy_tx = self
            .chain
            .submit_deploy(
                config.factory,
                config.implementation,
                config.deploy_data.clone(),
                config.salt,
            )
            .await
            .map_err(|e| fail(Stage::Deploy, e))?;
        info!(tx = %deploy_tx, "deploy transaction submitted");

        transition(Status::AwaitingDeployConfirmation);
        let deploy = self
            .chain
            .confirm(deploy_tx)
            .await
            .map_err(|e| fail(Stage::ConfirmDeploy, e))?;

        transition(Status::Extracting);
        let proxy = extract_proxy(&deploy.logs).ok_or(StageFailure {
            stage: Stage::Extract,
            kind: FailureKind::EventNotFound,
        })?;
        info!(%proxy, "proxy address extracted from deploy logs");

        transition(Status::Installing);
        let install_tx = self
            .chain
            .submit_install(proxy, config.module, config.install_data.clone())
            .await
            .map_err(|e| fail(Stage::Install, e))?;
        info!(tx = %install_tx, "install transaction submitted");

        transition(Status::AwaitingInstallConfirmation);
        let install = self
            .chain
            .confirm(install_tx)
            .await
            .map_err(|e| fail(Stage::ConfirmInstall, e))?;

        transition(Status::Done);
        Ok(InstallOutcome { proxy, deploy, install })
    }
}

/// Finds the proxy address in a deploy receipt's logs.
///
/// Logs that do not decode as `ProxyDeployed` are skipped; when several
/// match, the first in log order wins. `None` means the deploy emitted no
/// matching event.
#[must_use]
pub fn extract_proxy(logs: &[Log]) -> Option<Address> {
    logs.iter()
        .filter_map(|log| ProxyFactory::ProxyDeployed::decode_log(log).ok())
        .map(|event| event.data.proxy)
        .next()
}

fn transition(status: Status) {
    info!(%status, "orchestration state");
}

fn fail(stage: Stage, failure: ChainFailure) -> StageFailure {
    warn!(%stage, %failure, "orchestration stage failed");
    StageFailure { stage, kind: failure.into() }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{address, Address, Bytes, Log, LogData},
        sol_types::SolEvent,
    };

    use super::extract_proxy;
    use crate::abi::ProxyFactory;

    const FACTORY: Address =
        address!("0xB83db4b940e4796aA1f53DBFC824B9B1865835D5");

    fn deployed_log(proxy: Address) -> Log {
        let event = ProxyFactory::ProxyDeployed {
            implementation: address!(
                "0xa6b59721ac0cad7a4f502914b5872b6782a09085"
            ),
            proxy,
            deployer: address!("0x00000000000000000000000000000000000000aa"),
            data: Bytes::new(),
        };
        Log { address: FACTORY, data: event.encode_log_data() }
    }

    fn unrelated_log() -> Log {
        Log {
            address: FACTORY,
            data: LogData::new_unchecked(vec![], Bytes::new()),
        }
    }

    #[test]
    fn extracts_the_proxy_field() {
        let proxy = address!("0xABCD00000000000000000000000000000000abcd");
        assert_eq!(extract_proxy(&[deployed_log(proxy)]), Some(proxy));
    }

    #[test]
    fn no_matching_log_yields_none() {
        assert_eq!(extract_proxy(&[]), None);
        assert_eq!(extract_proxy(&[unrelated_log()]), None);
    }

    #[test]
    fn first_match_in_log_order_wins() {
        let first = address!("0x1111111111111111111111111111111111111111");
        let second = address!("0x2222222222222222222222222222222222222222");
        let logs = vec![
            unrelated_log(),
            deployed_log(first),
            deployed_log(second),
        ];
        assert_eq!(extract_proxy(&logs), Some(first));
    }
}

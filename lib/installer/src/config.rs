//! Deployment configuration.

use alloy::primitives::{address, Address, Bytes};

use crate::salt::Salt;

/// Environment variable holding the RPC endpoint URL.
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// Chain id of the OP Sepolia test network the default addresses live on.
pub const OP_SEPOLIA_CHAIN_ID: u64 = 11_155_420;

/// Everything a single deploy-and-install run needs.
///
/// The defaults reproduce the historical hard-coded run: the OP Sepolia
/// factory, implementation, and module addresses, empty call data for both
/// steps, and the fixed salt. Tests and alternative deployments substitute
/// their own values.
#[derive(Clone, Debug)]
pub struct InstallConfig {
    /// Factory contract that deploys the proxy.
    pub factory: Address,
    /// Implementation the proxy delegates to.
    pub implementation: Address,
    /// Module installed on the proxy after deployment.
    pub module: Address,
    /// Initialization data forwarded to the deploy call.
    pub deploy_data: Bytes,
    /// Data forwarded to the install call.
    pub install_data: Bytes,
    /// Salt mixed into the proxy address derivation.
    pub salt: Salt,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            factory: address!("0xB83db4b940e4796aA1f53DBFC824B9B1865835D5"),
            implementation: address!(
                "0xa6b59721ac0cad7a4f502914b5872b6782a09085"
            ),
            module: address!("0xB96b2328EA4946cf7785B8797a084e27e6aCf062"),
            deploy_data: Bytes::new(),
            install_data: Bytes::new(),
            salt: Salt::fixed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InstallConfig;
    use crate::salt::Salt;

    #[test]
    fn default_config_uses_fixed_salt_and_empty_data() {
        let config = InstallConfig::default();
        assert_eq!(config.salt, Salt::fixed());
        assert!(config.deploy_data.is_empty());
        assert!(config.install_data.is_empty());
        assert_ne!(config.factory, config.implementation);
        assert_ne!(config.implementation, config.module);
    }
}

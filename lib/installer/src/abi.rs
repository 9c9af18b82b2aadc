//! Static contract interface surfaces.
//!
//! These are pure data: the factory's deploy function and event, and the
//! proxy's module-install function. Nothing here talks to the network on
//! its own.

use alloy::sol;

sol! {
    /// Factory that deterministically deploys proxy instances.
    #[sol(rpc)]
    contract ProxyFactory {
        /// Deploys a proxy delegating to `implementation`, at an address
        /// derived from `salt`.
        function deployProxyByImplementation(
            address implementation,
            bytes data,
            bytes32 salt
        ) returns (address deployedProxy);

        /// Emitted once per successful deployment. The `proxy` field is
        /// not indexed, so it lives in the log data.
        event ProxyDeployed(
            address indexed implementation,
            address proxy,
            address indexed deployer,
            bytes data
        );
    }

    /// Surface of a deployed proxy that accepts module installations.
    #[sol(rpc)]
    contract ModularProxy {
        /// Installs `_module` on the proxy.
        function installModule(address _module, bytes _data) payable;
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::b256,
        sol_types::{SolCall, SolEvent},
    };
    use hex_literal::hex;

    use super::{ModularProxy, ProxyFactory};

    #[test]
    fn deploy_selector_is_pinned() {
        assert_eq!(
            ProxyFactory::deployProxyByImplementationCall::SELECTOR,
            hex!("11b804ab"),
        );
    }

    #[test]
    fn install_selector_is_pinned() {
        assert_eq!(
            ModularProxy::installModuleCall::SELECTOR,
            hex!("8da798da"),
        );
    }

    #[test]
    fn proxy_deployed_signature_is_pinned() {
        assert_eq!(
            ProxyFactory::ProxyDeployed::SIGNATURE,
            "ProxyDeployed(address,address,address,bytes)",
        );
        assert_eq!(
            ProxyFactory::ProxyDeployed::SIGNATURE_HASH,
            b256!("3aae9998fac9d1c8b0c037c1dc1abe7f835d9ef3226059bd75f55257d590c1e7"),
        );
    }
}

//! Deployment salt construction.

use alloy::primitives::{b256, B256};

/// The salt every historical deployment used: a two-byte prefix, zero
/// padding, and a terminal `0x06` byte. Deterministic by construction.
const FIXED_SALT: B256 = b256!(
    "0101000000000000000000000000000000000000000000000000000000000006"
);

/// 32-byte value mixed into deterministic proxy address derivation.
///
/// A fixed salt makes repeated deployments target the same proxy address;
/// a random one makes every run deploy a fresh proxy. Which behavior is
/// wanted depends on the caller, so both constructors are provided and the
/// salt travels through [`crate::InstallConfig`] explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt(B256);

impl Salt {
    /// The fixed salt historically used for every deployment.
    #[must_use]
    pub const fn fixed() -> Self {
        Self(FIXED_SALT)
    }

    /// A salt drawn from per-call entropy.
    #[must_use]
    pub fn random() -> Self {
        Self(B256::random())
    }

    /// A salt from explicit bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// The raw 32-byte value.
    #[must_use]
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for Salt {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<Salt> for B256 {
    fn from(value: Salt) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::Salt;

    #[test]
    fn fixed_salt_is_byte_identical_across_runs() {
        let expected = hex!(
            "0101000000000000000000000000000000000000000000000000000000000006"
        );
        assert_eq!(Salt::fixed().as_b256().0, expected);
        assert_eq!(Salt::fixed(), Salt::fixed());
    }

    #[test]
    fn fixed_salt_layout() {
        let bytes = Salt::fixed().as_b256().0;
        assert_eq!(&bytes[..2], &[0x01, 0x01]);
        assert!(bytes[2..31].iter().all(|&b| b == 0));
        assert_eq!(bytes[31], 0x06);
    }

    #[test]
    fn random_salts_differ() {
        assert_ne!(Salt::random(), Salt::random());
    }

    #[test]
    fn from_bytes_roundtrips() {
        let bytes = [0xab; 32];
        assert_eq!(Salt::from_bytes(bytes).as_b256().0, bytes);
    }
}

//! Recipient address shape check.
//!
//! Only the outer shape is checked: a two-letter network marker (`SP` on
//! mainnet, `ST` on testnet) followed by at least 38 characters from
//! `[0-9A-Z]`. Checksums are the wallet's business.

use crate::config::Network;
use crate::{Result, StackPayError};

/// Minimum length of the part after the network marker.
pub const MIN_BODY_LEN: usize = 38;

/// Returns true if `address` has the shape of a payment recipient.
///
/// Matching is case-sensitive.
///
/// # Example
///
/// ```
/// use stackpay_lib::address::is_valid_address;
///
/// assert!(is_valid_address("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"));
/// assert!(!is_valid_address("invalid-address"));
/// ```
pub fn is_valid_address(address: &str) -> bool {
    network_of(address).is_some()
}

/// Network marker carried by a well-formed address.
pub fn network_of(address: &str) -> Option<Network> {
    let (network, body) = [Network::Mainnet, Network::Testnet]
        .into_iter()
        .find_map(|network| {
            address
                .strip_prefix(network.address_prefix())
                .map(|body| (network, body))
        })?;

    let well_formed = body.len() >= MIN_BODY_LEN
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());

    well_formed.then_some(network)
}

/// Fail with [`StackPayError::InvalidRecipient`] unless `address` is well-formed.
pub fn ensure_valid_address(address: &str) -> Result<()> {
    if is_valid_address(address) {
        Ok(())
    } else {
        Err(StackPayError::InvalidRecipient(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MAINNET_ADDRESS, VALID_ADDRESS};
    use proptest::prelude::*;

    #[test]
    fn test_known_addresses() {
        assert!(is_valid_address(VALID_ADDRESS));
        assert!(is_valid_address(MAINNET_ADDRESS));
        assert_eq!(network_of(VALID_ADDRESS), Some(Network::Testnet));
        assert_eq!(network_of(MAINNET_ADDRESS), Some(Network::Mainnet));
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("invalid-address"));
        assert!(!is_valid_address(&VALID_ADDRESS.to_lowercase()));
        // wrong network marker
        assert!(!is_valid_address("SX1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"));
        // body one short of the minimum
        assert!(!is_valid_address(&VALID_ADDRESS[..2 + MIN_BODY_LEN - 1]));
        assert!(is_valid_address(&VALID_ADDRESS[..2 + MIN_BODY_LEN]));
        // surrounding whitespace is not stripped
        assert!(!is_valid_address(&format!(" {VALID_ADDRESS}")));
    }

    #[test]
    fn test_ensure_valid_address() {
        assert!(ensure_valid_address(VALID_ADDRESS).is_ok());
        let err = ensure_valid_address("invalid-address").unwrap_err();
        assert_eq!(err, StackPayError::InvalidRecipient("invalid-address".into()));
    }

    proptest! {
        #[test]
        fn prop_valid_shape_accepted(prefix in "S[PT]", body in "[0-9A-Z]{38,60}") {
            let address = format!("{prefix}{body}");
            prop_assert!(is_valid_address(&address));
        }

        #[test]
        fn prop_lowercase_body_rejected(prefix in "S[PT]", body in "[0-9A-Z]{37,60}[a-z]") {
            let address = format!("{prefix}{body}");
            prop_assert!(!is_valid_address(&address));
        }
    }
}

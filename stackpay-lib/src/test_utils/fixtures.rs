//! Test fixtures.

use crate::{PaymentIntent, TransactionId};

/// Well-formed testnet address (also the default gateway deployer).
pub const VALID_ADDRESS: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

/// Well-formed mainnet address.
pub const MAINNET_ADDRESS: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7";

/// A valid 0.01 display-unit payment to [`VALID_ADDRESS`].
pub fn test_intent() -> PaymentIntent {
    PaymentIntent::new(VALID_ADDRESS, 1_000_000).with_memo("Order #1")
}

/// Deterministic 32-byte hex transaction id.
pub fn test_tx_id(n: u64) -> TransactionId {
    TransactionId(format!("0x{n:064x}"))
}

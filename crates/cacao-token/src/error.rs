//! Error taxonomy for ledger operations.
//!
//! Every rejection is fatal to the single operation in progress and leaves
//! the ledger unchanged. Each cause gets its own variant so callers and
//! tests can assert on why an operation was rejected.

use alloy_primitives::U256;

/// Why a token operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The sender's balance does not cover the requested amount.
    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance {
        /// Current balance of the debited account.
        balance: U256,
        /// Amount the operation needed.
        needed: U256,
    },
    /// The spender's remaining allowance does not cover the requested amount.
    #[error("insufficient allowance: have {allowance}, need {needed}")]
    InsufficientAllowance {
        /// Remaining allowance for the (owner, spender) pair.
        allowance: U256,
        /// Amount the operation needed.
        needed: U256,
    },
    /// The permit deadline is in the past.
    #[error("permit expired at deadline {deadline}")]
    PermitExpired {
        /// Deadline carried by the rejected permit.
        deadline: U256,
    },
    /// The signature is malformed, non-canonical, or not from the claimed owner.
    #[error("invalid permit signature")]
    InvalidSignature,
    /// Supply or balance arithmetic exceeded the 256-bit bound.
    #[error("arithmetic overflow in supply or balance accounting")]
    Overflow,
}

//! Chain and deployment identity for the token's EIP-712 domain.
//!
//! A permit signature is only valid for one token instance on one chain.
//! [`TokenDeployment`] carries the two instance-specific inputs of the
//! domain separator: the EIP-155 chain id and the contract address.
//! Redeploying the same logical token, or moving to another chain, yields a
//! different separator and invalidates previously issued but unconsumed
//! signatures for the old context.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric EIP-155 chain id (e.g. `1` for Ethereum mainnet).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainReference(u64);

impl ChainReference {
    /// Creates a chain reference from a raw EIP-155 chain id.
    pub fn new(chain_id: u64) -> Self {
        Self(chain_id)
    }

    /// Returns the raw chain id.
    pub fn inner(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChainReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eip155:{}", self.0)
    }
}

impl From<u64> for ChainReference {
    fn from(chain_id: u64) -> Self {
        Self::new(chain_id)
    }
}

/// Deployment identity of a token instance.
///
/// # Example
///
/// ```
/// use alloy_primitives::address;
/// use cacao_token::{ChainReference, TokenDeployment};
///
/// let deployment = TokenDeployment {
///     chain_reference: ChainReference::new(1),
///     address: address!("0x7EfE4bdd11237610bcFca478937658bE39F8dfd6"),
/// };
/// assert_eq!(deployment.chain_reference.inner(), 1);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDeployment {
    /// The chain the token instance lives on.
    pub chain_reference: ChainReference,
    /// The token contract address (the EIP-712 verifying contract).
    pub address: Address,
}

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Cacao LP fungible-token ledger with EIP-2612 permit support.
//!
//! This crate implements the `Cacao-LP` token as an explicitly owned ledger
//! aggregate: balances, allowances, per-owner permit nonces, and an
//! append-only event log, mutated only through the token's operations.
//! Alongside the direct `approve`/`transfer`/`transferFrom` surface it
//! supports [EIP-2612](https://eips.ethereum.org/EIPS/eip-2612) permits,
//! where a holder authorizes a spender's allowance by signing an EIP-712
//! typed-data message off-chain instead of submitting an operation
//! themselves.
//!
//! # Key Types
//!
//! - [`CacaoToken`] - The ledger aggregate and all read/write operations
//! - [`TokenDeployment`] - Chain id and contract address binding the EIP-712 domain
//! - [`Permit`] - The EIP-712 typed struct signed by holders
//! - [`TokenEvent`] - `Transfer`/`Approval` records in the event log
//! - [`TokenError`] - Why an operation was rejected
//!
//! # Atomicity
//!
//! Every operation either completes in full or fails leaving the ledger
//! unchanged. The aggregate takes `&mut self` for writes, so exclusive
//! ownership (or an external `Mutex`) gives the single-writer guarantee the
//! original execution environment provided.
//!
//! # Example
//!
//! ```
//! use alloy_primitives::{address, U256};
//! use cacao_token::{CacaoToken, ChainReference, TokenDeployment};
//!
//! let deployment = TokenDeployment {
//!     chain_reference: ChainReference::new(1),
//!     address: address!("0x7EfE4bdd11237610bcFca478937658bE39F8dfd6"),
//! };
//! let deployer = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
//! let other = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
//!
//! let mut token = CacaoToken::new(deployment, deployer, U256::from(10_000u64));
//! token.transfer(deployer, other, U256::from(10u64)).unwrap();
//! assert_eq!(token.balance_of(other), U256::from(10u64));
//! ```
//!
//! For the signature-driven flow, enable the `client` feature and see
//! `sign_permit`.

pub mod chain;
pub mod error;
pub mod events;
pub mod ledger;
pub mod permit;
pub mod timestamp;
pub mod token;

#[cfg(feature = "client")]
pub mod client;

pub use chain::*;
pub use error::*;
pub use events::*;
pub use ledger::*;
pub use permit::*;
pub use timestamp::*;
pub use token::*;

#[cfg(feature = "client")]
pub use client::*;

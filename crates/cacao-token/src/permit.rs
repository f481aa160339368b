//! EIP-2612 permit verification: signature-based allowance approval.
//!
//! A holder signs an EIP-712 [`Permit`] message off-chain; anyone may then
//! submit it to set the spender's allowance without the holder issuing an
//! operation directly. The signed struct embeds the owner's current
//! (pre-increment) nonce, tying each signature to exactly one unconsumed
//! nonce value: once the permit is applied the nonce advances and the same
//! signature can never validate again.
//!
//! # Signature Handling
//!
//! A permit signature is the canonical (r, s, parity) triple, accepted
//! either as an [`alloy_primitives::Signature`] or as a concatenated
//! byte-string that [`split_signature_bytes`] parses:
//!
//! - **65 bytes**: `r || s || v`, the standard EOA encoding.
//! - **64 bytes**: the [ERC-2098](https://eips.ethereum.org/EIPS/eip-2098)
//!   compact encoding with the parity bit folded into `s`.
//!
//! Malleable signatures are rejected: only the low-`s` form recovers, so
//! each digest has exactly one acceptable signature.

use alloy_primitives::{Address, B256, Bytes, Signature, U256, b256, uint};
use alloy_sol_types::{SolStruct, sol};
use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::timestamp::UnixTimestamp;
use crate::token::CacaoToken;

/// keccak256("Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)")
pub const PERMIT_TYPEHASH: B256 =
    b256!("0x6e71edae12b1b97f4d1f60370fef10105fa2faae0126114a169c64845d6126c9");

/// Upper bound for the `s` scalar of an acceptable signature.
///
/// Appendix F of the Ethereum Yellow Paper restricts `s` to the lower half
/// of the secp256k1 order; the complementary high-`s` form of the same
/// signature is rejected as malleable.
pub const SIGNATURE_S_UPPER_BOUND: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

sol! {
    /// The EIP-712 typed struct a holder signs to authorize an allowance.
    ///
    /// `nonce` must be the owner's current permit nonce at the time the
    /// permit is consumed, and `deadline` the last timestamp (inclusive) at
    /// which the permit is acceptable; `U256::MAX` means "no expiry".
    #[derive(Serialize, Deserialize)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
}

/// Wire format for a permit submission: the signed fields plus the raw
/// signature bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitPayload {
    /// Account that owns the tokens and produced the signature.
    pub owner: Address,
    /// Account being granted the allowance.
    pub spender: Address,
    /// Allowance amount to set.
    pub value: U256,
    /// Last acceptable timestamp, in seconds.
    pub deadline: U256,
    /// Concatenated signature bytes (65-byte `r || s || v` or 64-byte
    /// ERC-2098 compact form).
    pub signature: Bytes,
}

/// Splits concatenated signature bytes into their canonical components.
///
/// # Errors
///
/// [`TokenError::InvalidSignature`] if the length is neither 64 nor 65
/// bytes, or the recovery indicator is out of range.
pub fn split_signature_bytes(bytes: &[u8]) -> Result<Signature, TokenError> {
    match bytes.len() {
        65 => Signature::from_raw(bytes).map_err(|_| TokenError::InvalidSignature),
        64 => Ok(Signature::from_erc2098(bytes)),
        _ => Err(TokenError::InvalidSignature),
    }
}

impl CacaoToken {
    /// The 32-byte type hash of the [`Permit`] schema.
    pub fn permit_typehash(&self) -> B256 {
        PERMIT_TYPEHASH
    }

    /// The digest a holder must sign to permit `spender` an allowance of
    /// `value`, embedding the holder's current nonce.
    ///
    /// Computed as `keccak256(0x1901 || domain_separator ||
    /// hash_struct(Permit))` per EIP-712.
    pub fn permit_signing_hash(
        &self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
    ) -> B256 {
        let message = Permit {
            owner,
            spender,
            value,
            nonce: self.nonces(owner),
            deadline,
        };
        message.eip712_signing_hash(self.domain())
    }

    /// Consumes a signed permit, setting `spender`'s allowance to `value`.
    ///
    /// Verification is terminal in one step: the deadline is checked, the
    /// typed-data digest for the owner's current nonce is reconstructed,
    /// and the signer recovered from `signature` must equal `owner`. Only
    /// then is the nonce advanced, the allowance overwritten, and an
    /// `Approval` record emitted; on any rejection the ledger is unchanged.
    ///
    /// # Errors
    ///
    /// - [`TokenError::PermitExpired`] if the current time is past
    ///   `deadline`.
    /// - [`TokenError::InvalidSignature`] if the signature is non-canonical
    ///   (high `s`), fails recovery, recovers the zero address, or recovers
    ///   an address other than `owner` (including replays, whose digest no
    ///   longer matches the advanced nonce).
    #[cfg_attr(feature = "telemetry", instrument(skip(self, signature), err))]
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &Signature,
    ) -> Result<(), TokenError> {
        let now = U256::from(UnixTimestamp::now().as_secs());
        if now > deadline {
            return Err(TokenError::PermitExpired { deadline });
        }

        if signature.s() > SIGNATURE_S_UPPER_BOUND {
            return Err(TokenError::InvalidSignature);
        }
        let digest = self.permit_signing_hash(owner, spender, value, deadline);
        let recovered = signature
            .recover_address_from_prehash(&digest)
            .map_err(|_| TokenError::InvalidSignature)?;
        if recovered == Address::ZERO || recovered != owner {
            return Err(TokenError::InvalidSignature);
        }

        self.ledger.consume_nonce(owner)?;
        self.ledger.set_allowance(owner, spender, value);
        self.record(TokenEvent::Approval {
            owner,
            spender,
            value,
        });
        Ok(())
    }

    /// Consumes a [`PermitPayload`], splitting its signature bytes first.
    ///
    /// # Errors
    ///
    /// As [`CacaoToken::permit`], plus [`TokenError::InvalidSignature`] for
    /// byte-strings that are not a 64/65-byte signature encoding.
    pub fn apply_permit(&mut self, payload: &PermitPayload) -> Result<(), TokenError> {
        let signature = split_signature_bytes(&payload.signature)?;
        self.permit(
            payload.owner,
            payload.spender,
            payload.value,
            payload.deadline,
            &signature,
        )
    }
}

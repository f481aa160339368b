//! Holder-side permit signing.
//!
//! Produces the signature a holder hands to whoever submits the permit.
//! The digest embeds the owner's current nonce as read from the token, so
//! the signature is valid for exactly one consumption.

use alloy_primitives::{Address, Signature, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::token::CacaoToken;

/// Signs a permit granting `spender` an allowance of `value` from the
/// signer's account, acceptable until `deadline`.
///
/// # Errors
///
/// Propagates the signer's error if signing the digest fails.
///
/// # Example
///
/// ```ignore
/// use alloy_primitives::U256;
/// use alloy_signer_local::PrivateKeySigner;
/// use cacao_token::sign_permit;
///
/// let holder = PrivateKeySigner::random();
/// let signature = sign_permit(&holder, &token, spender, value, U256::MAX)?;
/// token.permit(holder.address(), spender, value, U256::MAX, &signature)?;
/// ```
pub fn sign_permit(
    signer: &PrivateKeySigner,
    token: &CacaoToken,
    spender: Address,
    value: U256,
    deadline: U256,
) -> Result<Signature, alloy_signer::Error> {
    let digest = token.permit_signing_hash(signer.address(), spender, value, deadline);
    signer.sign_hash_sync(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainReference, TokenDeployment};
    use alloy_primitives::address;

    #[test]
    fn signed_permit_is_accepted_by_the_token() {
        let holder = PrivateKeySigner::random();
        let spender = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
        let deployment = TokenDeployment {
            chain_reference: ChainReference::new(31337),
            address: address!("0x7EfE4bdd11237610bcFca478937658bE39F8dfd6"),
        };
        let mut token = CacaoToken::new(deployment, holder.address(), U256::from(1_000u64));

        let value = U256::from(10u64);
        let signature = sign_permit(&holder, &token, spender, value, U256::MAX).unwrap();
        token
            .permit(holder.address(), spender, value, U256::MAX, &signature)
            .unwrap();
        assert_eq!(token.allowance(holder.address(), spender), value);
    }
}

//! The token aggregate: metadata, construction, and the transfer engine.
//!
//! [`CacaoToken`] owns the [`Ledger`], the [`EventLog`], and the cached
//! EIP-712 domain. All writes go through `&mut self` operations that check
//! every precondition before the first state write, giving all-or-nothing
//! semantics without locks; callers that share the token across threads
//! wrap it in their own `Mutex`.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{Eip712Domain, eip712_domain};

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::chain::TokenDeployment;
use crate::error::TokenError;
use crate::events::{EventLog, TokenEvent};
use crate::ledger::Ledger;

/// Token name, also the EIP-712 domain name.
pub const TOKEN_NAME: &str = "Cacao LPs";

/// Token symbol.
pub const TOKEN_SYMBOL: &str = "Cacao-LP";

/// Token decimals.
pub const TOKEN_DECIMALS: u8 = 18;

/// EIP-712 domain version string.
pub const EIP712_VERSION: &str = "1";

/// Allowance sentinel meaning "no limit"; never decremented by
/// [`CacaoToken::transfer_from`].
pub const UNLIMITED_ALLOWANCE: U256 = U256::MAX;

/// The Cacao LP token ledger aggregate.
#[derive(Debug, Clone)]
pub struct CacaoToken {
    pub(crate) ledger: Ledger,
    pub(crate) events: EventLog,
    domain: Eip712Domain,
    deployment: TokenDeployment,
}

impl CacaoToken {
    /// Deploys a token instance, minting `initial_supply` to `deployer`.
    ///
    /// The EIP-712 domain separator is derived once here from the token
    /// name, version "1", and the deployment's chain id and address, and is
    /// immutable for the lifetime of the instance. Emits a
    /// `Transfer(0x0 -> deployer)` record for the initial mint.
    pub fn new(deployment: TokenDeployment, deployer: Address, initial_supply: U256) -> Self {
        let domain = eip712_domain! {
            name: TOKEN_NAME,
            version: EIP712_VERSION,
            chain_id: deployment.chain_reference.inner(),
            verifying_contract: deployment.address,
        };
        let mut token = Self {
            ledger: Ledger::with_initial_supply(deployer, initial_supply),
            events: EventLog::default(),
            domain,
            deployment,
        };
        token.record(TokenEvent::Transfer {
            from: Address::ZERO,
            to: deployer,
            value: initial_supply,
        });
        token
    }

    /// Token name.
    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    /// Token symbol.
    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    /// Token decimals.
    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    /// The deployment this instance was constructed for.
    pub fn deployment(&self) -> &TokenDeployment {
        &self.deployment
    }

    /// The cached EIP-712 domain.
    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// The 32-byte EIP-712 domain separator.
    pub fn domain_separator(&self) -> B256 {
        self.domain.separator()
    }

    /// Number of tokens in existence.
    pub fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.ledger.balance_of(account)
    }

    /// Remaining amount `spender` may move from `owner`.
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.ledger.allowance(owner, spender)
    }

    /// Current permit nonce of `owner`.
    pub fn nonces(&self, owner: Address) -> U256 {
        self.ledger.nonce_of(owner)
    }

    /// Events emitted so far, in operation order.
    pub fn events(&self) -> &[TokenEvent] {
        self.events.as_slice()
    }

    /// Removes and returns all pending events for an external observer.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        self.events.drain()
    }

    /// Moves `value` tokens from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`TokenError::InsufficientBalance`] if `from` holds less than
    /// `value`; both balances are left unchanged.
    #[cfg_attr(feature = "telemetry", instrument(skip(self), err))]
    pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), TokenError> {
        self.ledger.transfer(from, to, value)?;
        self.record(TokenEvent::Transfer { from, to, value });
        Ok(())
    }

    /// Sets the allowance of `spender` over `owner`'s tokens to `value`.
    ///
    /// The write is an unconditional overwrite, not additive. Emits an
    /// `Approval` record.
    #[cfg_attr(feature = "telemetry", instrument(skip(self)))]
    pub fn approve(&mut self, owner: Address, spender: Address, value: U256) {
        self.ledger.set_allowance(owner, spender, value);
        self.record(TokenEvent::Approval {
            owner,
            spender,
            value,
        });
    }

    /// Moves `value` tokens from `from` to `to` on behalf of `spender`.
    ///
    /// A finite allowance is decremented by exactly `value`; the
    /// [`UNLIMITED_ALLOWANCE`] sentinel is left untouched no matter how
    /// many transfers it backs.
    ///
    /// # Errors
    ///
    /// [`TokenError::InsufficientAllowance`] if a finite allowance does not
    /// cover `value`, [`TokenError::InsufficientBalance`] if `from`'s
    /// balance does not. Either way no state is mutated.
    #[cfg_attr(feature = "telemetry", instrument(skip(self), err))]
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), TokenError> {
        let allowance = self.ledger.allowance(from, spender);
        if allowance == UNLIMITED_ALLOWANCE {
            self.ledger.transfer(from, to, value)?;
        } else {
            if allowance < value {
                return Err(TokenError::InsufficientAllowance {
                    allowance,
                    needed: value,
                });
            }
            self.ledger.transfer(from, to, value)?;
            self.ledger.set_allowance(from, spender, allowance - value);
        }
        self.record(TokenEvent::Transfer { from, to, value });
        Ok(())
    }

    /// Creates `value` tokens on `to`, growing the supply.
    ///
    /// # Errors
    ///
    /// [`TokenError::Overflow`] if the supply would exceed the 256-bit bound.
    #[cfg_attr(feature = "telemetry", instrument(skip(self), err))]
    pub fn mint(&mut self, to: Address, value: U256) -> Result<(), TokenError> {
        self.ledger.mint(to, value)?;
        self.record(TokenEvent::Transfer {
            from: Address::ZERO,
            to,
            value,
        });
        Ok(())
    }

    /// Destroys `value` tokens on `from`, shrinking the supply.
    ///
    /// # Errors
    ///
    /// [`TokenError::InsufficientBalance`] if `from` holds less than `value`.
    #[cfg_attr(feature = "telemetry", instrument(skip(self), err))]
    pub fn burn(&mut self, from: Address, value: U256) -> Result<(), TokenError> {
        self.ledger.burn(from, value)?;
        self.record(TokenEvent::Transfer {
            from,
            to: Address::ZERO,
            value,
        });
        Ok(())
    }

    pub(crate) fn record(&mut self, event: TokenEvent) {
        self.events.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainReference;
    use alloy_primitives::{FixedBytes, address, keccak256};
    use alloy_sol_types::{SolType, sol};

    const DEPLOYER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const OTHER: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
    const DEV: Address = address!("0x90F79bf6EB2c4f870365E785982E1f101E93b906");
    const TOKEN_ADDRESS: Address = address!("0x7EfE4bdd11237610bcFca478937658bE39F8dfd6");
    const CHAIN_ID: u64 = 31337;

    fn expand_to_18_decimals(value: u64) -> U256 {
        U256::from(value) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn total_supply() -> U256 {
        expand_to_18_decimals(10_000)
    }

    fn test_amount() -> U256 {
        expand_to_18_decimals(10)
    }

    fn deploy() -> CacaoToken {
        let deployment = TokenDeployment {
            chain_reference: ChainReference::new(CHAIN_ID),
            address: TOKEN_ADDRESS,
        };
        CacaoToken::new(deployment, DEPLOYER, total_supply())
    }

    #[test]
    fn metadata_and_initial_state() {
        let token = deploy();
        assert_eq!(token.name(), "Cacao LPs");
        assert_eq!(token.symbol(), "Cacao-LP");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), total_supply());
        assert_eq!(token.balance_of(DEPLOYER), total_supply());
        assert_eq!(
            token.events(),
            &[TokenEvent::Transfer {
                from: Address::ZERO,
                to: DEPLOYER,
                value: total_supply(),
            }]
        );
    }

    #[test]
    fn domain_separator_matches_manual_construction() {
        type DomainTuple = sol! { tuple(bytes32, bytes32, bytes32, uint256, address) };

        let token = deploy();
        let domain_type_hash = keccak256(
            "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
        );
        let encoded = <DomainTuple as SolType>::abi_encode_params(&(
            FixedBytes::from(domain_type_hash),
            FixedBytes::from(keccak256("Cacao LPs")),
            FixedBytes::from(keccak256("1")),
            U256::from(CHAIN_ID),
            TOKEN_ADDRESS,
        ));
        assert_eq!(token.domain_separator(), keccak256(encoded));
    }

    #[test]
    fn approve_overwrites_allowance() {
        let mut token = deploy();
        token.approve(DEPLOYER, OTHER, test_amount());
        assert_eq!(token.allowance(DEPLOYER, OTHER), test_amount());

        // Overwrite, not additive.
        token.approve(DEPLOYER, OTHER, U256::from(1u64));
        assert_eq!(token.allowance(DEPLOYER, OTHER), U256::from(1u64));
        assert_eq!(
            token.events().last(),
            Some(&TokenEvent::Approval {
                owner: DEPLOYER,
                spender: OTHER,
                value: U256::from(1u64),
            })
        );
    }

    #[test]
    fn transfer_moves_balance_and_emits() {
        let mut token = deploy();
        token.transfer(DEPLOYER, OTHER, test_amount()).unwrap();
        assert_eq!(
            token.balance_of(DEPLOYER),
            total_supply() - test_amount()
        );
        assert_eq!(token.balance_of(OTHER), test_amount());
        assert_eq!(
            token.events().last(),
            Some(&TokenEvent::Transfer {
                from: DEPLOYER,
                to: OTHER,
                value: test_amount(),
            })
        );
    }

    #[test]
    fn transfer_beyond_balance_fails_without_mutation() {
        let mut token = deploy();
        let err = token
            .transfer(DEPLOYER, OTHER, total_supply() + U256::from(1u64))
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert!(matches!(
            token.transfer(OTHER, DEPLOYER, U256::from(1u64)),
            Err(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(token.balance_of(DEPLOYER), total_supply());
        assert_eq!(token.balance_of(OTHER), U256::ZERO);
        // Only the construction mint was recorded.
        assert_eq!(token.events().len(), 1);
    }

    #[test]
    fn transfer_from_decrements_finite_allowance_exactly() {
        let mut token = deploy();
        token.approve(DEPLOYER, OTHER, test_amount());
        token
            .transfer_from(OTHER, DEPLOYER, OTHER, test_amount())
            .unwrap();
        assert_eq!(token.allowance(DEPLOYER, OTHER), U256::ZERO);
        assert_eq!(
            token.balance_of(DEPLOYER),
            total_supply() - test_amount()
        );
        assert_eq!(token.balance_of(OTHER), test_amount());
    }

    #[test]
    fn transfer_from_beyond_allowance_fails_without_mutation() {
        let mut token = deploy();
        token.approve(DEPLOYER, OTHER, test_amount());
        let err = token
            .transfer_from(OTHER, DEPLOYER, OTHER, test_amount() + U256::from(1u64))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                allowance: test_amount(),
                needed: test_amount() + U256::from(1u64),
            }
        );
        assert_eq!(token.allowance(DEPLOYER, OTHER), test_amount());
        assert_eq!(token.balance_of(DEPLOYER), total_supply());
        assert_eq!(token.balance_of(OTHER), U256::ZERO);
    }

    #[test]
    fn unlimited_allowance_is_never_decremented() {
        let mut token = deploy();
        token.approve(DEPLOYER, OTHER, UNLIMITED_ALLOWANCE);
        for _ in 0..3 {
            token
                .transfer_from(OTHER, DEPLOYER, OTHER, test_amount())
                .unwrap();
            assert_eq!(token.allowance(DEPLOYER, OTHER), UNLIMITED_ALLOWANCE);
        }
        assert_eq!(token.balance_of(OTHER), test_amount() * U256::from(3u64));
    }

    #[test]
    fn supply_is_conserved_across_transfer_sequences() {
        let mut token = deploy();
        token.transfer(DEPLOYER, OTHER, test_amount()).unwrap();
        token.transfer(OTHER, DEV, U256::from(7u64)).unwrap();
        token.approve(DEPLOYER, DEV, UNLIMITED_ALLOWANCE);
        token
            .transfer_from(DEV, DEPLOYER, DEV, test_amount())
            .unwrap();
        let sum = token.balance_of(DEPLOYER) + token.balance_of(OTHER) + token.balance_of(DEV);
        assert_eq!(sum, token.total_supply());
    }

    #[test]
    fn mint_and_burn_adjust_supply_and_emit() {
        let mut token = deploy();
        token.mint(OTHER, test_amount()).unwrap();
        assert_eq!(token.total_supply(), total_supply() + test_amount());
        token.burn(OTHER, test_amount()).unwrap();
        assert_eq!(token.total_supply(), total_supply());
        assert_eq!(token.balance_of(OTHER), U256::ZERO);
        assert_eq!(
            token.events().last(),
            Some(&TokenEvent::Transfer {
                from: OTHER,
                to: Address::ZERO,
                value: test_amount(),
            })
        );
    }

    #[test]
    fn event_order_matches_operation_order() {
        let mut token = deploy();
        token.approve(DEPLOYER, OTHER, test_amount());
        token.transfer(DEPLOYER, DEV, U256::from(1u64)).unwrap();
        token
            .transfer_from(OTHER, DEPLOYER, OTHER, U256::from(2u64))
            .unwrap();
        let events = token.drain_events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], TokenEvent::Transfer { from, .. } if from == Address::ZERO));
        assert!(matches!(events[1], TokenEvent::Approval { .. }));
        assert!(matches!(events[2], TokenEvent::Transfer { to, .. } if to == DEV));
        assert!(matches!(events[3], TokenEvent::Transfer { to, .. } if to == OTHER));
        assert!(token.events().is_empty());
    }
}

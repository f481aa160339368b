//! Single source of truth for balances, allowances, nonces, and supply.
//!
//! Entries default to zero on first reference and are never deleted; zero
//! is a valid resting state. Mutators are crate-private and reachable only
//! through the token operations in [`crate::token`] and [`crate::permit`],
//! which keeps the `sum(balances) == total_supply` invariant local to this
//! file. Every mutator validates all of its writes before performing the
//! first one, so a failed operation leaves the ledger untouched.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::error::TokenError;

/// Balances, allowances, per-owner permit nonces, and total supply.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, U256>,
    total_supply: U256,
}

impl Ledger {
    /// Creates a ledger holding `supply` on `account`.
    pub(crate) fn with_initial_supply(account: Address, supply: U256) -> Self {
        let mut ledger = Self::default();
        ledger.balances.insert(account, supply);
        ledger.total_supply = supply;
        ledger
    }

    /// Number of tokens in existence.
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of `account`, zero if never referenced.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Remaining amount `spender` may move from `owner`.
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Current permit nonce of `owner` (the next one a signature must embed).
    pub fn nonce_of(&self, owner: Address) -> U256 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    /// Moves `value` from `from` to `to`.
    ///
    /// Both sides are validated before either balance is written. A
    /// self-transfer is balance-checked but leaves the ledger unchanged.
    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        if from_balance < value {
            return Err(TokenError::InsufficientBalance {
                balance: from_balance,
                needed: value,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(value)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from, from_balance - value);
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Creates `value` tokens on `account`, growing the total supply.
    pub(crate) fn mint(&mut self, account: Address, value: U256) -> Result<(), TokenError> {
        let supply = self
            .total_supply
            .checked_add(value)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(account)
            .checked_add(value)
            .ok_or(TokenError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(account, balance);
        Ok(())
    }

    /// Destroys `value` tokens on `account`, shrinking the total supply.
    pub(crate) fn burn(&mut self, account: Address, value: U256) -> Result<(), TokenError> {
        let balance = self.balance_of(account);
        if balance < value {
            return Err(TokenError::InsufficientBalance {
                balance,
                needed: value,
            });
        }
        let supply = self
            .total_supply
            .checked_sub(value)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(account, balance - value);
        self.total_supply = supply;
        Ok(())
    }

    /// Overwrites the allowance of `spender` over `owner`'s tokens.
    pub(crate) fn set_allowance(&mut self, owner: Address, spender: Address, value: U256) {
        self.allowances.insert((owner, spender), value);
    }

    /// Advances `owner`'s permit nonce by one, returning the consumed value.
    pub(crate) fn consume_nonce(&mut self, owner: Address) -> Result<U256, TokenError> {
        let current = self.nonce_of(owner);
        let next = current
            .checked_add(U256::from(1u64))
            .ok_or(TokenError::Overflow)?;
        self.nonces.insert(owner, next);
        Ok(current)
    }
}

//! Append-only event log for `Transfer` and `Approval` notifications.
//!
//! One record is appended per successful mutating operation, synchronously
//! with the state change, in operation order. The log is purely
//! observational: the ledger never reads back its own emissions.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A ledger notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TokenEvent {
    /// `value` tokens moved from `from` to `to`.
    ///
    /// Mints appear with `from == Address::ZERO`, burns with
    /// `to == Address::ZERO`. `value` may be zero.
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    /// The allowance of `spender` for `owner` was set to `value`.
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
}

/// Ordered, append-only stream of [`TokenEvent`] records.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    records: Vec<TokenEvent>,
}

impl EventLog {
    /// Appends one record to the log.
    pub(crate) fn record(&mut self, event: TokenEvent) {
        #[cfg(feature = "telemetry")]
        tracing::debug!(event = ?event, "ledger event");
        self.records.push(event);
    }

    /// All records emitted so far, in emission order.
    pub fn as_slice(&self) -> &[TokenEvent] {
        &self.records
    }

    /// Number of records emitted so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes and returns all records, leaving the log empty.
    ///
    /// Intended for external observers that consume the stream in batches.
    pub fn drain(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.records)
    }
}

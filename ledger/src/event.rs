//! Notifications emitted after successful state changes.

use serde::{Deserialize, Serialize};
use tokenledger_types::AccountId;

/// A committed ledger state change, observable by external collaborators.
///
/// Idempotent no-ops (re-suspending a suspended ledger, locking a locked
/// account) change nothing and emit nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// An ordinary transfer between holders.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: u128,
    },
    /// An administrator transfer from its own balance that bypassed the gate.
    Distribute {
        administrator: AccountId,
        to: AccountId,
        amount: u128,
    },
    /// New supply credited to an account.
    Mint { to: AccountId, amount: u128 },
    /// Supply removed from an account.
    Burn { from: AccountId, amount: u128 },
    /// The global transfer gate changed.
    GateChanged { suspended: bool },
    AccountLocked { account: AccountId },
    AccountUnlocked { account: AccountId },
}

impl LedgerEvent {
    /// Short operation name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "transfer",
            LedgerEvent::Distribute { .. } => "distribute",
            LedgerEvent::Mint { .. } => "mint",
            LedgerEvent::Burn { .. } => "burn",
            LedgerEvent::GateChanged { .. } => "gate_changed",
            LedgerEvent::AccountLocked { .. } => "account_locked",
            LedgerEvent::AccountUnlocked { .. } => "account_unlocked",
        }
    }
}

type Listener = Box<dyn Fn(&LedgerEvent) + Send + Sync>;

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners run inline on the emitting thread, one event at a time.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

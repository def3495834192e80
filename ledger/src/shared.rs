//! Thread-safe ledger handle with optional durable storage.
//!
//! Mutations hold the write guard while they check preconditions, apply and
//! persist, so concurrent callers observe them one at a time. Each commit
//! draws a delivery turn under the guard; its event is delivered after the
//! guard is released, once every earlier turn has finished. Listeners see
//! events in commit order and may query the ledger. Queries share the read
//! guard and always see a consistent state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
    Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use tokenledger_store::LedgerStore;
use tokenledger_types::{AccountId, TokenMetadata};

use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent};
use crate::ledger::Ledger;
use crate::snapshot::LedgerSnapshot;

/// A [`Ledger`] shared between callers.
///
/// When a store is attached, each successful mutation is committed as one
/// batch before the call returns. A failed commit rolls the in-memory state
/// back, so memory and storage never disagree.
pub struct SharedLedger {
    inner: RwLock<Ledger>,
    store: Option<Arc<dyn LedgerStore>>,
    events: Mutex<EventBus>,
    delivery: DeliveryOrder,
}

/// Commit-ordered turns for event delivery.
#[derive(Default)]
struct DeliveryOrder {
    issued: AtomicU64,
    next: Mutex<u64>,
    turn: Condvar,
}

impl DeliveryOrder {
    /// Must be called under the ledger write guard.
    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed)
    }

    fn wait_for(&self, ticket: u64) -> Turn<'_> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        while *next != ticket {
            next = self.turn.wait(next).unwrap_or_else(PoisonError::into_inner);
        }
        Turn { order: self, ticket }
    }
}

/// Passes the turn on when dropped, even if a listener panicked.
struct Turn<'a> {
    order: &'a DeliveryOrder,
    ticket: u64,
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        let mut next = self.order.next.lock().unwrap_or_else(PoisonError::into_inner);
        *next = self.ticket + 1;
        self.order.turn.notify_all();
    }
}

impl SharedLedger {
    /// Wrap an in-memory ledger with no persistence.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: RwLock::new(ledger),
            store: None,
            events: Mutex::new(EventBus::new()),
            delivery: DeliveryOrder::default(),
        }
    }

    /// Write a freshly created ledger into an empty store and keep it in sync.
    pub fn create_in(ledger: Ledger, store: Arc<dyn LedgerStore>) -> Result<Self, LedgerError> {
        if store.is_initialized()? {
            return Err(LedgerError::AlreadyInitialized);
        }
        ledger.save_to_store(store.as_ref())?;
        tracing::info!(symbol = %ledger.symbol(), "ledger written to store");
        Ok(Self {
            inner: RwLock::new(ledger),
            store: Some(store),
            events: Mutex::new(EventBus::new()),
            delivery: DeliveryOrder::default(),
        })
    }

    /// Open the ledger held by `store`.
    pub fn open(store: Arc<dyn LedgerStore>) -> Result<Self, LedgerError> {
        let ledger = Ledger::load_from_store(store.as_ref())?.ok_or(LedgerError::NotInitialized)?;
        Ok(Self {
            inner: RwLock::new(ledger),
            store: Some(store),
            events: Mutex::new(EventBus::new()),
            delivery: DeliveryOrder::default(),
        })
    }

    /// Register a listener for committed events.
    ///
    /// Listeners may call the query methods. They must not mutate the ledger
    /// or subscribe from inside a callback.
    pub fn subscribe(&self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        let mut events = self.bus();
        events.subscribe(listener);
        tracing::debug!(listeners = events.listener_count(), "event listener added");
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn total_supply(&self) -> u128 {
        self.read().total_supply()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.read().balance_of(account)
    }

    pub fn is_lock(&self, account: &AccountId) -> bool {
        self.read().is_lock(account)
    }

    pub fn is_suspended(&self) -> bool {
        self.read().is_suspended()
    }

    pub fn metadata(&self) -> TokenMetadata {
        self.read().metadata().clone()
    }

    pub fn administrator(&self) -> AccountId {
        self.read().administrator().clone()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.read().snapshot()
    }

    /// Run several reads against one consistent view of the ledger.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.read())
    }

    // ── Mutations ────────────────────────────────────────────────────────

    pub fn transfer(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.apply("transfer", sender, &[sender, recipient], |ledger| {
            ledger.transfer(sender, recipient, amount)?;
            Ok((sender != recipient).then(|| LedgerEvent::Transfer {
                from: sender.clone(),
                to: recipient.clone(),
                amount,
            }))
        })
    }

    pub fn distribute(
        &self,
        administrator: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.apply(
            "distribute",
            administrator,
            &[administrator, recipient],
            |ledger| {
                ledger.distribute(administrator, recipient, amount)?;
                Ok((administrator != recipient).then(|| LedgerEvent::Distribute {
                    administrator: administrator.clone(),
                    to: recipient.clone(),
                    amount,
                }))
            },
        )
    }

    pub fn mint(
        &self,
        administrator: &AccountId,
        account: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.apply("mint", administrator, &[account], |ledger| {
            ledger.mint(administrator, account, amount)?;
            Ok(Some(LedgerEvent::Mint {
                to: account.clone(),
                amount,
            }))
        })
    }

    pub fn burn(
        &self,
        administrator: &AccountId,
        account: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.apply("burn", administrator, &[account], |ledger| {
            ledger.burn(administrator, account, amount)?;
            Ok(Some(LedgerEvent::Burn {
                from: account.clone(),
                amount,
            }))
        })
    }

    pub fn suspend(&self, administrator: &AccountId, enabled: bool) -> Result<(), LedgerError> {
        self.apply("suspend", administrator, &[], |ledger| {
            let changed = ledger.is_suspended() != enabled;
            ledger.suspend(administrator, enabled)?;
            Ok(changed.then_some(LedgerEvent::GateChanged { suspended: enabled }))
        })
    }

    pub fn lock(&self, administrator: &AccountId, account: &AccountId) -> Result<(), LedgerError> {
        self.apply("lock", administrator, &[account], |ledger| {
            let changed = !ledger.is_lock(account);
            ledger.lock(administrator, account)?;
            Ok(changed.then(|| LedgerEvent::AccountLocked {
                account: account.clone(),
            }))
        })
    }

    pub fn unlock(&self, administrator: &AccountId, account: &AccountId) -> Result<(), LedgerError> {
        self.apply("unlock", administrator, &[account], |ledger| {
            let changed = ledger.is_lock(account);
            ledger.unlock(administrator, account)?;
            Ok(changed.then(|| LedgerEvent::AccountUnlocked {
                account: account.clone(),
            }))
        })
    }

    /// Run one mutation under the write guard.
    ///
    /// `op` returns the event describing what changed, or `None` for a
    /// successful no-op (nothing to persist or announce).
    fn apply<F>(
        &self,
        name: &'static str,
        caller: &AccountId,
        touched: &[&AccountId],
        op: F,
    ) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut Ledger) -> Result<Option<LedgerEvent>, LedgerError>,
    {
        if let Err(e) = touched.iter().try_for_each(|account| account.validate()) {
            let e = LedgerError::InvalidAccount(e);
            tracing::warn!(op = name, caller = %caller, error = %e, "operation rejected");
            return Err(e);
        }

        let mut ledger = self.write();
        let checkpoint = ledger.checkpoint(touched);

        let event = match op(&mut *ledger) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(op = name, caller = %caller, error = %e, "operation rejected");
                return Err(e);
            }
        };
        let Some(event) = event else {
            tracing::debug!(op = name, caller = %caller, "no state change");
            return Ok(());
        };

        if let Some(store) = &self.store {
            let batch = ledger.batch_for(touched);
            if let Err(e) = store.commit(&batch) {
                ledger.restore(checkpoint);
                tracing::error!(op = name, error = %e, "commit failed, change rolled back");
                return Err(LedgerError::Storage(e));
            }
        }

        tracing::debug!(op = name, caller = %caller, event = event.kind(), "operation applied");
        let ticket = self.delivery.ticket();
        drop(ledger);

        let _turn = self.delivery.wait_for(ticket);
        self.bus().emit(&event);
        Ok(())
    }

    fn bus(&self) -> MutexGuard<'_, EventBus> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Operations never leave the ledger half-updated, so a poisoned lock
    // still guards a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// crates/fatoken-rpc/src/state.rs
//
// LedgerState: the single-writer handle every handler goes through.
//
// The ledger lives behind one async mutex. Mutating handlers take the lock,
// read the clock while holding it, apply the operation and run the commit
// hook before releasing it, so timestamps and persisted snapshots follow
// commit order exactly.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_core::traits::Clock;
use fatoken_ledger::{Ledger, OpContext, StorageSnapshot};

/// Hook run after every committed mutation, with the post-commit storage.
/// The daemon uses it to persist snapshots.
pub type CommitCallback = Arc<dyn Fn(&StorageSnapshot) + Send + Sync>;

/// Shared ledger plus the sequencer's clock.
#[derive(Clone)]
pub struct LedgerState {
    ledger: Arc<Mutex<Ledger>>,
    clock: Arc<dyn Clock>,
    on_commit: Option<CommitCallback>,
    start_time: Instant,
}

impl std::fmt::Debug for LedgerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerState")
            .field("commit_hook", &self.on_commit.is_some())
            .finish()
    }
}

impl LedgerState {
    pub fn new(ledger: Ledger, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            clock,
            on_commit: None,
            start_time: Instant::now(),
        }
    }

    /// Set the hook run after each committed mutation.
    pub fn with_commit_callback(mut self, callback: CommitCallback) -> Self {
        self.on_commit = Some(callback);
        self
    }

    /// Run a mutating operation as `caller` at the clock's current time.
    ///
    /// `op` receives exclusive access to the ledger and returns whatever the
    /// handler needs to build its response. The commit hook only runs if
    /// `op` succeeded.
    pub async fn apply<T, F>(&self, caller: Address, op: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Ledger, &OpContext) -> Result<T, LedgerError>,
    {
        let mut ledger = self.ledger.lock().await;
        let ctx = OpContext::new(caller, self.clock.now());

        match op(&mut ledger, &ctx) {
            Ok(value) => {
                if let Some(hook) = &self.on_commit {
                    hook(&ledger.storage());
                }
                Ok(value)
            }
            Err(e) => {
                if e.is_fatal() {
                    tracing::error!(caller = %ctx.caller, now = %ctx.now, "Environment integrity violation: {}", e);
                } else {
                    tracing::warn!(caller = %ctx.caller, code = e.code(), "Operation rejected: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Run a read-only closure against the ledger.
    pub async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Ledger) -> T,
    {
        let ledger = self.ledger.lock().await;
        f(&ledger)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

//! One-shot cancellation token.
//!
//! The signal watcher calls [`ShutdownToken::cancel`]; the alert loop
//! checks [`is_cancelled`](ShutdownToken::is_cancelled) at every cycle
//! boundary and sleeps through [`wait_timeout`](ShutdownToken::wait_timeout)
//! so a cancellation cuts the inter-cycle delay short.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Cloneable handle; every clone observes the same cancellation.
#[derive(Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<Inner>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.  Returns `true` only for the call that actually
    /// flipped the flag, so follow-up work runs exactly once.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.cancelled.swap(true, Ordering::AcqRel);
        if first {
            // Taking the lock orders this notify after any waiter's flag check.
            let _guard = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.inner.wake.notify_all();
        }
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Sleep for up to `timeout`.  Returns `true` if shutdown was
    /// requested before or during the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _unused = self
            .inner
            .wake
            .wait_timeout_while(guard, timeout, |_| !self.is_cancelled())
            .unwrap_or_else(PoisonError::into_inner);
        self.is_cancelled()
    }
}

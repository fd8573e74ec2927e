//! Session establishment with request coalescing.
//!
//! The server issues its session cookie from a dedicated endpoint. Callers ask
//! for a session with [`SessionManager::ensure`]; while one establishment is in
//! flight every caller awaits that same operation, so the endpoint is hit at
//! most once until [`SessionManager::invalidate`] is called.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::transport::HttpTransport;

type PendingSession = Shared<BoxFuture<'static, ()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Establishing,
    Established,
}

pub struct SessionManager {
    transport: Arc<dyn HttpTransport>,
    session_path: String,
    pending: Mutex<Option<PendingSession>>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn HttpTransport>, session_path: impl Into<String>) -> Self {
        Self {
            transport,
            session_path: session_path.into(),
            pending: Mutex::new(None),
        }
    }

    /// Make sure a session has been requested, and wait for that request to settle.
    ///
    /// Establishment is best effort: failures are logged and swallowed, the
    /// next authenticated call is the real judge of session validity.
    pub async fn ensure(&self) {
        let pending = {
            let mut slot = self.lock_pending();
            slot.get_or_insert_with(|| self.establish()).clone()
        };
        pending.await
    }

    /// Forget the current session so the next `ensure()` requests a new one.
    /// Never performs I/O.
    ///
    /// A request still in flight is kept: it is already the fresh session, and
    /// dropping it would put a second request on the wire.
    pub fn invalidate(&self) {
        let mut slot = self.lock_pending();
        if slot.as_ref().is_some_and(|pending| pending.peek().is_some()) {
            slot.take();
            debug!("session invalidated");
        }
    }

    pub fn state(&self) -> SessionState {
        match self.lock_pending().as_ref() {
            None => SessionState::NoSession,
            Some(pending) if pending.peek().is_some() => SessionState::Established,
            Some(_) => SessionState::Establishing,
        }
    }

    fn establish(&self) -> PendingSession {
        let transport = Arc::clone(&self.transport);
        let path = self.session_path.clone();
        async move {
            match transport.get(&path).await {
                Ok(resp) => debug!(status = resp.status, "session request settled"),
                Err(e) => warn!("session request failed, continuing without it: {}", e),
            }
        }
        .boxed()
        .shared()
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<PendingSession>> {
        // The guarded value is a plain handle, so a poisoned lock is still usable.
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

//! Debounced mark-read
//!
//! Clients fire MARK_READ on every scroll or focus change. Only the last
//! request per conversation within the delay reaches the database.

use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const MARK_READ_DEBOUNCE: Duration = Duration::from_millis(300);

/// Per-connection debouncer keyed by conversation
#[derive(Debug)]
pub struct ReadDebouncer {
    delay: Duration,
    /// Latest ticket per conversation; an older ticket never flushes
    pending: DashMap<Uuid, u64>,
    tickets: AtomicU64,
}

impl ReadDebouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: DashMap::new(),
            tickets: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new(MARK_READ_DEBOUNCE))
    }

    /// Run `flush` after the delay unless another request for the same
    /// conversation arrives first
    pub fn schedule<F>(self: &Arc<Self>, conversation_id: Uuid, flush: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.insert(conversation_id, ticket);

        let this = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;
            let due = this
                .pending
                .remove_if(&conversation_id, |_, latest| *latest == ticket)
                .is_some();
            if due {
                flush.await;
            }
        });
    }

    /// Conversations with a flush still waiting
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

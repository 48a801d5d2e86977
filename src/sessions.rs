//! Holder for the last successful generation.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::schemas::QueryResult;

/// Ticket handed out per submission. Higher tickets are newer.
pub type Ticket = u64;

/// Last-result slot shared between the pipeline and the exporters.
///
/// Overlapping submissions resolve as "latest submission wins": a result is
/// only stored if its ticket is still the newest one issued.
#[derive(Debug, Default)]
pub struct ResultSession {
    latest_ticket: AtomicU64,
    last: RwLock<Option<QueryResult>>,
}

impl ResultSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission and get its ticket.
    pub fn begin(&self) -> Ticket {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` belongs to the newest submission.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }

    /// Store `result` if `ticket` is still current. Returns false for stale results.
    pub async fn commit(&self, ticket: Ticket, result: QueryResult) -> bool {
        let mut slot = self.last.write().await;
        // checked under the lock so a newer commit can't interleave
        if !self.is_current(ticket) {
            return false;
        }
        *slot = Some(result);
        true
    }

    pub async fn last_result(&self) -> Option<QueryResult> {
        self.last.read().await.clone()
    }

    pub async fn has_result(&self) -> bool {
        self.last.read().await.is_some()
    }
}

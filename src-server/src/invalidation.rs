//! View Invalidation
//!
//! Mutating actions announce which dashboard route went stale so connected
//! views refetch.

use serde::Serialize;
use tokio::sync::broadcast;

/// Route rendering the board and the leads table
pub const CRM_ROUTE: &str = "/dashboard/crm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invalidation {
    pub organization_id: String,
    pub path: String,
}

#[derive(Clone)]
pub struct InvalidationBus {
    sender: broadcast::Sender<Invalidation>,
}

impl InvalidationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.sender.subscribe()
    }

    /// Mark `path` stale for one organization; returns the listener count.
    pub fn invalidate(&self, organization_id: &str, path: &str) -> usize {
        let event = Invalidation {
            organization_id: organization_id.to_string(),
            path: path.to_string(),
        };
        // No listeners is normal when no view is open.
        let receivers = self.sender.send(event).unwrap_or(0);
        log::debug!("Invalidated {} for {} ({} listeners)", path, organization_id, receivers);
        receivers
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new(64)
    }
}

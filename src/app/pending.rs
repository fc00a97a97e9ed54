//! Table of outstanding requests.
//!
//! Every dispatched request is recorded here with the information needed to
//! decide, when its response arrives, whether it still applies: the query tag
//! and search epoch for searches, the selection sequence for detail and
//! recommend lookups. Each entry also carries a deadline on the state
//! machine's logical clock.

use crate::gateway::{Operation, RequestId};
use std::collections::BTreeMap;

/// Bookkeeping for one in-flight request.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub operation: Operation,

    /// The query for searches, the movie title for everything else.
    pub tag: String,

    /// Search epoch current when the request was issued.
    pub search_epoch: u64,

    /// Selection sequence the request belongs to, for detail and recommend.
    pub selection_seq: Option<u64>,

    /// Logical clock value after which the request is failed.
    pub deadline: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PendingRequests {
    next_id: u64,
    entries: BTreeMap<RequestId, Pending>,
}

impl PendingRequests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new request and returns its freshly allocated id.
    pub fn issue(&mut self, pending: Pending) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.entries.insert(id, pending);
        id
    }

    /// Removes and returns the entry for `id`.
    ///
    /// `None` means the request already resolved or timed out, so its
    /// response must be ignored.
    pub fn resolve(&mut self, id: RequestId) -> Option<Pending> {
        self.entries.remove(&id)
    }

    /// Removes every entry whose deadline is at or before `now`, oldest first.
    pub fn expire(&mut self, now: f64) -> Vec<(RequestId, Pending)> {
        let expired: Vec<RequestId> = self
            .entries
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(id, _)| *id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|pending| (id, pending)))
            .collect()
    }

    /// Outstanding entries in issue order.
    pub fn iter(&self) -> impl Iterator<Item = &Pending> + '_ {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

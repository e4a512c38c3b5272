//! Per-visitor state kept between requests.
//!
//! The session only carries a [`VisitorId`]. The cart and the category load
//! sequence live here, in a `moka` cache that is bounded in size and forgets
//! visitors after a period of inactivity.
//!
//! Each cart sits behind its own async mutex: a cart request holds the lock
//! from reading the cart until the changed cart is written back, so
//! concurrent requests from one visitor apply one after another.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sapling_core::Cart;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::controller::LoadSequence;

/// Identifier stored in the session cookie's record.
pub type VisitorId = Uuid;

/// State of one visitor.
#[derive(Debug, Default)]
pub struct Visitor {
    cart: Mutex<Cart>,
    loads: Arc<LoadSequence>,
}

impl Visitor {
    /// The visitor's cart. Hold the guard for the whole read-modify-write.
    #[must_use]
    pub const fn cart(&self) -> &Mutex<Cart> {
        &self.cart
    }

    /// Category load sequence shared by all of this visitor's requests.
    #[must_use]
    pub fn loads(&self) -> Arc<LoadSequence> {
        Arc::clone(&self.loads)
    }
}

/// Bounded in-memory store of visitors.
///
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct VisitorStore {
    cache: Cache<VisitorId, Arc<Visitor>>,
}

impl VisitorStore {
    /// Create a store holding at most `max_capacity` visitors, each dropped
    /// after `time_to_idle` without a request.
    #[must_use]
    pub fn new(max_capacity: u64, time_to_idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(time_to_idle)
            .build();
        Self { cache }
    }

    /// Get a visitor, starting an empty one if it is unknown or expired.
    ///
    /// Concurrent calls for the same id share one entry.
    pub async fn visitor(&self, id: VisitorId) -> Arc<Visitor> {
        self.cache
            .get_with(id, async { Arc::new(Visitor::default()) })
            .await
    }

    /// Get a visitor only if it is still held.
    pub async fn existing(&self, id: VisitorId) -> Option<Arc<Visitor>> {
        self.cache.get(&id).await
    }

    /// Approximate number of visitors held.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending evictions now instead of on later cache activity.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

//! Content store: the seed series plus everything generated this session.
//!
//! The seed is shared read-only. Generated series only ever enter at the
//! front of the list; nothing is edited or removed.

use std::sync::Arc;

use crate::domain::Series;

/// In-memory content for one session
#[derive(Debug, Clone)]
pub struct ContentStore {
    seed: Arc<Series>,
    generated: Vec<Series>,
}

impl ContentStore {
    /// Create a store around a seed series with nothing generated yet
    pub fn new(seed: impl Into<Arc<Series>>) -> Self {
        Self {
            seed: seed.into(),
            generated: Vec::new(),
        }
    }

    /// The seed series
    pub fn seed(&self) -> &Series {
        &self.seed
    }

    /// Shared handle to the seed series
    pub fn seed_handle(&self) -> Arc<Series> {
        Arc::clone(&self.seed)
    }

    /// Generated series, newest batch first
    pub fn generated(&self) -> &[Series] {
        &self.generated
    }

    /// Put a batch in front of everything generated so far, keeping the
    /// batch's own order
    pub fn prepend(&mut self, batch: Vec<Series>) {
        if batch.is_empty() {
            return;
        }
        self.generated.splice(0..0, batch);
    }

    /// Number of generated series
    pub fn len(&self) -> usize {
        self.generated.len()
    }

    /// Whether nothing has been generated yet
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }
}

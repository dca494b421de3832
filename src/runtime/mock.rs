//! Mock distributed runtime for testing
//!
//! This module provides a scriptable implementation of the `DistRuntime`
//! trait. The real runtime behind a training job is process-wide and awkward
//! to multi-instantiate inside one test process; the mock reports whatever
//! (available, initialized, rank, world_size) tuple a test scripts, and can
//! be reconfigured mid-test to simulate external initialization or teardown.
//!
//! # Features
//!
//! - Scriptable answers for all four capability queries
//! - Mutable through `&self`, so a test can flip state after handing the
//!   runtime to a context
//! - Clones share state, following the handle semantics of the real thing
//! - Counts queries per capability for sequencing verification
//!
//! # Example
//!
//! ```
//! use distrank::runtime::DistRuntime;
//! use distrank::runtime::mock::MockRuntime;
//!
//! let runtime = MockRuntime::initialized(3, 8);
//! assert!(runtime.is_available());
//! assert_eq!(runtime.rank(), 3);
//!
//! // External teardown, as seen by whoever holds a clone.
//! runtime.set_initialized(false);
//! assert!(!runtime.is_initialized());
//! ```

use super::DistRuntime;
use std::sync::{Arc, Mutex};

/// Scriptable mock distributed runtime
///
/// By default the mock reports no support at all: unavailable, uninitialized,
/// rank 0, world size 1. Use [`MockRuntime::initialized`] or the `set_*`
/// methods to script any other state.
#[derive(Clone)]
pub struct MockRuntime {
    /// Whether multi-process support should be reported as present
    available: Arc<Mutex<bool>>,

    /// Whether the process group should be reported as initialized
    initialized: Arc<Mutex<bool>>,

    /// Rank to report
    rank: Arc<Mutex<usize>>,

    /// World size to report
    world_size: Arc<Mutex<usize>>,

    /// Per-capability query counts for verification
    queries: Arc<Mutex<QueryCounts>>,
}

/// Number of times each capability was queried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryCounts {
    pub is_available: usize,
    pub is_initialized: usize,
    pub rank: usize,
    pub world_size: usize,
}

impl MockRuntime {
    /// Create a mock reporting no distributed support
    ///
    /// Unavailable, uninitialized, rank 0, world size 1.
    pub fn new() -> Self {
        Self {
            available: Arc::new(Mutex::new(false)),
            initialized: Arc::new(Mutex::new(false)),
            rank: Arc::new(Mutex::new(0)),
            world_size: Arc::new(Mutex::new(1)),
            queries: Arc::new(Mutex::new(QueryCounts::default())),
        }
    }

    /// Create a mock reporting an initialized process group
    ///
    /// Available and initialized, with the given identity.
    ///
    /// # Panics
    ///
    /// Panics if `rank >= world_size`; an initialized group can never report
    /// such a pair.
    pub fn initialized(rank: usize, world_size: usize) -> Self {
        assert!(
            rank < world_size,
            "rank {} does not fit world size {}",
            rank,
            world_size
        );
        let mock = Self::new();
        mock.set_available(true);
        mock.set_initialized(true);
        mock.set_rank(rank);
        mock.set_world_size(world_size);
        mock
    }

    /// Script whether support is reported as present
    pub fn set_available(&self, available: bool) {
        *self.available.lock().unwrap() = available;
    }

    /// Script whether the process group is reported as initialized
    pub fn set_initialized(&self, initialized: bool) {
        *self.initialized.lock().unwrap() = initialized;
    }

    /// Script the reported rank
    pub fn set_rank(&self, rank: usize) {
        *self.rank.lock().unwrap() = rank;
    }

    /// Script the reported world size
    pub fn set_world_size(&self, world_size: usize) {
        *self.world_size.lock().unwrap() = world_size;
    }

    /// Get a copy of the per-capability query counts
    pub fn queries(&self) -> QueryCounts {
        *self.queries.lock().unwrap()
    }

    /// Number of identity queries (`rank` plus `world_size`) received
    ///
    /// The facade must keep this at zero while the mock reports unavailable
    /// or uninitialized.
    pub fn identity_queries(&self) -> usize {
        let counts = self.queries();
        counts.rank + counts.world_size
    }

    /// Reset all query counts to zero
    pub fn reset_queries(&self) {
        *self.queries.lock().unwrap() = QueryCounts::default();
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl DistRuntime for MockRuntime {
    fn is_available(&self) -> bool {
        self.queries.lock().unwrap().is_available += 1;
        *self.available.lock().unwrap()
    }

    fn is_initialized(&self) -> bool {
        self.queries.lock().unwrap().is_initialized += 1;
        *self.initialized.lock().unwrap()
    }

    fn rank(&self) -> usize {
        self.queries.lock().unwrap().rank += 1;
        *self.rank.lock().unwrap()
    }

    fn world_size(&self) -> usize {
        self.queries.lock().unwrap().world_size += 1;
        *self.world_size.lock().unwrap()
    }
}

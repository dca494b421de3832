//! Distributed-state facade
//!
//! One handle, three questions: is a distributed runtime active, what is this
//! process's rank, and how many processes exist. Answers delegate to the
//! injected runtime while it reports an initialized process group, and degrade
//! to the single-process identity (rank 0, world size 1) otherwise, so callers
//! never branch on how the process was launched.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use distrank::DistContext;
//! use distrank::runtime::mock::MockRuntime;
//!
//! let runtime = MockRuntime::new();
//! let ctx = DistContext::new(Arc::new(runtime.clone()));
//!
//! // Nothing initialized yet: single-process identity.
//! assert_eq!((ctx.is_enabled(), ctx.rank(), ctx.world_size()), (false, 0, 1));
//!
//! // External code initializes the process group; the same context sees it.
//! runtime.set_available(true);
//! runtime.set_initialized(true);
//! runtime.set_rank(1);
//! runtime.set_world_size(4);
//! assert_eq!((ctx.is_enabled(), ctx.rank(), ctx.world_size()), (true, 1, 4));
//! ```

use crate::runtime::launcher::LauncherEnv;
use crate::runtime::standalone::StandaloneRuntime;
use crate::runtime::DistRuntime;
use crate::snapshot::DistSnapshot;
use std::fmt;
use std::sync::Arc;

/// Facade over an external distributed coordination runtime
///
/// Holds nothing but a runtime handle: no cached answers, no state machine,
/// no init or teardown of its own. Every query re-evaluates the runtime, so
/// external initialization may happen at any point relative to the first
/// call. Cloning is cheap and clones answer from the same runtime, making one
/// context safe to hand to every thread of a training process.
#[derive(Clone)]
pub struct DistContext {
    runtime: Arc<dyn DistRuntime>,
}

impl DistContext {
    /// Create a context over the given runtime
    pub fn new(runtime: Arc<dyn DistRuntime>) -> Self {
        Self { runtime }
    }

    /// Context for a process with no distributed support
    ///
    /// Wraps [`StandaloneRuntime`]: permanently disabled, rank 0, world
    /// size 1.
    pub fn standalone() -> Self {
        Self::new(Arc::new(StandaloneRuntime))
    }

    /// Context over the torchrun-style launcher environment
    ///
    /// Reads `RANK` and `WORLD_SIZE` on every query. A process not started
    /// by a launcher has neither variable and stays in the single-process
    /// default state. For SLURM or Open MPI variable names, wrap
    /// [`LauncherEnv::slurm`] or [`LauncherEnv::open_mpi`] in
    /// [`new`](Self::new) instead.
    pub fn from_env() -> Self {
        Self::new(Arc::new(LauncherEnv::new()))
    }

    /// Whether a distributed runtime is active
    ///
    /// True only if the runtime reports multi-process support present and a
    /// process group initialized by external code. The answer is an
    /// instant-in-time fact, re-evaluated on every call: a group initialized
    /// after this context was created is picked up immediately, as is one
    /// torn down.
    pub fn is_enabled(&self) -> bool {
        self.runtime.is_available() && self.runtime.is_initialized()
    }

    /// This process's rank, or 0 when not distributed
    ///
    /// Delegates to the runtime verbatim while [`is_enabled`](Self::is_enabled)
    /// holds. Otherwise returns 0 without touching the runtime's identity
    /// queries, which are undefined before initialization. Rank 0 doubles as
    /// the single-process identity and the primary rank of a real group, so
    /// `rank() == 0` branches behave identically in both worlds.
    pub fn rank(&self) -> usize {
        if self.is_enabled() {
            self.runtime.rank()
        } else {
            0
        }
    }

    /// Total number of cooperating processes, or 1 when not distributed
    ///
    /// Delegates while enabled, otherwise reports exactly one participant:
    /// this process. Always ≥ 1.
    pub fn world_size(&self) -> usize {
        if self.is_enabled() {
            self.runtime.world_size()
        } else {
            1
        }
    }

    /// Whether this process is the primary (rank 0)
    ///
    /// The primary conventionally owns logging, checkpointing, and other
    /// once-per-job work. True in the single-process default state, where
    /// the only process is necessarily the primary.
    pub fn is_primary(&self) -> bool {
        self.rank() == 0
    }

    /// Capture the current answers as a [`DistSnapshot`]
    ///
    /// A copy for banners and reports, not a cache; live queries keep
    /// re-evaluating the runtime.
    pub fn snapshot(&self) -> DistSnapshot {
        DistSnapshot::capture(self)
    }
}

impl Default for DistContext {
    fn default() -> Self {
        Self::standalone()
    }
}

impl fmt::Debug for DistContext {
    // The runtime field is a trait object; show the live answers instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistContext")
            .field("enabled", &self.is_enabled())
            .field("rank", &self.rank())
            .field("world_size", &self.world_size())
            .finish()
    }
}

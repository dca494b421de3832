//! distrank - Distributed runtime state queries
//!
//! distrank answers three questions for a process that may or may not be part
//! of a multi-process training job: is a distributed runtime active, what is
//! this process's rank within it, and how many peers exist. The rest of a
//! training program can then be written uniformly instead of branching on how
//! the process was launched.
//!
//! # Architecture
//!
//! - **Injected runtime**: the external coordination runtime is consumed
//!   through the `DistRuntime` trait, never through a hidden global
//! - **Graceful degradation**: rank 0 / world size 1 whenever the runtime is
//!   absent or its process group has not been initialized
//! - **No caching**: every query re-evaluates the runtime's current state
//! - **Shipped collaborators**: standalone (no runtime at all), launcher
//!   environment (`RANK`/`WORLD_SIZE`, SLURM, Open MPI), scriptable mock
//!
//! # Example
//!
//! ```
//! use distrank::DistContext;
//! use distrank::runtime::mock::MockRuntime;
//!
//! // Alone: every query degrades to the single-process identity.
//! let ctx = DistContext::standalone();
//! assert!(!ctx.is_enabled());
//! assert_eq!(ctx.rank(), 0);
//! assert_eq!(ctx.world_size(), 1);
//!
//! // One of eight: queries delegate to the runtime verbatim.
//! let ctx = DistContext::new(std::sync::Arc::new(MockRuntime::initialized(3, 8)));
//! assert!(ctx.is_enabled());
//! assert_eq!(ctx.rank(), 3);
//! assert_eq!(ctx.world_size(), 8);
//! assert!(!ctx.is_primary());
//! ```

pub mod context;
pub mod runtime;
pub mod snapshot;

// Re-export commonly used types
pub use context::DistContext;
pub use runtime::DistRuntime;
pub use snapshot::DistSnapshot;

/// Result type used throughout distrank
pub type Result<T> = anyhow::Result<T>;

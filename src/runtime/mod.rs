//! Distributed runtime abstraction
//!
//! This module defines the capability contract distrank expects from an
//! external distributed coordination runtime. The runtime owns process-group
//! membership, rank assignment, and collective communication; distrank never
//! initializes it and never tears it down. It only asks four questions: is
//! multi-process support present, has a process group been initialized, what
//! is this process's rank, and how many processes exist.
//!
//! # Architecture
//!
//! The `DistRuntime` trait provides a uniform interface over whatever actually
//! answers those questions. [`DistContext`](crate::DistContext) holds a runtime
//! as a trait object and stays agnostic to the mechanism, so swapping a
//! launcher-environment reader for a test mock changes nothing in calling code.
//!
//! # Implementations
//!
//! - **StandaloneRuntime**: no multi-process support at all (baseline)
//! - **LauncherEnv**: observes the environment a distributed launcher
//!   populated (torchrun-style `RANK`/`WORLD_SIZE`, SLURM, Open MPI)
//! - **MockRuntime**: scriptable fake for tests
//!
//! # Example
//!
//! ```
//! use distrank::runtime::DistRuntime;
//! use distrank::runtime::standalone::StandaloneRuntime;
//!
//! let runtime = StandaloneRuntime;
//! assert!(!runtime.is_available());
//! assert!(!runtime.is_initialized());
//! assert_eq!(runtime.rank(), 0);
//! assert_eq!(runtime.world_size(), 1);
//! ```

/// Capability contract for an external distributed coordination runtime
///
/// The four queries split into two facts and two values. The facts
/// (`is_available`, `is_initialized`) are always safe to call. The values
/// (`rank`, `world_size`) are defined only while both facts hold; callers
/// are expected to confirm the facts first, and
/// [`DistContext`](crate::DistContext) does exactly that.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. One runtime handle is typically
/// shared by every thread of a training process through a single context.
///
/// # Error Handling
///
/// No method returns `Result`. The queries are observations of process-wide
/// state with no failure path of their own; an implementation that cannot
/// answer reports the uninitialized state through the two facts instead.
pub trait DistRuntime: Send + Sync {
    /// Whether multi-process coordination support is present at all
    ///
    /// A process-wide fact about the build and environment, independent of
    /// whether anything was initialized. Pure query, no side effects.
    fn is_available(&self) -> bool;

    /// Whether a process group has been initialized by external code
    ///
    /// Initialization happens exactly once per process, outside this crate,
    /// at a point this crate does not control. Pure query, no side effects.
    fn is_initialized(&self) -> bool;

    /// This process's zero-based rank within the process group
    ///
    /// Defined only while `is_available()` and `is_initialized()` both hold;
    /// in any other state the answer is unspecified and callers must not
    /// depend on it. Implementations shipped with this crate stay total and
    /// return 0 there.
    fn rank(&self) -> usize;

    /// Total number of processes in the process group
    ///
    /// Defined only while `is_available()` and `is_initialized()` both hold,
    /// and then always ≥ 1. Implementations shipped with this crate return 1
    /// outside that state.
    fn world_size(&self) -> usize;
}

pub mod standalone;
pub mod launcher;
pub mod mock;

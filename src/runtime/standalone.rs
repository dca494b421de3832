//! Standalone runtime
//!
//! The collaborator for processes with no multi-process support at all: no
//! distributed build, no launcher, no process group. Every fact is false and
//! the identity queries report the single-process defaults.

use super::DistRuntime;

/// Runtime for a process with no distributed support
///
/// Reports unavailable and uninitialized unconditionally, which makes every
/// [`DistContext`](crate::DistContext) query degrade to the single-process
/// identity: rank 0, world size 1. This is the right runtime for binaries
/// built without any coordination backend, and what
/// `DistContext::standalone()` wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandaloneRuntime;

impl DistRuntime for StandaloneRuntime {
    fn is_available(&self) -> bool {
        false
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn rank(&self) -> usize {
        0
    }

    fn world_size(&self) -> usize {
        1
    }
}
